use thiserror::Error;

pub type Result<T> = std::result::Result<T, JiraError>;

#[derive(Debug, Error)]
pub enum JiraError {
    #[error("jira request failed")]
    Transport(#[from] reqwest::Error),

    #[error("malformed jira response")]
    Decode(#[from] serde_json::Error),

    /// One page of a collection failed; everything fetched so far is discarded.
    #[error("fetching issues from offset {start_at} failed")]
    Page {
        start_at: u32,
        #[source]
        source: Box<JiraError>,
    },

    #[error("page task did not complete")]
    Task(#[from] tokio::task::JoinError),
}
