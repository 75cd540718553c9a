use serde::{Deserialize, Serialize};

/// The Jira user the API token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    #[serde(default)]
    pub account_id: String,
}

/// Snapshot of a Jira issue, restricted to the fields the CLI asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIssue", into = "RawIssue")]
pub struct Issue {
    pub key: String,
    pub self_url: String,
    pub summary: String,
}

/// Issue as it appears in a search response.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawIssue {
    key: String,
    #[serde(rename = "self")]
    self_url: String,
    fields: RawFields,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawFields {
    summary: String,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Self {
            key: raw.key,
            self_url: raw.self_url,
            summary: raw.fields.summary,
        }
    }
}

impl From<Issue> for RawIssue {
    fn from(issue: Issue) -> Self {
        Self {
            key: issue.key,
            self_url: issue.self_url,
            fields: RawFields {
                summary: issue.summary,
            },
        }
    }
}

/// Body of `GET /rest/api/3/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SearchResponse {
    pub total: u32,
    pub issues: Vec<Issue>,
}
