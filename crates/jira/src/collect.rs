use {
    tokio::task::JoinSet,
    tracing::{debug, warn},
};

use crate::{
    client::JiraClient,
    error::{JiraError, Result},
    types::Issue,
};

/// Issues requested per search call.
pub const PAGE_SIZE: u32 = 100;

/// Offsets of every page needed to cover `total` items.
pub fn page_offsets(total: u32, page_size: u32) -> Vec<u32> {
    if page_size == 0 {
        return Vec::new();
    }
    (0..total.div_ceil(page_size)).map(|i| i * page_size).collect()
}

impl JiraClient {
    /// Fetch every issue the user may log work on.
    ///
    /// The total is counted first, then one task per page is spawned. Results
    /// arrive in completion order, not offset order. If any page fails the
    /// first failure is returned, but only after every other page task has
    /// finished.
    pub async fn workable_issues(&self) -> Result<Vec<Issue>> {
        let total = self.count_workable_issues().await?;
        let offsets = page_offsets(total, PAGE_SIZE);
        debug!(total, pages = offsets.len(), "fetching workable issues");

        let mut tasks = JoinSet::new();
        for start_at in offsets {
            let client = self.clone();
            tasks.spawn(async move {
                client
                    .workable_issues_page(start_at, PAGE_SIZE)
                    .await
                    .map_err(|e| JiraError::Page {
                        start_at,
                        source: Box::new(e),
                    })
            });
        }

        let mut issues = Vec::new();
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let page = joined.map_err(JiraError::from).and_then(|page| page);
            match page {
                Ok(page) if first_error.is_none() => issues.extend(page),
                Ok(_) => {},
                Err(e) => {
                    warn!(error = ?e, "issue page failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                },
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(issues),
        }
    }
}
