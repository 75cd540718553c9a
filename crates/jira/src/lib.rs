//! Jira Cloud REST client: current user lookup and concurrent, paginated
//! issue search.

pub mod client;
pub mod collect;
pub mod error;
pub mod types;

pub use {
    client::JiraClient,
    error::JiraError,
    types::{Issue, JiraUser},
};
