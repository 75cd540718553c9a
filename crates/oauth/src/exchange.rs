use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    error::Result,
    types::{Credentials, now_unix},
};

/// Form-encoded client for the OAuth 2.0 token endpoint.
///
/// Serves both the `authorization_code` and the `refresh_token` grant; the
/// grant-specific fields are supplied by the caller.
#[derive(Debug, Clone)]
pub struct TokenExchange {
    token_url: String,
    client: reqwest::Client,
}

impl TokenExchange {
    pub fn new(token_url: impl Into<String>) -> Self {
        Self {
            token_url: token_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// POST `params` to the token endpoint and decode the returned pair.
    ///
    /// A single attempt is made. Fields missing from the JSON body decode to
    /// empty/zero values rather than failing.
    pub async fn exchange(&self, params: &HashMap<&str, String>) -> Result<Credentials> {
        let grant_type = params.get("grant_type").map(String::as_str).unwrap_or("");
        debug!(grant_type, url = %self.token_url, "requesting tokens");

        let body = self
            .client
            .post(&self.token_url)
            .form(params)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let credentials: Credentials = serde_json::from_slice(&body)?;
        let credentials = credentials.with_issue_time(now_unix());

        if !credentials.is_complete() {
            warn!(grant_type, "token response is missing access or refresh token");
        }

        Ok(credentials)
    }
}
