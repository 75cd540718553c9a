use std::collections::HashMap;

use {
    secrecy::ExposeSecret,
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
    url::Url,
};

use crate::{
    callback_server::CallbackServer,
    error::{AuthError, Result},
    exchange::TokenExchange,
    storage::CredentialStore,
    types::{Credentials, OAuthConfig, now_unix},
};

/// Path of the Tempo authorization page inside a Jira Cloud instance.
const AUTHORIZE_PATH: &str = "/plugins/servlet/ac/io.tempo.jira/oauth-authorize/";

/// Tempo OAuth 2.0 Authorization Code flow.
pub struct OAuthFlow {
    config: OAuthConfig,
    exchange: TokenExchange,
    open_browser: bool,
}

/// Outcome of [`OAuthFlow::renew`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renewal {
    /// Stored credentials are still valid and were left untouched.
    StillValid(Credentials),
    /// Credentials were refreshed and saved.
    Refreshed(Credentials),
}

impl OAuthFlow {
    pub fn new(config: OAuthConfig) -> Self {
        let exchange = TokenExchange::new(config.token_url.clone());
        Self {
            config,
            exchange,
            open_browser: true,
        }
    }

    /// Do not launch a browser during [`login`](Self::login); the user
    /// navigates to the logged URL by hand.
    pub fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    /// Build the Tempo authorization URL for this client.
    pub fn authorization_url(&self) -> String {
        let base = format!(
            "{}{AUTHORIZE_PATH}",
            self.config.jira_url.trim_end_matches('/')
        );
        let params = [
            ("client_id", self.config.client_id.clone()),
            ("redirect_uri", self.config.redirect_uri()),
            ("access_type", "tenant_user".to_string()),
        ];
        match Url::parse_with_params(&base, &params) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(%base, error = %e, "jira url is not a valid base, building URL verbatim");
                format!(
                    "{base}?client_id={}&redirect_uri={}&access_type=tenant_user",
                    self.config.client_id,
                    self.config.redirect_uri()
                )
            },
        }
    }

    /// Run the interactive login and return fresh credentials.
    ///
    /// Opens the authorization page, waits on the local callback server for
    /// the redirect and trades the code for a token pair. `cancel` aborts the
    /// wait for the redirect. A pair missing either token is rejected with
    /// [`AuthError::IncompleteCredentials`].
    pub async fn login(&self, cancel: CancellationToken) -> Result<Credentials> {
        let server = CallbackServer::bind(&self.config.server_addr).await?;
        let url = self.authorization_url();

        if self.open_browser {
            info!("opening login link in your browser");
            if let Err(e) = open::that(&url) {
                warn!(error = %e, "could not open the browser");
            }
        }
        info!(%url, "if the browser did not open, visit this URL to log in");

        let code = server.wait_for_code(cancel).await?;
        info!("authorization code received, you may close the browser tab");

        let credentials = self.exchange_code(&code).await?;
        if !credentials.is_complete() {
            return Err(AuthError::IncompleteCredentials);
        }
        Ok(credentials)
    }

    /// Trade an authorization code for a token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<Credentials> {
        let params = self.grant_params("authorization_code", "code", code);
        self.exchange.exchange(&params).await
    }

    /// Use the refresh token from `credentials` to obtain a new pair.
    pub async fn refresh(&self, credentials: &Credentials) -> Result<Credentials> {
        let params =
            self.grant_params("refresh_token", "refresh_token", &credentials.refresh_token);
        self.exchange.exchange(&params).await
    }

    /// Refresh the stored credentials if they expired (or when `force` is set)
    /// and save the result. Nothing is written when the refresh fails or the
    /// response lacks either token.
    pub async fn renew(&self, store: &dyn CredentialStore, force: bool) -> Result<Renewal> {
        let stored = store
            .load_credentials()
            .map_err(AuthError::Store)?
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::NotLoggedIn)?;

        if !force && !stored.is_expired_at(now_unix()) {
            return Ok(Renewal::StillValid(stored));
        }

        info!("refreshing the Tempo access token");
        let fresh = self.refresh(&stored).await?;
        if !fresh.is_complete() {
            return Err(AuthError::IncompleteCredentials);
        }
        store.save_credentials(&fresh).map_err(AuthError::Store)?;
        Ok(Renewal::Refreshed(fresh))
    }

    fn grant_params(
        &self,
        grant_type: &str,
        grant_field: &'static str,
        grant_value: &str,
    ) -> HashMap<&'static str, String> {
        HashMap::from([
            ("grant_type", grant_type.to_string()),
            ("client_id", self.config.client_id.clone()),
            (
                "client_secret",
                self.config.client_secret.expose_secret().clone(),
            ),
            ("redirect_uri", self.config.redirect_uri()),
            (grant_field, grant_value.to_string()),
        ])
    }
}
