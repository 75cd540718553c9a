use {
    secrecy::SecretString,
    serde::Deserialize,
    tempo_oauth::{Credentials, OAuthConfig, types::DEFAULT_SERVER_ADDR},
};

/// Contents of `tempo-cli.toml`.
///
/// ```toml
/// jira_url = "https://acme.atlassian.net"
///
/// [tempo]
/// client_id = "..."
/// client_secret = "..."
///
/// [jira]
/// email = "me@acme.com"
/// api_token = "..."
/// ```
#[derive(Debug, Deserialize)]
pub struct TempoCliConfig {
    #[serde(default)]
    pub jira_url: String,
    pub tempo: TempoSection,
    pub jira: JiraSection,
    /// Written by `tempo auth login`; absent until the first login.
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Deserialize)]
pub struct TempoSection {
    #[serde(default)]
    pub client_id: String,
    pub client_secret: SecretString,
    /// `host:port` for the login callback server.
    #[serde(default)]
    pub server_addr: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JiraSection {
    #[serde(default)]
    pub email: String,
    pub api_token: SecretString,
}

impl TempoCliConfig {
    /// OAuth client settings for the Tempo login flow.
    pub fn oauth_config(&self) -> OAuthConfig {
        let mut config = OAuthConfig::new(
            self.tempo.client_id.clone(),
            self.tempo.client_secret.clone(),
            self.jira_url.clone(),
        );
        config.server_addr = self
            .tempo
            .server_addr
            .clone()
            .filter(|addr| !addr.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        config.redirect_uri = self.tempo.redirect_uri.clone();
        config
    }

    /// Stored credentials, or `None` when the user never logged in.
    pub fn stored_credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref().filter(|c| !c.is_empty())
    }
}
