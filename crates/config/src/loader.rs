use std::path::{Path, PathBuf};

use {
    anyhow::{Context, bail},
    secrecy::ExposeSecret,
    tracing::debug,
    url::Url,
};

use crate::schema::TempoCliConfig;

/// File name looked up in the user's configuration directory.
pub const CONFIG_FILE_NAME: &str = "tempo-cli.toml";

/// `~/.config/tempo-cli.toml` on Linux, the platform equivalent elsewhere.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let dirs = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("could not determine the user config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Read, parse and validate the config file at `path`.
pub fn load_config(path: &Path) -> anyhow::Result<TempoCliConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read configuration file {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("invalid configuration file {}", path.display()))?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Parse and validate config file contents.
pub fn parse_config(content: &str) -> anyhow::Result<TempoCliConfig> {
    let config: TempoCliConfig = toml::from_str(content).context("error parsing TOML")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &TempoCliConfig) -> anyhow::Result<()> {
    let jira_url_ok = Url::parse(&config.jira_url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false);
    if !jira_url_ok {
        bail!("jira_url must be in format http(s)://url-of-jira");
    }
    if config.tempo.client_id.is_empty() {
        bail!("tempo.client_id must not be empty");
    }
    if config.tempo.client_secret.expose_secret().is_empty() {
        bail!("tempo.client_secret must not be empty");
    }
    if !config.jira.email.contains('@') {
        bail!("jira.email is not a valid email");
    }
    if config.jira.api_token.expose_secret().is_empty() {
        bail!("jira.api_token must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
jira_url = "https://acme.atlassian.net"

[tempo]
client_id = "client"
client_secret = "secret"

[jira]
email = "me@acme.com"
api_token = "token"
"#;

    fn error_for(content: &str) -> String {
        format!("{:#}", parse_config(content).unwrap_err())
    }

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config(VALID).unwrap();
        assert_eq!(config.jira_url, "https://acme.atlassian.net");
        assert_eq!(config.tempo.client_id, "client");
        assert_eq!(config.jira.email, "me@acme.com");
        assert!(config.stored_credentials().is_none());

        let oauth = config.oauth_config();
        assert_eq!(oauth.server_addr, "localhost:3000");
        assert_eq!(oauth.redirect_uri(), "http://localhost:3000");
    }

    #[test]
    fn test_parse_with_credentials_and_server_overrides() {
        let content = format!(
            "{VALID}\n[credentials]\naccess_token = \"a\"\nrefresh_token = \"r\"\nexpires_in = 3600\nexpires_at = 1700000000\n"
        )
        .replace(
            "client_secret = \"secret\"",
            "client_secret = \"secret\"\nserver_addr = \"127.0.0.1:8080\"",
        );
        let config = parse_config(&content).unwrap();
        let creds = config.stored_credentials().unwrap();
        assert_eq!(creds.access_token, "a");
        assert_eq!(creds.expires_at, 1_700_000_000);
        assert_eq!(config.oauth_config().redirect_uri(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_rejects_bad_jira_url() {
        let content = VALID.replace("https://acme.atlassian.net", "acme.atlassian.net");
        assert!(error_for(&content).contains("jira_url must be in format http(s)://url-of-jira"));
    }

    #[test]
    fn test_rejects_empty_client_fields() {
        let content = VALID.replace("client_id = \"client\"", "client_id = \"\"");
        assert!(error_for(&content).contains("tempo.client_id must not be empty"));

        let content = VALID.replace("client_secret = \"secret\"", "client_secret = \"\"");
        assert!(error_for(&content).contains("tempo.client_secret must not be empty"));
    }

    #[test]
    fn test_rejects_bad_jira_account() {
        let content = VALID.replace("me@acme.com", "me");
        assert!(error_for(&content).contains("jira.email is not a valid email"));

        let content = VALID.replace("api_token = \"token\"", "api_token = \"\"");
        assert!(error_for(&content).contains("jira.api_token must not be empty"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_config(Path::new("/nonexistent/tempo-cli.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("could not read configuration file"));
    }
}
