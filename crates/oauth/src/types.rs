use std::time::{SystemTime, UNIX_EPOCH};

use {
    secrecy::SecretString,
    serde::{Deserialize, Serialize},
};

/// Tempo's OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://api.tempo.io/oauth/token/";

/// Address the callback server listens on when none is configured.
pub const DEFAULT_SERVER_ADDR: &str = "localhost:3000";

/// OAuth 2.0 client configuration for the Tempo app registered in Jira.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Base URL of the Jira Cloud instance, e.g. `https://acme.atlassian.net`.
    pub jira_url: String,
    pub token_url: String,
    /// `host:port` the local callback server binds to.
    pub server_addr: String,
    /// Overrides the redirect URI sent to Tempo; defaults to `http://{server_addr}`.
    pub redirect_uri: Option<String>,
}

impl OAuthConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: SecretString,
        jira_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            jira_url: jira_url.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            redirect_uri: None,
        }
    }

    pub fn redirect_uri(&self) -> String {
        match &self.redirect_uri {
            Some(uri) if !uri.is_empty() => uri.clone(),
            _ => format!("http://{}", self.server_addr),
        }
    }
}

/// Tempo access/refresh token pair as returned by the token endpoint.
///
/// `expires_at` is not part of the provider response; it is stamped locally
/// when the pair is received so callers can decide when to refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds, counted from issue time.
    pub expires_in: u64,
    /// Unix timestamp when the access token expires.
    pub expires_at: u64,
}

impl Credentials {
    /// Returns a copy with `expires_at` recomputed from `issued_at`.
    pub fn with_issue_time(self, issued_at: u64) -> Self {
        Self {
            expires_at: issued_at.saturating_add(self.expires_in),
            ..self
        }
    }

    /// True when no login has ever been stored.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty() && self.refresh_token.is_empty()
    }

    /// True when both tokens are present, the only state worth persisting.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at <= now
    }

    /// Seconds until expiry, or `None` if already expired.
    pub fn remaining_secs(&self, now: u64) -> Option<u64> {
        self.expires_at.checked_sub(now).filter(|s| *s > 0)
    }
}

/// Current time as seconds since the Unix epoch.
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuthConfig {
        OAuthConfig::new(
            "client",
            SecretString::new("secret".into()),
            "https://acme.atlassian.net",
        )
    }

    #[test]
    fn test_redirect_uri_defaults_to_server_addr() {
        let mut cfg = config();
        assert_eq!(cfg.redirect_uri(), "http://localhost:3000");

        cfg.server_addr = "127.0.0.1:4567".into();
        assert_eq!(cfg.redirect_uri(), "http://127.0.0.1:4567");

        cfg.redirect_uri = Some("https://example.com/cb".into());
        assert_eq!(cfg.redirect_uri(), "https://example.com/cb");
    }

    #[test]
    fn test_issue_time_recomputes_expiry() {
        let creds = Credentials {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_in: 3600,
            expires_at: 1,
        };
        let stamped = creds.with_issue_time(1_000);
        assert_eq!(stamped.expires_at, 4_600);
        assert!(!stamped.is_expired_at(4_599));
        assert!(stamped.is_expired_at(4_600));
        assert_eq!(stamped.remaining_secs(4_000), Some(600));
        assert_eq!(stamped.remaining_secs(5_000), None);
    }

    #[test]
    fn test_missing_fields_decode_to_zero_values() {
        let creds: Credentials = serde_json::from_str(r#"{"access_token":"a"}"#).unwrap();
        assert_eq!(creds.access_token, "a");
        assert_eq!(creds.refresh_token, "");
        assert_eq!(creds.expires_in, 0);
        assert!(!creds.is_empty());
        assert!(!creds.is_complete());
        assert!(Credentials::default().is_empty());
        assert!(!Credentials::default().is_complete());
    }

    #[test]
    fn test_json_round_trip_keeps_expiry_window() {
        let before = now_unix();
        let creds = Credentials {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_in: 3600,
            expires_at: 0,
        }
        .with_issue_time(now_unix());
        let after = now_unix();

        let json = serde_json::to_string(&creds).unwrap();
        let decoded: Credentials = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, creds);
        assert!(decoded.expires_at >= before + 3600);
        assert!(decoded.expires_at <= after + 3600);
    }
}
