use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

/// Failures of the Tempo login and token refresh flows.
///
/// Wrapped causes are exposed through `source()` only, so an error chain
/// printed by the caller names each cause once.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint could not be reached or answered with an error status.
    #[error("token request failed")]
    Transport(#[from] reqwest::Error),

    /// The token endpoint answered with something that is not JSON.
    #[error("malformed token response")]
    Decode(#[from] serde_json::Error),

    /// The token endpoint answered 2xx without an access or refresh token.
    #[error("token response did not contain both an access and a refresh token")]
    IncompleteCredentials,

    #[error("could not start callback server on {addr}")]
    ServerBind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("callback server failed")]
    Server(#[source] io::Error),

    #[error("login was cancelled before an authorization code was received")]
    Cancelled,

    #[error("you are not logged in, run `tempo auth login` first")]
    NotLoggedIn,

    #[error("credential store failed")]
    Store(#[source] anyhow::Error),
}
