//! Tempo OAuth 2.0 login: authorization-code flow with a local callback
//! server, token exchange and refresh.

pub mod callback_server;
pub mod error;
pub mod exchange;
pub mod flow;
pub mod storage;
pub mod types;

pub use {
    callback_server::CallbackServer,
    error::AuthError,
    exchange::TokenExchange,
    flow::{OAuthFlow, Renewal},
    storage::{CredentialStore, MemoryCredentialStore},
    types::{Credentials, OAuthConfig},
};
