use std::{
    net::SocketAddr,
    sync::{Arc, OnceLock},
};

use {
    axum::{
        Router,
        extract::{Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::Deserialize,
    tokio::net::TcpListener,
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::error::{AuthError, Result};

/// Query parameters Tempo appends to the redirect URI.
#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

/// Per-server state shared with the request handler.
#[derive(Clone)]
struct CallbackState {
    code: Arc<OnceLock<String>>,
    shutdown: CancellationToken,
}

/// Short-lived local HTTP server that captures the OAuth redirect.
///
/// Every login attempt binds its own server with its own router; nothing is
/// registered globally, so repeated or concurrent attempts never collide.
pub struct CallbackServer {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl CallbackServer {
    /// Bind the listener. Failing here means the port is taken or not permitted.
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| AuthError::ServerBind {
                addr: addr.to_string(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(AuthError::Server)?;
        debug!(%local_addr, "callback server bound");
        Ok(Self {
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until a request carries a non-empty `code`, then shut down and
    /// return it.
    ///
    /// Requests without a code get a 400 and the server keeps listening. If
    /// `cancel` fires first the server stops and [`AuthError::Cancelled`] is
    /// returned.
    pub async fn wait_for_code(self, cancel: CancellationToken) -> Result<String> {
        let state = CallbackState {
            code: Arc::new(OnceLock::new()),
            shutdown: cancel.child_token(),
        };
        let app = Router::new()
            .fallback(handle_callback)
            .with_state(state.clone());

        info!(addr = %self.local_addr, "waiting for OAuth callback");
        axum::serve(self.listener, app)
            .with_graceful_shutdown(state.shutdown.clone().cancelled_owned())
            .await
            .map_err(AuthError::Server)?;

        match state.code.get() {
            Some(code) => Ok(code.clone()),
            None => Err(AuthError::Cancelled),
        }
    }
}

async fn handle_callback(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    match params.code.filter(|c| !c.is_empty()) {
        Some(code) => {
            // Only the first code wins; later redirects racing the shutdown are ignored.
            if state.code.set(code).is_ok() {
                debug!("authorization code received, shutting down callback server");
                state.shutdown.cancel();
            }
            (
                StatusCode::OK,
                "Login successful. You may now close this browser tab.",
            )
                .into_response()
        },
        None => {
            warn!(error = ?params.error, "callback request without authorization code");
            StatusCode::BAD_REQUEST.into_response()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn_server() -> (
        SocketAddr,
        CancellationToken,
        tokio::task::JoinHandle<Result<String>>,
    ) {
        let server = CallbackServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(server.wait_for_code(cancel.clone()));
        (addr, cancel, handle)
    }

    #[tokio::test]
    async fn test_code_is_captured_and_server_stops() {
        let (addr, _cancel, handle) = spawn_server().await;

        let status = reqwest::get(format!("http://{addr}/?code=ABC123&state=xyz"))
            .await
            .unwrap()
            .status();
        assert_eq!(status, StatusCode::OK);

        let code = handle.await.unwrap().unwrap();
        assert_eq!(code, "ABC123");

        // The address is free again once the server has stopped.
        TcpListener::bind(addr).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_code_is_rejected_and_server_keeps_listening() {
        let (addr, _cancel, handle) = spawn_server().await;

        let status = reqwest::get(format!("http://{addr}/?error=access_denied"))
            .await
            .unwrap()
            .status();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let status = reqwest::get(format!("http://{addr}/?code="))
            .await
            .unwrap()
            .status();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!handle.is_finished());

        let status = reqwest::get(format!("http://{addr}/callback?code=SECOND"))
            .await
            .unwrap()
            .status();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(handle.await.unwrap().unwrap(), "SECOND");
    }

    #[tokio::test]
    async fn test_cancel_stops_server_without_code() {
        let (addr, cancel, handle) = spawn_server().await;
        cancel.cancel();

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, AuthError::Cancelled), "got {err:?}");
        TcpListener::bind(addr).await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let err = CallbackServer::bind(&addr).await.err().unwrap();
        assert!(
            matches!(err, AuthError::ServerBind { addr: ref a, .. } if *a == addr),
            "got {err:?}"
        );
    }
}
