use std::{path::Path, time::Duration};

use {
    anyhow::{Context, Result},
    clap::Subcommand,
    tempo_config::{ConfigFileStore, TempoCliConfig},
    tempo_oauth::{AuthError, CredentialStore, Credentials, OAuthFlow, Renewal, types::now_unix},
    tokio_util::sync::CancellationToken,
    tracing::warn,
};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in to Tempo via OAuth in the browser.
    Login {
        /// Give up waiting for the browser redirect after this many seconds.
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },
    /// Refresh the Tempo access token if it has expired.
    Renew {
        /// Refresh even if the current token is still valid.
        #[arg(long)]
        force: bool,
    },
    /// Show whether you are logged in and how long the token stays valid.
    Status,
}

pub async fn handle_auth(action: AuthAction, path: &Path, config: &TempoCliConfig) -> Result<()> {
    let store = ConfigFileStore::new(path);
    match action {
        AuthAction::Login { timeout } => login(config, &store, Duration::from_secs(timeout)).await,
        AuthAction::Renew { force } => renew(config, &store, force).await,
        AuthAction::Status => {
            println!("{}", status_line(store.load_credentials()?.as_ref(), now_unix()));
            Ok(())
        },
    }
}

async fn login(
    config: &TempoCliConfig,
    store: &dyn CredentialStore,
    timeout: Duration,
) -> Result<()> {
    let flow = OAuthFlow::new(config.oauth_config());
    println!("Opening login link in your browser...");

    let cancel = CancellationToken::new();
    let watchdog = spawn_watchdog(cancel.clone(), timeout);
    let result = flow.login(cancel.clone()).await;
    cancel.cancel();
    if let Err(e) = watchdog.await {
        warn!(error = %e, "login watchdog task failed");
    }

    let credentials = result.context("there was an error logging in")?;
    store.save_credentials(&credentials)?;
    println!("Successfully logged in to Tempo");
    Ok(())
}

/// Cancel the login wait on timeout or Ctrl-C.
fn spawn_watchdog(cancel: CancellationToken, timeout: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {},
            _ = tokio::time::sleep(timeout) => {
                warn!(timeout_secs = timeout.as_secs(), "no authorization code received in time");
                cancel.cancel();
            },
            _ = tokio::signal::ctrl_c() => {
                warn!("login interrupted");
                cancel.cancel();
            },
        }
    })
}

async fn renew(config: &TempoCliConfig, store: &dyn CredentialStore, force: bool) -> Result<()> {
    let flow = OAuthFlow::new(config.oauth_config());
    match flow.renew(store, force).await {
        Ok(Renewal::StillValid(credentials)) => {
            println!("{}", status_line(Some(&credentials), now_unix()));
            Ok(())
        },
        Ok(Renewal::Refreshed(_)) => {
            println!("Successfully renewed");
            Ok(())
        },
        Err(e) => Err(e).context("there was an error refreshing the access token"),
    }
}

/// Check that a login exists and refresh the access token if it has expired.
///
/// Runs before every command that talks to Jira on the user's behalf.
pub async fn ensure_logged_in(path: &Path, config: &TempoCliConfig) -> Result<()> {
    let store = ConfigFileStore::new(path);
    let flow = OAuthFlow::new(config.oauth_config());
    ensure_fresh(&flow, &store).await
}

async fn ensure_fresh(flow: &OAuthFlow, store: &dyn CredentialStore) -> Result<()> {
    match flow.renew(store, false).await {
        Ok(Renewal::StillValid(_)) => Ok(()),
        Ok(Renewal::Refreshed(_)) => {
            println!("Tempo access token expired, successfully renewed");
            Ok(())
        },
        Err(AuthError::NotLoggedIn) => Err(AuthError::NotLoggedIn.into()),
        Err(e) => Err(e).context("there was an error refreshing the access token"),
    }
}

/// One-line login status for `credentials` at time `now`.
fn status_line(credentials: Option<&Credentials>, now: u64) -> String {
    let Some(credentials) = credentials.filter(|c| !c.is_empty()) else {
        return "Not logged in. Run `tempo auth login` first.".to_string();
    };
    match credentials.remaining_secs(now) {
        Some(remaining) => {
            let hours = remaining / 3600;
            let mins = (remaining % 3600) / 60;
            format!("Logged in to Tempo [valid ({hours}h {mins}m remaining)]")
        },
        None => "Logged in to Tempo [expired, run `tempo auth renew`]".to_string(),
    }
}
