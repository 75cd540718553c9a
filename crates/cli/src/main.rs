mod auth_commands;
mod issue_commands;

use std::path::PathBuf;

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    tempo_config::{TempoCliConfig, default_config_path, load_config},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "tempo", about = "Tempo login and Jira issue browser", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file [default: <config dir>/tempo-cli.toml].
    #[arg(long, global = true, env = "TEMPO_CLI_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tempo authentication.
    Auth {
        #[command(subcommand)]
        action: auth_commands::AuthAction,
    },
    /// Show the Jira account the configured API token belongs to.
    Whoami,
    /// List every issue you may log work on.
    Issues,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Resolve the config path and load it.
fn load(cli_path: Option<PathBuf>) -> anyhow::Result<(PathBuf, TempoCliConfig)> {
    let path = match cli_path {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = load_config(&path).context("error loading configuration")?;
    Ok((path, config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "tempo starting");

    let (path, config) = load(cli.config)?;
    match cli.command {
        Commands::Auth { action } => auth_commands::handle_auth(action, &path, &config).await,
        Commands::Whoami => {
            auth_commands::ensure_logged_in(&path, &config).await?;
            issue_commands::whoami(&config).await
        },
        Commands::Issues => {
            auth_commands::ensure_logged_in(&path, &config).await?;
            issue_commands::list_issues(&config).await
        },
    }
}
