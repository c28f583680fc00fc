use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use hookrelay::config::{DEFAULT_COORDINATOR_PASSWORD, DEFAULT_COORDINATOR_USERNAME};
use hookrelay::utils::logging::init_logging;
use hookrelay::utils::pidfile::PidFile;
use hookrelay::{create_app, CoordinatorCredentials, LogLevel, RelayClient, ServerState};

/// Relays GitHub pull request webhooks to a CI coordinator.
#[derive(clap::Parser)]
#[command(version)]
struct Opts {
    /// Port the HTTP server listens to for the GitHub webhook.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// Coordinator host and port, e.g. `localhost:9989`.
    #[arg(short = 'm', long, env = "BUILDMASTER", default_value = "localhost:9989")]
    buildmaster: String,

    /// Path of the file the log is appended to.
    #[arg(short = 'l', long = "log", default_value_os_t = default_log_path())]
    log: PathBuf,

    /// Logging level.
    #[arg(short = 'L', long, value_enum, default_value_t = LogLevel::Warn)]
    level: LogLevel,

    /// The GitHub server. Only used for reporting.
    #[arg(short = 'g', long, default_value = "github.com")]
    github: String,

    /// Write the process identifier to this file on start. The file is removed on clean exit.
    #[arg(long)]
    pidfile: Option<PathBuf>,

    /// Username used to log in to the coordinator.
    #[arg(long, env = "COORDINATOR_USERNAME", default_value = DEFAULT_COORDINATOR_USERNAME)]
    username: String,

    /// Password used to log in to the coordinator.
    #[arg(
        long,
        env = "COORDINATOR_PASSWORD",
        default_value = DEFAULT_COORDINATOR_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    password: String,
}

fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("github_buildbot.log")
}

async fn server(state: ServerState, port: u16) -> anyhow::Result<()> {
    let app = create_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot listen on {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(error) => {
            tracing::error!("Cannot listen for shutdown signal: {error:?}");
            std::future::pending::<()>().await;
        }
    }
}

fn try_main(opts: Opts) -> anyhow::Result<()> {
    // Dropped last, so that everything logged below reaches the log file.
    let _log_guard = init_logging(opts.level, &opts.log)?;
    tracing::debug!("Starting");

    let _pid_file = opts
        .pidfile
        .map(PidFile::create)
        .transpose()
        .context("Cannot write PID file")?;

    // Requests are served cooperatively from a single thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;

    let credentials = CoordinatorCredentials::new(opts.username, opts.password);
    let relay = RelayClient::new(opts.buildmaster, credentials);
    tracing::info!(
        "Listening on port {} for webhooks from {}, relaying to {}",
        opts.port,
        opts.github,
        relay.address()
    );

    let state = ServerState::new(Arc::new(relay));
    runtime.block_on(server(state, opts.port))?;

    tracing::info!("Server has ended");
    Ok(())
}

fn main() {
    let opts = Opts::parse();
    if let Err(error) = try_main(opts) {
        eprintln!("Error: {error:?}");
        std::process::exit(1);
    }
}
