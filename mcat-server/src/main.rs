//! mcat-server - Music catalogue ingestion service
//!
//! `mcat-server init` creates the catalogue database and seeds the format
//! table. `mcat-server serve` (the default) does the same and then serves
//! the HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcat_common::config::{load_toml_config, ConfigOverrides, ServiceConfig};
use mcat_server::db::SqliteCollection;
use mcat_server::ingest::FsStreamStore;
use mcat_server::AppState;

/// Command-line arguments for mcat-server
#[derive(Parser, Debug)]
#[command(name = "mcat-server")]
#[command(about = "Music catalogue ingestion service")]
#[command(version)]
struct Args {
    /// Config file (defaults to <config dir>/mcat/config.toml)
    #[arg(short, long, global = true, env = "MCAT_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the database and stored streams
    #[arg(short, long, global = true, env = "MCAT_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Catalogue database file
    #[arg(long, global = true, env = "MCAT_DATABASE")]
    database: Option<PathBuf>,

    /// Directory of the stream store
    #[arg(long, global = true, env = "MCAT_STREAMS_DIR")]
    streams_dir: Option<PathBuf>,

    /// Directory for temporary upload buffers
    #[arg(long, global = true, env = "MCAT_SPOOL_DIR")]
    spool_dir: Option<PathBuf>,

    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, global = true, env = "MCAT_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database schema and seed the format table
    Init,
    /// Initialise if needed, then serve the HTTP API
    Serve {
        /// Listen address, e.g. 127.0.0.1:6000
        #[arg(short, long, env = "MCAT_BIND_ADDRESS")]
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file = load_toml_config(args.config.as_deref())?;
    let bind_address = match &args.command {
        Some(Command::Serve { address }) => address.clone(),
        _ => None,
    };
    let config = ServiceConfig::resolve(
        ConfigOverrides {
            root_folder: args.root_folder,
            bind_address,
            database: args.database,
            streams_dir: args.streams_dir,
            spool_dir: args.spool_dir,
            log_level: args.log_level,
        },
        file,
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mcat-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Root folder: {}", config.root_folder.display());

    config
        .ensure_directories()
        .context("Failed to create service directories")?;

    let pool = mcat_common::db::init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database: {}", config.database_path.display());

    if matches!(args.command, Some(Command::Init)) {
        info!("Catalogue initialized");
        return Ok(());
    }

    let store = FsStreamStore::new(&config.streams_dir).with_context(|| {
        format!(
            "Failed to open stream store at {}",
            config.streams_dir.display()
        )
    })?;
    info!("Stream store: {}", store.directory().display());

    let state = AppState::new(
        Arc::new(SqliteCollection::new(pool)),
        Arc::new(store),
        config.spool_dir.clone(),
    );
    let app = mcat_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    info!("Listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
