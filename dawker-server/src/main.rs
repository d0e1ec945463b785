//! dawker-server - DAW rig configuration backend
//!
//! Resolves the data folder, starts the log pipeline, opens the database and
//! serves the HTTP API.

use anyhow::Result;
use clap::Parser;
use dawker_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use dawker_common::db::init_database;
use dawker_common::logging::{init_logging, LoggingConfig};
use dawker_server::{build_router, AppState};
use std::path::PathBuf;
use tracing::{error, info};

/// Command line arguments; each falls back to an environment variable
#[derive(Debug, Parser)]
#[command(name = "dawker-server", version, about = "Dawker DAW configuration backend")]
struct Args {
    /// Data folder holding the database and logs
    #[arg(long, env = "DAWKER_ROOT")]
    root_folder: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/dawker/config.toml)
    #[arg(long, env = "DAWKER_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file
    #[arg(long, env = "DAWKER_HOST")]
    host: Option<String>,

    /// Listen port, overriding the config file
    #[arg(long, env = "DAWKER_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml = match &args.config {
        Some(path) => TomlConfig::load(path)?,
        None => TomlConfig::load_or_default(),
    };

    let root_folder = RootFolderResolver::new(args.root_folder.clone(), &toml).resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let _logging = init_logging(&LoggingConfig::from_toml(&toml, initializer.root()))?;

    info!(
        "Starting Dawker server v{} with data folder {}",
        env!("CARGO_PKG_VERSION"),
        initializer.root().display()
    );

    let db_path = initializer.database_path();
    let pool = match init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database {}: {}", db_path.display(), e);
            return Err(e.into());
        }
    };

    let app = build_router(AppState::new(pool));

    let host = args.host.unwrap_or(toml.server.host);
    let port = args.port.unwrap_or(toml.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("dawker-server listening on http://{}:{}", host, port);
    info!("Health check: http://{}:{}/health", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}
