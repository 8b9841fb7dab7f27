use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;

use vault_catalog::config::{Config, ConfigError};
use vault_catalog::process;

/// Vault catalog service: datasets, version exports, OCFL object versions,
/// and tar containers.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on for HTTP requests
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Path to the SQLite database file (in-memory if not set)
    #[arg(short, long)]
    sqlite_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if args.sqlite_path.is_some() {
        config.sqlite_path = args.sqlite_path;
    }
    if let Some(level) = args.log_level {
        config.log_level =
            tracing::Level::from_str(&level).map_err(|_| ConfigError::InvalidLogLevel(level))?;
    }

    process::spawn_service(&config).await;
    Ok(())
}
