//! Tracklet - Minimal issue tracking REST API
//!
//! Main entry point for the tracklet server binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracklet::config::ServerConfig;
use tracklet::server::IssueServer;

/// Tracklet - per-project issue tracking over HTTP
#[derive(Parser, Debug)]
#[command(name = "tracklet")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/tracklet/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file
    Init,

    /// Run the HTTP server
    Serve {
        /// Bind address (overrides config)
        #[arg(short, long, env = "TRACKLET_BIND")]
        bind: Option<String>,

        /// Database path (overrides config)
        #[arg(short, long, env = "TRACKLET_DB")]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = tracklet::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ServerConfig::default_path);

    let result = match cli.command {
        Commands::Init => init(&config_path),
        Commands::Serve { bind, database } => serve(&config_path, bind, database).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init(config_path: &std::path::Path) -> tracklet::Result<()> {
    let config = ServerConfig::default();
    config.save(config_path)?;
    println!("Wrote {}", config_path.display());
    Ok(())
}

async fn serve(
    config_path: &std::path::Path,
    bind: Option<String>,
    database: Option<PathBuf>,
) -> tracklet::Result<()> {
    let mut config = ServerConfig::load_or_default(config_path)?;
    if let Some(database) = database {
        config.database = database;
    }
    let addr = bind.unwrap_or_else(|| config.bind_addr());

    let server = IssueServer::new(&config.database)?;
    server.run(&addr).await
}
