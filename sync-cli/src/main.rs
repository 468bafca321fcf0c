//! # contentsync
//!
//! Command-line front end for content snapshots.
//!
//! ## Commands
//!
//! - `scan`: Build and summarize the current snapshot
//! - `plan`: Reconcile the stored base against the current snapshot
//! - `commit`: Store the current snapshot as the new base
//! - `show`: Print a stored snapshot
//!
//! ## Example
//!
//! ```bash
//! # Record what is on disk now
//! contentsync commit
//!
//! # Later, see what changed since then
//! contentsync plan
//!
//! # Join a cluster without trusting local removals; they become pulls
//! contentsync --policy allow_join_removals=false plan --join cluster-farm
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod scanner;

use commands::{commit, plan, scan, show};
use config::{AppConfig, Config};

/// Reconcile and persist content snapshots.
#[derive(Parser, Debug)]
#[command(name = "contentsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for configuration and stored snapshots
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (default: <data-dir>/contentsync.toml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Policy override as key=value (repeatable)
    #[arg(long, global = true, value_name = "KEY=VALUE")]
    policy: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build and summarize the current snapshot
    Scan {
        /// List every item, not just per-root counts
        #[arg(long, short)]
        list: bool,
    },

    /// Show the modifications between the stored base and the current snapshot
    Plan {
        /// Reconcile in join mode against this stored reference snapshot
        #[arg(long, value_name = "NAME")]
        join: Option<String>,
    },

    /// Scan and store the current snapshot as the new base
    Commit,

    /// Print a stored snapshot (default: the base)
    Show {
        /// Stored snapshot name
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let config = Config::locate(cli.config.as_deref(), &data_dir)?;
    let app = AppConfig::resolve(config, &data_dir, &cli.policy)?;
    tracing::debug!("Profile {} using {}", app.key, app.persister.directory().display());

    match cli.command {
        Commands::Scan { list } => {
            scan::run(&app, list).await?;
        }
        Commands::Plan { join } => {
            plan::run(&app, join.as_deref()).await?;
        }
        Commands::Commit => {
            commit::run(&app).await?;
        }
        Commands::Show { name } => {
            show::run(&app, name.as_deref()).await?;
        }
    }

    Ok(())
}

/// Get the default data directory for contentsync.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "contentsync", "contentsync")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
