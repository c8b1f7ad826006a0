//! DriveMirror CLI - Command-line interface for DriveMirror
//!
//! Provides commands for:
//! - Bringing files under management (add, import)
//! - Replacing and removing managed content
//! - Running reconciliation and restore passes
//! - Inspecting records and configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use drivemirror_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    add::{AddCommand, ImportCommand},
    config::ConfigCommand,
    replace::{RemoveCommand, ReplaceCommand},
    status::{ShowCommand, StatusCommand},
    sync::{RestoreCommand, SyncCommand},
};
use output::{OutputFormat, OutputOptions};

#[derive(Debug, Parser)]
#[command(
    name = "drivemirror",
    version,
    about = "Mirror local files into Google Drive"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bring a local file under management
    Add(AddCommand),
    /// Import content from a URL
    Import(ImportCommand),
    /// Replace the content of a managed record
    Replace(ReplaceCommand),
    /// Queue a managed record for removal from Drive
    Remove(RemoveCommand),
    /// Run one reconciliation pass against Drive
    Sync(SyncCommand),
    /// Restore locally missing content from Drive
    Restore(RestoreCommand),
    /// Show record counts by sync status
    Status(StatusCommand),
    /// Show one record in detail
    Show(ShowCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let output = OutputOptions {
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        },
        quiet: cli.quiet,
    };

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Add(cmd) => cmd.execute(output, &config_path).await,
        Commands::Import(cmd) => cmd.execute(output, &config_path).await,
        Commands::Replace(cmd) => cmd.execute(output, &config_path).await,
        Commands::Remove(cmd) => cmd.execute(output, &config_path).await,
        Commands::Sync(cmd) => cmd.execute(output, &config_path).await,
        Commands::Restore(cmd) => cmd.execute(output, &config_path).await,
        Commands::Status(cmd) => cmd.execute(output, &config_path).await,
        Commands::Show(cmd) => cmd.execute(output, &config_path).await,
        Commands::Config(cmd) => cmd.execute(output, &config_path).await,
    }
}
