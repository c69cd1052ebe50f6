//! Lingo24 - command-line client for the Business Documents API.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{auth, config, file, list, project, status};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Lingo24 - translate documents through the Business Documents API
#[derive(Parser)]
#[command(name = "lingo24")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of the discovered ones
    #[arg(long, global = true, env = "LINGO24_CONFIG")]
    pub config: Option<PathBuf>,

    /// Deployment to talk to: live or demo
    #[arg(long, global = true, env = "LINGO24_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// OAuth2 authorization and token management
    Auth(auth::AuthArgs),

    /// Show API version (no authentication needed)
    Status(status::StatusArgs),

    /// List domains, locales, services or projects
    List(list::ListArgs),

    /// Inspect and move projects through the quote workflow
    Project(project::ProjectArgs),

    /// File operations
    File(file::FileArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = commands::load(cli.config.as_deref())?;

    // Console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "lingo24=debug,lingo24_client=debug,lingo24_config=debug,info"
    } else {
        "lingo24=info,lingo24_client=info,warn"
    };

    let log_dir = loaded
        .config_dir
        .as_ref()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "lingo24.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "lingo24=trace,lingo24_client=trace,lingo24_config=trace,info",
                )),
        )
        .init();

    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let ctx = commands::Context::new(loaded, cli.endpoint.as_deref(), cli.json, cli.verbose)?;

    match cli.command {
        Commands::Auth(args) => auth::run(args, &ctx),
        Commands::Status(args) => status::run(args, &ctx),
        Commands::List(args) => list::run(args, &ctx),
        Commands::Project(args) => project::run(args, &ctx),
        Commands::File(args) => file::run(args, &ctx),
        Commands::Config(args) => config::run(args, &ctx),
    }
}
