//! # issuesync CLI
//!
//! Runs one full sync cycle and exits. Designed to be triggered by an
//! external scheduler (cron, Task Scheduler); it is not long-running.
//!
//! ```bash
//! issuesync --config ./config/issuesync.toml
//! ```
//!
//! Exit code policy: `0` whenever the run itself could start, even if some
//! threads failed or the indexer misbehaved (those show up in the printed
//! summary). Nonzero only for startup failures — an unparseable config file
//! or a documents directory that cannot be created.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use issuesync::config;
use issuesync::fetch::GithubSource;
use issuesync::sync;

/// Mirror remote issue-thread comments into local RAG documents and rebuild
/// the search index.
#[derive(Parser)]
#[command(
    name = "issuesync",
    about = "Mirror remote issue-thread comments into local RAG documents and rebuild the search index",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Missing file = built-in defaults.
    #[arg(long, default_value = "./config/issuesync.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    let source = GithubSource::new(&cfg.github)?;
    sync::run_sync(&cfg, &source).await?;

    Ok(())
}
