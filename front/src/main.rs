use std::{io, path::PathBuf};

use clap::Parser;
use taskify_front::{
    cache::CACHE_FILE,
    cli::{self, Command},
    Board, FileCache, ServiceClient,
};
use tracing_subscriber::EnvFilter;

/// Personal task list.
///
/// Works on the local cache unless `--server` points it at a task store
/// service. The two are never mixed.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON file holding the local task list.
    #[arg(long, env = "TASKIFY_CACHE", default_value = CACHE_FILE)]
    cache: PathBuf,

    /// Base URL of a task store service to use instead of the local cache.
    #[arg(long, env = "TASKIFY_SERVER")]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();
    let mut out = io::stdout().lock();

    match args.server {
        Some(url) => cli::run_remote(&ServiceClient::new(url), args.command, &mut out).await,
        None => {
            let mut board = Board::open(FileCache::new(args.cache));
            cli::run_local(&mut board, args.command, &mut out)
        }
    }
}
