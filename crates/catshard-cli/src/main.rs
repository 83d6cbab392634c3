mod crawl;
mod merge;
mod prompt;

use catshard_core::SourceId;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catshard")]
#[command(about = "Crawl paginated shop catalogs into per-page CSV shards and merge them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl a source's catalog, writing one shard per listing page
    Crawl {
        /// Source to crawl: cando (c) or watts (w)
        source: SourceId,
        /// Listing URL to start from; defaults to the source's catalog root
        #[arg(long)]
        url: Option<String>,
        /// Page number of the first listing; defaults to the URL's `page=` value, else 1
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
    },
    /// Merge a source's shards into one consolidated CSV
    Merge {
        /// Source to merge; prompts when omitted
        source: Option<SourceId>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = catshard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Crawl { source, url, page } => {
            crawl::run_crawl(&config, source, url.as_deref(), page).await
        }
        Commands::Merge { source } => merge::run_merge(&config, source),
    }
}
