// src/main.rs

//! feedsky: RSS → Bluesky bot CLI
//!
//! Reads an RSS feed, posts entries it has not seen before to a Bluesky
//! account, and remembers what it posted in a bounded cache file. Meant
//! to be invoked from a scheduler; overlapping runs against the same
//! cache file are not supported.

use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;

use feedsky::error::Result;
use feedsky::models::{BotOptions, Config, DEFAULT_CACHE_FILE};
use feedsky::pipeline::Bot;

/// feedsky - RSS to Bluesky publishing bot
#[derive(Parser, Debug)]
#[command(
    name = "feedsky",
    version,
    about = "Posts new RSS feed entries to a Bluesky account"
)]
struct Cli {
    /// URL of the RSS feed to watch
    #[arg(long)]
    rss_feed: String,

    /// Path of the publish-history cache file
    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    cache_file: PathBuf,

    /// Maximum number of fingerprints kept in the cache
    #[arg(long, default_value_t = 100)]
    cache_limit: usize,

    /// Publish quota for the very first run (no cache file yet)
    #[arg(long, default_value_t = 1)]
    initial_post_limit: usize,

    /// Publish quota for steady-state runs
    #[arg(long, default_value_t = 1)]
    post_limit: usize,

    /// Compute the new items but do not publish or touch the cache
    #[arg(long)]
    dry_run: bool,

    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    };
    config.validate()?;

    let options = BotOptions {
        cache_file: cli.cache_file,
        cache_limit: cli.cache_limit,
        initial_post_limit: cli.initial_post_limit,
        post_limit: cli.post_limit,
        dry_run: cli.dry_run,
    };

    let new_items = Bot::run(&cli.rss_feed, &options, config).await?;

    log::info!("{} new items this run", new_items.len());
    log::debug!(
        "Run result: {}",
        serde_json::to_string_pretty(&new_items).unwrap_or_default()
    );

    Ok(())
}
