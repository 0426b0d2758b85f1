//! venuefinder - search event venues through a place-search provider
//!
//! Thin command-line front end over the search service: one-shot `search`
//! and `details` commands, and a `serve` mode that keeps the cache alive
//! across newline-delimited JSON requests on stdin.

use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tokio::io::{stdin, stdout, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use venuefinder::cache::{CacheStore, SweepHandle, TtlCache};
use venuefinder::cli::{Cli, Command};
use venuefinder::config::Config;
use venuefinder::data::{CachedValue, PlacesClient};
use venuefinder::{serve, VenueSearch};

/// Sets up log output on stderr, leaving stdout for JSON responses
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(_) => debug!("no .env file found"),
    }

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(key) = cli.api_key.clone() {
        config.api_key = Some(key);
    }
    config.check_api_key();
    let language = cli.language.unwrap_or(config.default_language);

    let provider = Arc::new(PlacesClient::from_config(&config)?);
    let cache: Arc<TtlCache<CachedValue>> = Arc::new(TtlCache::new(config.cache_ttl));
    let service = VenueSearch::from_config(&config, provider, cache.clone());

    match cli.command {
        Command::Search(args) => {
            let response = service.search(&args.to_request(language)).await?;
            print_json(&response)?;
        }
        Command::Details { place_id } => {
            let details = service.details(&place_id, language).await?;
            print_json(&details)?;
        }
        Command::Serve => {
            let sweeper = SweepHandle::spawn(
                cache.clone() as Arc<dyn CacheStore<CachedValue>>,
                config.sweep_interval,
            );
            info!(
                ttl_secs = config.cache_ttl.as_secs(),
                sweep_secs = config.sweep_interval.as_secs(),
                "serving requests from stdin"
            );

            serve::run(&service, language, BufReader::new(stdin()), stdout()).await?;

            sweeper.shutdown().await;
            info!(stats = ?cache.stats(), "input closed, shutting down");
        }
    }

    Ok(())
}
