//! Pokedex CLI - explore PokeAPI from an interactive shell
//!
//! Pages through location areas, explores them, and catches and inspects
//! pokemon. Raw API responses are cached in memory for a few seconds.

use std::io;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pokedex::cache::ExpiringCache;
use pokedex::catch::RandomRoll;
use pokedex::cli::{Cli, ShellConfig};
use pokedex::commands::Dispatcher;
use pokedex::data::HttpFetcher;
use pokedex::repl;

/// Sets up logging on stderr; `RUST_LOG` overrides the default filter
fn init_tracing(config: &ShellConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ShellConfig::from_cli(&cli)?;

    init_tracing(&config);
    info!(
        base_url = %config.endpoints.first_location_page(),
        cache_interval = ?config.cache_interval,
        "starting pokedex"
    );

    let fetcher = Arc::new(HttpFetcher::with_timeout(config.timeout)?);

    // Cache and reaper live for the whole session
    let cache = ExpiringCache::new();
    let reaper = cache.start_reaper(config.cache_interval);

    let mut dispatcher = Dispatcher::new(
        config.endpoints.clone(),
        cache,
        fetcher,
        Box::new(RandomRoll),
    );

    let mut lines = repl::spawn_line_reader(io::BufReader::new(io::stdin()));
    let mut stdout = io::stdout();
    repl::run(&mut dispatcher, &mut lines, &mut stdout).await?;

    reaper.shutdown().await;
    Ok(())
}
