//! Command-line interface parsing for the Pokedex shell
//!
//! This module handles parsing of process arguments using clap and turns them
//! into a validated `ShellConfig`.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::{Endpoints, DEFAULT_BASE_URL};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    /// A duration option was zero
    #[error("--{0} must be at least 1 second")]
    ZeroDuration(&'static str),
}

/// Pokedex - explore PokeAPI location areas and catch pokemon
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Interactive Pokedex shell backed by PokeAPI")]
#[command(version)]
pub struct Cli {
    /// PokeAPI root URL
    #[arg(long, env = "POKEDEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds between cache sweeps; responses live one to two sweeps
    #[arg(long, env = "POKEDEX_CACHE_INTERVAL", default_value_t = 5, value_name = "SECS")]
    pub cache_interval: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration for a shell session
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Resource URLs
    pub endpoints: Endpoints,
    /// Interval between cache sweeps
    pub cache_interval: Duration,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Whether debug logging is enabled
    pub verbose: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            cache_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
            verbose: false,
        }
    }
}

impl ShellConfig {
    /// Creates a ShellConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(ShellConfig)` with validated settings
    /// * `Err(CliError)` if the base URL or a duration is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let base_url = cli.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }
        if cli.cache_interval == 0 {
            return Err(CliError::ZeroDuration("cache-interval"));
        }
        if cli.timeout == 0 {
            return Err(CliError::ZeroDuration("timeout"));
        }

        Ok(ShellConfig {
            endpoints: Endpoints::new(base_url),
            cache_interval: Duration::from_secs(cli.cache_interval),
            timeout: Duration::from_secs(cli.timeout),
            verbose: cli.verbose,
        })
    }

    /// Log filter directive for this configuration
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "pokedex=debug,warn"
        } else {
            "pokedex=warn"
        }
    }
}
