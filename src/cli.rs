//! Command-line interface parsing for tripgen
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the settings the app starts with: where the itinerary service
//! lives, an optional country to search right away, and the trip length.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::app::{DEFAULT_DAYS, MAX_DAYS};
use crate::data::DEFAULT_API_URL;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The API URL could not be parsed or is not http(s)
    #[error("Invalid API URL: '{0}'. Expected something like http://127.0.0.1:8000")]
    InvalidApiUrl(String),

    /// A zero timeout would fail every request
    #[error("Invalid timeout: must be at least 1 second")]
    InvalidTimeout,
}

/// tripgen - plan a multi-city trip with an AI itinerary service
#[derive(Parser, Debug)]
#[command(name = "tripgen")]
#[command(about = "Plan a multi-city trip with an AI itinerary service")]
#[command(version)]
pub struct Cli {
    /// Base URL of the itinerary service
    #[arg(long, value_name = "URL", env = "TRIPGEN_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Country to search for as soon as the app opens
    ///
    /// Examples:
    ///   tripgen --country France
    ///   tripgen --country "New Zealand" --days 7
    #[arg(long, value_name = "NAME")]
    pub country: Option<String>,

    /// Trip length in days
    #[arg(long, value_name = "N", default_value_t = DEFAULT_DAYS,
          value_parser = clap::value_parser!(u32).range(1..=MAX_DAYS as i64))]
    pub days: u32,

    /// Give up on a request after this many seconds (default: wait forever)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Write logs here instead of the default cache location
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Base URL of the itinerary service
    pub api_url: String,
    /// Country to pre-fill and search, if given
    pub country: Option<String>,
    /// Initial trip length
    pub days: u32,
    /// Per-request timeout, if any
    pub timeout: Option<Duration>,
    /// Log file override
    pub log_file: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            country: None,
            days: DEFAULT_DAYS,
            timeout: None,
            log_file: None,
        }
    }
}

/// Checks that a string is an absolute http(s) URL.
///
/// # Returns
/// * `Ok(String)` with any trailing slash removed
/// * `Err(CliError::InvalidApiUrl)` otherwise
pub fn parse_api_url(s: &str) -> Result<String, CliError> {
    let url = Url::parse(s.trim()).map_err(|_| CliError::InvalidApiUrl(s.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(CliError::InvalidApiUrl(s.to_string()));
    }
    Ok(s.trim().trim_end_matches('/').to_string())
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// A blank `--country` is treated as absent.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_url = parse_api_url(&cli.api_url)?;

        let timeout = match cli.timeout_secs {
            Some(0) => return Err(CliError::InvalidTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let country = cli
            .country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(StartupConfig {
            api_url,
            country,
            days: cli.days,
            timeout,
            log_file: cli.log_file.clone(),
        })
    }
}
