//! Runtime configuration
//!
//! Defaults cover everything except the provider API key. Values can be
//! overridden through environment variables (a `.env` file is honoured by
//! the binary) and then by command-line flags.

use std::time::Duration;

use tracing::warn;

use crate::data::places::{PLACES_BASE_URL, TOKEN_ACTIVATION_DELAY};
use crate::data::Language;

/// Environment variable holding the provider API key
pub const API_KEY_ENV: &str = "PLACES_API_KEY";

/// Configuration for the search service and its cache
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider API key; without it every upstream call fails
    pub api_key: Option<String>,
    /// Root URL of the provider API
    pub places_base_url: String,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Delay before a continuation token is used
    pub token_activation_delay: Duration,
    /// Lifetime of every cache entry
    pub cache_ttl: Duration,
    /// Interval between sweeps of expired cache entries
    pub sweep_interval: Duration,
    /// Number of venues in an assembled result page
    pub results_per_page: usize,
    /// Upstream pages fetched beyond the first to fill a page after filtering
    pub max_extra_pages: u32,
    pub default_language: Language,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            places_base_url: PLACES_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            token_activation_delay: TOKEN_ACTIVATION_DELAY,
            cache_ttl: Duration::from_secs(24 * 60 * 60), // 24 hours
            sweep_interval: Duration::from_secs(60 * 60),  // 1 hour
            results_per_page: 20,
            max_extra_pages: 2,
            default_language: Language::En,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// missing or unparseable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse_u64 = |name: &str| -> Option<u64> {
            let raw = lookup(name)?;
            match raw.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(variable = name, value = %raw, "ignoring unparseable setting");
                    None
                }
            }
        };
        // Values in hours or minutes are scaled to seconds and may overflow
        let parse_scaled = |name: &str, factor: u64| -> Option<u64> {
            let value = parse_u64(name)?;
            let scaled = value.checked_mul(factor);
            if scaled.is_none() {
                warn!(variable = name, value, "ignoring out-of-range setting");
            }
            scaled
        };

        Self {
            api_key: lookup(API_KEY_ENV)
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            places_base_url: lookup("VENUEFINDER_PLACES_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.places_base_url),
            request_timeout: parse_u64("VENUEFINDER_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            token_activation_delay: parse_u64("VENUEFINDER_TOKEN_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.token_activation_delay),
            cache_ttl: parse_scaled("VENUEFINDER_CACHE_TTL_HOURS", 60 * 60)
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            sweep_interval: parse_scaled("VENUEFINDER_SWEEP_INTERVAL_MINUTES", 60)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            results_per_page: defaults.results_per_page,
            max_extra_pages: defaults.max_extra_pages,
            default_language: lookup("VENUEFINDER_LANGUAGE")
                .and_then(|code| code.parse().ok())
                .unwrap_or(defaults.default_language),
        }
    }

    /// Logs a warning when no API key is configured
    ///
    /// Returns whether the configuration can reach the provider at all.
    pub fn check_api_key(&self) -> bool {
        if self.api_key.is_none() {
            warn!(
                "{} not set; every provider call will fail until a key is configured",
                API_KEY_ENV
            );
            return false;
        }
        true
    }
}
