//! # Configuration Management
//!
//! This module handles application configuration loading from environment variables
//! and provides structured configuration for the AI client, the search pipeline and
//! the result cache.
//!
//! The only optional integration is Gemini: when `GEMINI_API_KEY` is absent the
//! application runs in mock-only mode. Malformed values (non-numeric counts, an
//! invalid base URL) are start-up errors.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

/// Main application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Environment name (e.g., "development", "production")
    pub environment: String,
    /// Gemini client configuration
    pub ai: AiConfig,
    /// Search pipeline configuration
    pub search: SearchConfig,
    /// Result cache configuration
    pub cache: CacheConfig,
}

/// Gemini client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API key; `None` disables AI enrichment for the lifetime of the process
    pub api_key: Option<String>,
    /// Model name used in the `generateContent` call
    pub model: String,
    /// Base URL of the Generative Language API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Search pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of mock results generated per search
    pub results_per_search: usize,
    /// Shuffle the mock portion of the result list
    pub shuffle_results: bool,
    /// Drop every cached result at the start of each search. Concurrent
    /// searches also clear each other's records while those are being inserted.
    pub clear_cache_per_search: bool,
}

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached result stays retrievable
    pub ttl_secs: u64,
    /// Maximum number of cached results
    pub max_entries: usize,
    /// Seconds between background purges of expired entries
    pub purge_interval_secs: u64,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AiConfig {
    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }
}

impl Config {
    /// Creates a new configuration instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// All variables are optional.
    /// - `ENVIRONMENT`: Environment name (default: "development")
    /// - `GEMINI_API_KEY`: Gemini API key (default: unset, AI enrichment disabled)
    /// - `GEMINI_MODEL`: Model name (default: "gemini-2.5-flash")
    /// - `GEMINI_BASE_URL`: API base URL (default: "https://generativelanguage.googleapis.com")
    /// - `AI_TIMEOUT_SECS`: Gemini request timeout (default: 15)
    /// - `RESULTS_PER_SEARCH`: Mock results per search (default: 100)
    /// - `SHUFFLE_RESULTS`: Shuffle mock results (default: true)
    /// - `CLEAR_CACHE_PER_SEARCH`: Clear the result cache on every search (default: false)
    /// - `CACHE_TTL_SECS`: Result cache TTL (default: 3600)
    /// - `CACHE_MAX_ENTRIES`: Result cache capacity (default: 10000)
    /// - `CACHE_PURGE_INTERVAL_SECS`: Expired-entry purge interval (default: 300)
    ///
    /// # Errors
    /// Returns an error if any variable is present but malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// [`Config::from_env`] passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let environment = var("ENVIRONMENT", "development");

        let base_url = var("GEMINI_BASE_URL", "https://generativelanguage.googleapis.com");
        Url::parse(&base_url).context("GEMINI_BASE_URL must be a valid URL")?;

        let ai = AiConfig {
            api_key: lookup("GEMINI_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            model: var("GEMINI_MODEL", "gemini-2.5-flash"),
            base_url,
            timeout_secs: var("AI_TIMEOUT_SECS", "15")
                .parse()
                .context("AI_TIMEOUT_SECS must be a valid number")?,
        };

        let search = SearchConfig {
            results_per_search: var("RESULTS_PER_SEARCH", "100")
                .parse()
                .context("RESULTS_PER_SEARCH must be a valid number")?,
            shuffle_results: parse_flag(&var("SHUFFLE_RESULTS", "true"))
                .context("SHUFFLE_RESULTS must be true or false")?,
            clear_cache_per_search: parse_flag(&var("CLEAR_CACHE_PER_SEARCH", "false"))
                .context("CLEAR_CACHE_PER_SEARCH must be true or false")?,
        };

        let cache = CacheConfig {
            ttl_secs: var("CACHE_TTL_SECS", "3600")
                .parse()
                .context("CACHE_TTL_SECS must be a valid number")?,
            max_entries: var("CACHE_MAX_ENTRIES", "10000")
                .parse()
                .context("CACHE_MAX_ENTRIES must be a valid number")?,
            purge_interval_secs: var("CACHE_PURGE_INTERVAL_SECS", "300")
                .parse()
                .context("CACHE_PURGE_INTERVAL_SECS must be a valid number")?,
        };

        if cache.purge_interval_secs == 0 {
            bail!("CACHE_PURGE_INTERVAL_SECS must be greater than zero");
        }

        // One search inserts up to RESULTS_PER_SEARCH mock records plus the AI record
        if cache.max_entries <= search.results_per_search {
            bail!(
                "CACHE_MAX_ENTRIES ({}) must be greater than RESULTS_PER_SEARCH ({})",
                cache.max_entries,
                search.results_per_search
            );
        }

        Ok(Config {
            environment,
            ai,
            search,
            cache,
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized boolean '{}'", other),
    }
}
