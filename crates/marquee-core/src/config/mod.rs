//! Application configuration.
//!
//! [`AppConfig`] is the on-disk JSON config shared by Marquee front ends.
//! Environment variables override file values, and [`AppConfig::omdb`]
//! validates the parts the movie API client needs.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::debounce::delay_from_millis;
use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_DEBOUNCE_MS: i64 = 400;
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_OMDB_API_KEY: &str = "OMDB_API_KEY";
pub const ENV_OMDB_BASE_URL: &str = "OMDB_BASE_URL";
pub const ENV_DEBOUNCE_MS: &str = "MARQUEE_DEBOUNCE_MS";

/// Persisted user configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub omdb_api_key: Option<String>,
    #[serde(default)]
    pub omdb_base_url: Option<String>,
    /// Quiet period before a typed query is searched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: i64,
    /// Queries of this many characters or fewer are not searched
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Validated settings for the OMDb client
#[derive(Clone, PartialEq, Eq)]
pub struct OmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for OmdbConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("OmdbConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

const fn default_debounce_ms() -> i64 {
    DEFAULT_DEBOUNCE_MS
}

const fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            omdb_api_key: None,
            omdb_base_url: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Load config from `path`, returning defaults when the file is missing.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config = serde_json::from_str::<Self>(&raw)?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(api_key) = normalize_text_option(lookup(ENV_OMDB_API_KEY)) {
            self.omdb_api_key = Some(api_key);
        }
        if let Some(base_url) = normalize_text_option(lookup(ENV_OMDB_BASE_URL)) {
            self.omdb_base_url = Some(base_url);
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_DEBOUNCE_MS)) {
            match raw.parse::<i64>() {
                Ok(millis) => self.debounce_ms = millis,
                Err(error) => {
                    tracing::warn!("Ignoring invalid {}='{}': {}", ENV_DEBOUNCE_MS, raw, error);
                }
            }
        }
        self
    }

    pub fn debounce_delay(&self) -> Duration {
        delay_from_millis(self.debounce_ms)
    }

    /// Settings for the OMDb client; fails when no API key is configured.
    pub fn omdb(&self) -> Result<OmdbConfig> {
        let api_key = normalize_text_option(self.omdb_api_key.clone()).ok_or_else(|| {
            Error::InvalidInput(format!(
                "OMDb API key is not configured (set {ENV_OMDB_API_KEY} or run `marquee config init --api-key <KEY>`)"
            ))
        })?;

        let base_url = normalize_text_option(self.omdb_base_url.clone())
            .unwrap_or_else(|| DEFAULT_OMDB_BASE_URL.to_string());
        if !is_http_url(&base_url) {
            return Err(Error::InvalidInput(
                "OMDb base URL must include http:// or https://".to_string(),
            ));
        }

        Ok(OmdbConfig {
            api_key,
            base_url,
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        })
    }

    fn normalize(&mut self) {
        self.omdb_api_key = normalize_text_option(self.omdb_api_key.take());
        self.omdb_base_url = normalize_text_option(self.omdb_base_url.take());
    }
}
