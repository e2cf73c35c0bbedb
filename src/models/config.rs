//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Schedule cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Batch and visible-window sizes
    #[serde(default)]
    pub paging: PagingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| AppError::validation(format!("api.base_url is not a valid URL: {e}")))?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(AppError::validation("cache.ttl_secs must be > 0"));
        }
        if self.paging.batch_size == 0 {
            return Err(AppError::validation("paging.batch_size must be > 0"));
        }
        if self.paging.page_size == 0 {
            return Err(AppError::validation("paging.page_size must be > 0"));
        }
        Ok(())
    }
}

/// Backend API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the scheduler backend
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between batch requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Session credentials relayed with every request
    #[serde(default)]
    pub credentials: Credentials,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            credentials: Credentials::default(),
        }
    }
}

/// Session cookie and CSRF token relayed to the backend.
///
/// State-mutating endpoints require the CSRF token in an `X-CSRFToken`
/// header alongside the `csrftoken` cookie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// `sessionid` cookie value
    #[serde(default)]
    pub session_id: Option<String>,

    /// `csrftoken` cookie value
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Schedule cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether the cache is consulted at all
    #[serde(default = "defaults::cache_enabled")]
    pub enabled: bool,

    /// Entry time-to-live in seconds
    #[serde(default = "defaults::cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::cache_enabled(),
            ttl_secs: defaults::cache_ttl(),
        }
    }
}

/// Batch and visible-window sizes for the result pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Backend batch size per conflict_free_schedule request
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Visible-window growth per reveal step
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            page_size: defaults::page_size(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://localhost:8000".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; uSched/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn cache_enabled() -> bool {
        true
    }
    pub fn cache_ttl() -> u64 {
        3600
    }
    pub fn batch_size() -> usize {
        100
    }
    pub fn page_size() -> usize {
        20
    }
}
