//! Client configuration
//!
//! Loads the REST endpoint, paging sizes and status batching settings from
//! environment variables (a `.env` file is honored when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Top-level configuration for the data layer
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub posts: PostsConfig,
    pub status: StatusConfig,
    pub log: LogConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server, without the `/api/v4` suffix
    pub url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Base URL with any trailing slash removed
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Post paging settings
#[derive(Debug, Clone, Deserialize)]
pub struct PostsConfig {
    /// Page size for channel post fetches
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    /// Posts requested before the unread line
    #[serde(default = "default_limit_before")]
    pub limit_before: u32,
    /// Posts requested after the unread line
    #[serde(default = "default_limit_after")]
    pub limit_after: u32,
    /// Keep replies out of channel order (collapsed reply threads)
    #[serde(default)]
    pub collapsed_threads: bool,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            limit_before: default_limit_before(),
            limit_after: default_limit_after(),
            collapsed_threads: false,
        }
    }
}

/// Status lookup batching settings
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    #[serde(default = "default_batch_window_ms")]
    pub batch_window_ms: u64,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Re-request every known status on this interval when set
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
}

impl StatusConfig {
    #[must_use]
    pub fn batch_window(&self) -> Duration {
        Duration::from_millis(self.batch_window_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_secs.map(Duration::from_secs)
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            batch_window_ms: default_batch_window_ms(),
            max_batch_size: default_max_batch_size(),
            poll_interval_secs: None,
        }
    }
}

/// Logging output settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_request_timeout_secs() -> u64 {
    30
}

fn default_chunk_size() -> u32 {
    60
}

fn default_limit_before() -> u32 {
    30
}

fn default_limit_after() -> u32 {
    30
}

fn default_batch_window_ms() -> u64 {
    100
}

fn default_max_batch_size() -> usize {
    100
}

/// Read an optional variable, failing only when it is present but unparsable
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

impl ClientConfig {
    /// Build a configuration for the given server with every other field defaulted
    pub fn for_server(url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig {
                url: url.into(),
                token: None,
                request_timeout_secs: default_request_timeout_secs(),
            },
            posts: PostsConfig::default(),
            status: StatusConfig::default(),
            log: LogConfig::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `CHAT_SERVER_URL` is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            server: ServerConfig {
                url: env::var("CHAT_SERVER_URL")
                    .map_err(|_| ConfigError::MissingVar("CHAT_SERVER_URL"))?,
                token: env::var("CHAT_AUTH_TOKEN").ok().filter(|s| !s.is_empty()),
                request_timeout_secs: parse_var("CHAT_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout_secs),
            },
            posts: PostsConfig {
                chunk_size: parse_var("CHAT_POST_CHUNK_SIZE")?.unwrap_or_else(default_chunk_size),
                limit_before: parse_var("CHAT_POSTS_LIMIT_BEFORE")?
                    .unwrap_or_else(default_limit_before),
                limit_after: parse_var("CHAT_POSTS_LIMIT_AFTER")?
                    .unwrap_or_else(default_limit_after),
                collapsed_threads: parse_var("CHAT_COLLAPSED_THREADS")?.unwrap_or(false),
            },
            status: StatusConfig {
                batch_window_ms: parse_var("CHAT_STATUS_BATCH_WINDOW_MS")?
                    .unwrap_or_else(default_batch_window_ms),
                max_batch_size: parse_var("CHAT_STATUS_MAX_BATCH")?
                    .unwrap_or_else(default_max_batch_size),
                poll_interval_secs: parse_var("CHAT_STATUS_POLL_SECS")?,
            },
            log: LogConfig {
                json: parse_var("CHAT_LOG_JSON")?.unwrap_or(false),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
