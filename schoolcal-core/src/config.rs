//! Server configuration.
//!
//! Values are merged from, in increasing precedence:
//! - `~/.config/schoolcal/config.toml` (platform config dir)
//! - `./config.toml`
//! - `SCHOOLCAL_*` environment variables (e.g. `SCHOOLCAL_NEIS_KEY`)

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_BIND_ADDR, DEFAULT_CACHE_DAYS, DEFAULT_CACHE_DIR,
    DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_BASE_DELAY_MS,
    PLACEHOLDER_API_KEY,
};
use crate::error::{SchoolCalError, SchoolCalResult};

fn default_cache_days() -> u32 {
    DEFAULT_CACHE_DAYS
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_base_delay_ms() -> u64 {
    DEFAULT_RETRY_BASE_DELAY_MS
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchoolCalConfig {
    /// NEIS Open API key.
    #[serde(default)]
    pub neis_key: String,

    /// Days a rendered calendar is served before it is regenerated.
    #[serde(default = "default_cache_days")]
    pub cache_days: u32,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries after the first failed NEIS request.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl SchoolCalConfig {
    /// Config with every field at its default except the API key.
    pub fn with_key(neis_key: impl Into<String>) -> Self {
        SchoolCalConfig {
            neis_key: neis_key.into(),
            cache_days: default_cache_days(),
            cache_dir: default_cache_dir(),
            bind_addr: default_bind_addr(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }

    /// Load from the standard locations and the environment.
    pub fn load() -> SchoolCalResult<Self> {
        let mut files = Vec::new();
        if let Some(path) = Self::config_path() {
            files.push(path);
        }
        files.push(PathBuf::from("config.toml"));

        Self::load_from(&files, Some("SCHOOLCAL"))
    }

    /// Load from the given files (missing ones are skipped) and, if a prefix
    /// is given, from environment variables with that prefix.
    pub fn load_from(files: &[PathBuf], env_prefix: Option<&str>) -> SchoolCalResult<Self> {
        let mut builder = Config::builder();
        for path in files {
            builder = builder.add_source(File::from(path.clone()).required(false));
        }
        if let Some(prefix) = env_prefix {
            builder = builder.add_source(Environment::with_prefix(prefix).try_parsing(true));
        }

        let config: SchoolCalConfig = builder
            .build()
            .map_err(|e| SchoolCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SchoolCalError::Config(e.to_string()))?;

        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("schoolcal").join("config.toml"))
    }

    /// Fail unless a real NEIS key is configured.
    pub fn require_api_key(&self) -> SchoolCalResult<&str> {
        let key = self.neis_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(SchoolCalError::Config(
                "NEIS API key is not configured (set neis_key or SCHOOLCAL_NEIS_KEY)".into(),
            ));
        }
        Ok(key)
    }

    /// Cache directory with `~` expanded.
    pub fn cache_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.cache_dir.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}
