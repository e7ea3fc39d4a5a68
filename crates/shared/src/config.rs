//! Application configuration management.

use serde::Deserialize;

use crate::error::AppResult;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// KPI engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Fact cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Fact data source configuration.
    #[serde(default)]
    pub data: DataConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// KPI engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Timeout for a single fact accessor call, in milliseconds.
    #[serde(default = "default_fact_timeout_ms")]
    pub fact_timeout_ms: u64,
    /// Number of entries in the top and bottom performer lists.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Metric reported as "PBT" and used for ranking (snake_case metric name).
    #[serde(default = "default_headline_metric")]
    pub headline_metric: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fact_timeout_ms: default_fact_timeout_ms(),
            top_n: default_top_n(),
            headline_metric: default_headline_metric(),
        }
    }
}

fn default_fact_timeout_ms() -> u64 {
    5000
}

fn default_top_n() -> usize {
    5
}

fn default_headline_metric() -> String {
    "pbt_before_non_ops".to_string()
}

/// Fact cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Whether fact sheets are memoized at all.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Maximum number of (company, period) sheets kept.
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
    /// Time-to-live for each cached sheet in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

/// Fact data source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Path to the JSON fixture loaded into the in-memory fact store.
    #[serde(default = "default_fixture_path")]
    pub fixture_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            fixture_path: default_fixture_path(),
        }
    }
}

fn default_fixture_path() -> String {
    "fixtures/group.json".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if a source cannot be read or the
    /// merged values do not deserialize.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINSIGHT").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
