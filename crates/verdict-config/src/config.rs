// crates/verdict-config/src/config.rs
// ============================================================================
// Module: Verdict Configuration
// Description: Canonical config model and fail-closed validation.
// Purpose: Single source of truth for verdict.toml semantics.
// Dependencies: verdict-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Service configuration loads from `verdict.toml`, overridable through the
//! `VERDICT_CONFIG` environment variable or an explicit path. Validation is
//! strict and fail-closed: unknown fields, malformed endpoint URLs, and
//! out-of-range timeouts or TTLs reject the whole file rather than falling
//! back to partial defaults, because a half-configured gate quietly gates
//! against the wrong stores.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;
use verdict_core::CacheBackend;
use verdict_core::CacheError;
use verdict_core::MemoryCache;
use verdict_core::NullCache;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "verdict.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "VERDICT_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total config path length.
const MAX_CONFIG_PATH_LENGTH: usize = 4096;
/// Default store request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Minimum allowed store request timeout in milliseconds.
const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum allowed store request timeout in milliseconds.
const MAX_TIMEOUT_MS: u64 = 60_000;
/// Default cached fact time-to-live in seconds.
const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
/// Maximum allowed cached fact time-to-live in seconds.
const MAX_CACHE_TTL_SECONDS: u64 = 86_400;
/// Default message bus topic prefix.
const DEFAULT_TOPIC_PREFIX: &str = "org.fedoraproject";
/// Default message bus environment segment.
const DEFAULT_ENVIRONMENT: &str = "prod";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Verdict service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerdictConfig {
    /// Fact store endpoints and request limits.
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Fact cache backend and expiry.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Event consumer subscription settings.
    #[serde(default)]
    pub consumer: ConsumerConfig,
}

impl VerdictConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.validate()?;
        self.cache.validate()?;
        self.consumer.validate()?;
        Ok(())
    }
}

/// Fact store endpoints and request limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Result store query endpoint.
    pub results_url: String,
    /// Waiver store query endpoint.
    pub waivers_url: String,
    /// Store request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            results_url: "http://localhost:5001/api/v2.0/results".to_string(),
            waivers_url: "http://localhost:5004/api/v1.0/waivers".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ResolverConfig {
    /// Validates endpoint URLs and the request timeout.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint("resolver.results_url", &self.results_url)?;
        validate_endpoint("resolver.waivers_url", &self.waivers_url)?;
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "resolver.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Cache backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackendKind {
    /// No caching; every query is a live fetch.
    Null,
    /// In-process TTL cache.
    #[default]
    Memory,
}

/// Fact cache backend and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Selected cache backend.
    #[serde(default)]
    pub backend: CacheBackendKind,
    /// Cached fact time-to-live in seconds.
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::default(),
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

impl CacheConfig {
    /// Validates the cache expiry bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_seconds == 0 || self.ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(ConfigError::Invalid(format!(
                "cache.ttl_seconds must be between 1 and {MAX_CACHE_TTL_SECONDS}"
            )));
        }
        Ok(())
    }

    /// Returns the configured time-to-live as a duration.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Builds the configured cache backend.
    #[must_use]
    pub fn build(&self) -> ConfiguredCache {
        match self.backend {
            CacheBackendKind::Null => ConfiguredCache::Null(NullCache::new()),
            CacheBackendKind::Memory => ConfiguredCache::Memory(MemoryCache::new()),
        }
    }
}

/// Event consumer subscription settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerConfig {
    /// Bus topic prefix, e.g. `org.fedoraproject`.
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
    /// Bus environment segment, e.g. `prod` or `stg`.
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

impl ConsumerConfig {
    /// Validates the topic prefix and environment segments.
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("consumer.topic_prefix", &self.topic_prefix),
            ("consumer.environment", &self.environment),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
            }
            if value.contains(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!("{field} must not contain whitespace")));
            }
        }
        Ok(())
    }

    /// Returns the fact topics the consumer subscribes to.
    #[must_use]
    pub fn subscription_topics(&self) -> Vec<String> {
        vec![
            format!("{}.{}.taskotron.result.new", self.topic_prefix, self.environment),
            format!("{}.{}.waiver.new", self.topic_prefix, self.environment),
        ]
    }
}

// ============================================================================
// SECTION: Configured Cache
// ============================================================================

/// Cache backend built from configuration.
#[derive(Debug)]
pub enum ConfiguredCache {
    /// No-op backend.
    Null(NullCache),
    /// In-process TTL backend.
    Memory(MemoryCache),
}

impl CacheBackend for ConfiguredCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self {
            Self::Null(cache) => cache.get(key),
            Self::Memory(cache) => cache.get(key),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        match self {
            Self::Null(cache) => cache.set(key, value, ttl),
            Self::Memory(cache) => cache.set(key, value, ttl),
        }
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            Self::Null(cache) => cache.delete(key),
            Self::Memory(cache) => cache.delete(key),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default store request timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default cached fact time-to-live.
const fn default_cache_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECONDS
}

/// Default bus topic prefix.
fn default_topic_prefix() -> String {
    DEFAULT_TOPIC_PREFIX.to_string()
}

/// Default bus environment segment.
fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_CONFIG_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates one store endpoint URL.
fn validate_endpoint(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|err| ConfigError::Invalid(format!("{field} is not a valid url: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid(format!("{field} has unsupported scheme {other}"))),
    }
}
