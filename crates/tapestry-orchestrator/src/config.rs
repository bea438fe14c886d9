//! Orchestrator configuration
//!
//! Cache lifetimes, batch chunking and the settings of the engines the
//! orchestrator owns. Loadable from TOML; every key is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tapestry_graph::GraphConfig;
use tapestry_rules::RuleEngineConfig;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to render TOML
    #[error("Failed to render config TOML: {0}")]
    TomlRender(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the orchestrator
///
/// # Examples
///
/// ```
/// use tapestry_orchestrator::OrchestratorConfig;
///
/// let config = OrchestratorConfig::default();
/// assert_eq!(config.analysis_ttl_secs, 600);
/// assert_eq!(config.analyze_chunk_size, 10);
///
/// let config: OrchestratorConfig = toml::from_str("analyze_chunk_size = 4").unwrap();
/// assert_eq!(config.analyze_chunk_size, 4);
/// assert_eq!(config.apply_chunk_size, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Lifetime of cached item analyses (in seconds)
    /// Default: 600 (10 minutes)
    pub analysis_ttl_secs: u64,

    /// Lifetime of the cached organization settings (in seconds)
    /// Default: 300 (5 minutes)
    pub config_ttl_secs: u64,

    /// Maximum cached analyses
    pub cache_capacity: usize,

    /// Items analyzed concurrently per chunk in `batch_analyze`
    pub analyze_chunk_size: usize,

    /// Items organized concurrently per chunk in `batch_apply_organization`
    pub apply_chunk_size: usize,

    /// Pause between organization chunks (in milliseconds)
    pub inter_chunk_delay_ms: u64,

    /// Relationship graph settings
    pub graph: GraphConfig,

    /// Rule engine settings
    pub rules: RuleEngineConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            analysis_ttl_secs: 600,
            config_ttl_secs: 300,
            cache_capacity: 1024,
            analyze_chunk_size: 10,
            apply_chunk_size: 5,
            inter_chunk_delay_ms: 100,
            graph: GraphConfig::default(),
            rules: RuleEngineConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Short cache lifetimes and larger chunks
    ///
    /// Suited to catalogues that change often and backends that tolerate
    /// more concurrent calls.
    pub fn aggressive() -> Self {
        Self {
            analysis_ttl_secs: 120,
            config_ttl_secs: 60,
            analyze_chunk_size: 20,
            apply_chunk_size: 10,
            inter_chunk_delay_ms: 50,
            ..Self::default()
        }
    }

    /// Long cache lifetimes, small chunks and strict rule execution
    ///
    /// Suited to slow or rate-limited backends.
    pub fn lenient() -> Self {
        Self {
            analysis_ttl_secs: 3600,
            config_ttl_secs: 1800,
            analyze_chunk_size: 5,
            apply_chunk_size: 2,
            inter_chunk_delay_ms: 250,
            rules: RuleEngineConfig::strict(),
            ..Self::default()
        }
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: OrchestratorConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the orchestrator cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid("cache_capacity must be at least 1".to_string()));
        }
        if self.analyze_chunk_size == 0 || self.apply_chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk sizes must be at least 1".to_string()));
        }
        if self.graph.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "graph.cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.graph.default_depth > self.graph.max_depth {
            return Err(ConfigError::Invalid(format!(
                "graph.default_depth ({}) exceeds graph.max_depth ({})",
                self.graph.default_depth, self.graph.max_depth
            )));
        }
        if !(0.0..=1.0).contains(&self.rules.auto_execute_threshold) {
            return Err(ConfigError::Invalid(
                "rules.auto_execute_threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get analysis TTL as Duration
    pub fn analysis_ttl(&self) -> Duration {
        Duration::from_secs(self.analysis_ttl_secs)
    }

    /// Get settings TTL as Duration
    pub fn config_ttl(&self) -> Duration {
        Duration::from_secs(self.config_ttl_secs)
    }

    /// Get the pause between organization chunks as Duration
    pub fn inter_chunk_delay(&self) -> Duration {
        Duration::from_millis(self.inter_chunk_delay_ms)
    }
}
