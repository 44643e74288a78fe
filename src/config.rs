//! # Configuration
//!
//! Layered configuration: built-in defaults, then an optional TOML file
//! (`nfvo-lcm.toml` by default), then environment variables prefixed with
//! `NSLCM_` using `__` between nested keys, e.g.
//! `NSLCM_STEP_INVOKER__MAX_CONFLICT_RETRIES=5`. `DATABASE_URL` always wins
//! for the database url.

use crate::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "nfvo-lcm.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcmConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub step_invoker: StepInvokerConfig,
    pub events: EventConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/nfvo_lcm_development".to_string(),
            max_connections: 10,
            acquire_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit filter directive; overrides the environment-based default
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepInvokerConfig {
    /// How often a step that lost an optimistic concurrency race is re-run
    pub max_conflict_retries: u32,
}

impl Default for StepInvokerConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub channel_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1000,
        }
    }
}

impl LcmConfig {
    /// Load from `nfvo-lcm.toml` in the working directory (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load from the given file (if present) and the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let builder = Config::builder()
            .add_source(Config::try_from(&LcmConfig::default())?)
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("NSLCM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: LcmConfig = builder.build()?.try_deserialize()?;

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            config.database.url = database_url;
        }

        tracing::debug!(
            config_file = %path.display(),
            max_conflict_retries = config.step_invoker.max_conflict_retries,
            "Loaded configuration"
        );

        Ok(config)
    }
}
