use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::{
    results::BridgeConfig,
    select_compiler::{TranslatorConfig, WherePlacement},
};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Engine configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rows buffered ahead of the consumer (one page)
    #[validate(range(
        min = 1,
        max = 100000,
        message = "Page size must be between 1 and 100000"
    ))]
    pub page_size: usize,

    /// Results pulled from the traversal cursor per call
    #[validate(range(
        min = 1,
        max = 100000,
        message = "Fetch batch size must be between 1 and 100000"
    ))]
    pub fetch_batch_size: usize,

    /// Name prefix for query worker threads
    #[validate(length(min = 1, message = "Worker name prefix cannot be empty"))]
    pub worker_name_prefix: String,

    /// Where WHERE filters are applied relative to grouping
    pub where_placement: WherePlacement,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let bridge = BridgeConfig::default();
        Self {
            page_size: bridge.page_size,
            fetch_batch_size: bridge.fetch_batch_size,
            worker_name_prefix: bridge.worker_name_prefix,
            where_placement: WherePlacement::default(),
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            page_size: parse_env_var("SQLGREMLIN_PAGE_SIZE", "1000")?,
            fetch_batch_size: parse_env_var("SQLGREMLIN_FETCH_BATCH_SIZE", "100")?,
            worker_name_prefix: env::var("SQLGREMLIN_WORKER_PREFIX")
                .unwrap_or_else(|_| "Data-Insert-Thread".to_string()),
            where_placement: parse_env_var("SQLGREMLIN_WHERE_PLACEMENT", "before_grouping")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation. Options the
    /// user did not pass keep the values of `base`.
    pub fn from_cli(base: Self, cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            page_size: base.page_size,
            fetch_batch_size: base.fetch_batch_size,
            worker_name_prefix: base.worker_name_prefix,
            where_placement: cli.where_placement.unwrap_or(base.where_placement),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn translator(&self) -> TranslatorConfig {
        TranslatorConfig {
            where_placement: self.where_placement,
        }
    }

    pub fn bridge(&self) -> BridgeConfig {
        BridgeConfig {
            page_size: self.page_size,
            fetch_batch_size: self.fetch_batch_size,
            worker_name_prefix: self.worker_name_prefix.clone(),
        }
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub where_placement: Option<WherePlacement>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
