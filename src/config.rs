use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Resource directory not found: {0}")]
    MissingResources(PathBuf),
}

/// Configuration for the inventory service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory holding report templates (under `templates/`)
    pub resource_file_path: PathBuf,

    /// Inventory dump backing the store
    pub data_file: PathBuf,

    /// Page size used by the CLI when none is given; negative disables paging
    pub default_page_size: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            resource_file_path: PathBuf::from("resources"),
            data_file: PathBuf::from("data/inventory.json"),
            default_page_size: -1,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_internal(true)
    }

    #[cfg(test)]
    fn from_env_no_dotenv() -> Result<Self, ConfigError> {
        Self::from_env_internal(false)
    }

    fn from_env_internal(load_dotenv: bool) -> Result<Self, ConfigError> {
        if load_dotenv {
            let _ = dotenv::dotenv();
        }

        let mut config = Self::default();

        if let Ok(path) = env::var("HOSTLEDGER_RESOURCE_PATH") {
            config.resource_file_path = PathBuf::from(path);
        }

        if let Ok(path) = env::var("HOSTLEDGER_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }

        if let Ok(page_size) = env::var("HOSTLEDGER_PAGE_SIZE") {
            config.default_page_size = page_size.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HOSTLEDGER_PAGE_SIZE",
                value: page_size.clone(),
            })?;
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.resource_file_path.is_dir() {
            return Err(ConfigError::MissingResources(self.resource_file_path.clone()));
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HOSTLEDGER_PAGE_SIZE",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}
