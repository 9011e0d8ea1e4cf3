//! Store configuration.
//!
//! Configuration is loaded from environment variables with defaults
//! suitable for local development (an empty in-memory store).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// How to populate a [`MemoryGrantStore`](crate::MemoryGrantStore).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON dataset to load at startup.
    pub dataset_path: Option<PathBuf>,

    /// Load the built-in sample data when no dataset path is set.
    pub seed_sample: bool,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ACL_DATASET_PATH`: JSON dataset file to load
    /// - `ACL_SEED_SAMPLE`: Load sample data when no dataset is given (default: false)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            dataset_path: std::env::var("ACL_DATASET_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .or(default.dataset_path),
            seed_sample: std::env::var("ACL_SEED_SAMPLE")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(default.seed_sample),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.dataset_path {
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                return Err(ConfigError::InvalidValue {
                    key: "ACL_DATASET_PATH".to_string(),
                    message: format!("expected a .json file, got {}", path.display()),
                });
            }
        }
        Ok(())
    }
}
