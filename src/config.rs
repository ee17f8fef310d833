//! Configuration System
//!
//! Layered configuration built with the `config` crate: merge-policy
//! defaults, then the global config file (or an explicit file given on the
//! command line), then `WINRING__SECTION__KEY` environment overrides.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Upper bound for the relocation settle delay
pub const MAX_SETTLE_DELAY_MS: u64 = 1000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WinringConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub relocation: RelocationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the ordering store lives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Sled directory; the per-user data directory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_store_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocationConfig {
    /// Wait between focusing the target window and restoring the selection
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_settle_delay_ms() -> u64 {
    30
}

impl Default for RelocationConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl RelocationConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "winring")
}

/// `<data dir>/store`, or `.winring/store` when no home directory is known
pub fn default_store_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("store"))
        .unwrap_or_else(|| PathBuf::from(".winring").join("store"))
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Storage(String),
    Relocation(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Relocation(msg) => write!(f, "Relocation: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl WinringConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::Storage(
                    "Store path cannot be empty".to_string(),
                ));
            }
        }

        if self.relocation.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            errors.push(ValidationError::Relocation(format!(
                "settle_delay_ms {} exceeds {}",
                self.relocation.settle_delay_ms, MAX_SETTLE_DELAY_MS
            )));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// [`WinringConfig::validate`] folded into a single [`ApiError`]
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}
