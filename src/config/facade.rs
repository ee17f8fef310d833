//! Config loading entry point.

use super::merge::merge_policy;
use super::sources::{env, global_file};
use super::WinringConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from defaults, the global config file and the environment.
    pub fn load() -> Result<WinringConfig, ConfigError> {
        let builder = global_file::add_to_builder(merge_policy::builder_with_defaults()?)?;
        env::add_to_builder(builder)
            .build()?
            .try_deserialize()
    }

    /// Load with `path` standing in for the global config file. The file
    /// must exist; environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<WinringConfig, ConfigError> {
        debug!(config_path = %path.display(), "Loading explicit config file");
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        env::add_to_builder(builder).build()?.try_deserialize()
    }

    /// Path of the global config file, whether or not it exists
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Defaults only; no files or environment consulted
    pub fn default() -> WinringConfig {
        WinringConfig::default()
    }
}
