//! Service configuration and data-directory resolution.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::EngineError,
    utils::{ensure_dir, write_atomic},
};

/// Environment override for the document store location. Takes precedence
/// over the config file.
pub const DATA_DIR_ENV: &str = "BUDGETWISE_DATA_DIR";

const APP_DIR: &str = "budgetwise";
const CONFIG_FILE: &str = "config.json";

/// User-configurable service settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for the persisted collections. Defaults to the
    /// platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration file from its default location, falling
    /// back to defaults when the file does not exist.
    pub fn load() -> Result<Config, EngineError> {
        Self::load_from(&default_config_path())
    }

    pub fn load_from(path: &Path) -> Result<Config, EngineError> {
        if path.exists() {
            let data = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), EngineError> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, &json)?;
        Ok(())
    }

    /// Resolution order: environment override, then the config file, then
    /// the platform data directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}
