//! User configuration at ~/.config/servicebook/config.toml

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HORIZON_DAYS, DEFAULT_HORIZON_MONTHS, DEFAULT_UPCOMING_LIMIT};
use crate::error::{ServiceBookError, ServiceBookResult};
use crate::recurrence::Horizon;
use crate::store::{FileBlobStore, RecordStore};

static DEFAULT_DATA_DIR: &str = "~/.servicebook";
static ENV_PREFIX: &str = "SERVICEBOOK";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

fn default_horizon_months() -> u32 {
    DEFAULT_HORIZON_MONTHS
}

fn default_upcoming_limit() -> usize {
    DEFAULT_UPCOMING_LIMIT
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceBookConfig {
    /// Where the record store keeps its JSON files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,

    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,

    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
}

impl Default for ServiceBookConfig {
    fn default() -> Self {
        ServiceBookConfig {
            data_dir: default_data_dir(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            horizon_months: DEFAULT_HORIZON_MONTHS,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }
}

impl ServiceBookConfig {
    pub fn config_path() -> ServiceBookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ServiceBookError::Config("Could not determine config directory".into()))?
            .join("servicebook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/servicebook/config.toml, creating a commented template
    /// on first run. `SERVICEBOOK_DATA_DIR` and friends override file values.
    pub fn load() -> ServiceBookResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ServiceBookResult<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// File values first, then `SERVICEBOOK_*` variables from `env` on top.
    fn load_with_env(path: &Path, env: Environment) -> ServiceBookResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env.try_parsing(true))
            .build()
            .map_err(|e| ServiceBookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ServiceBookError::Config(e.to_string()))
    }

    /// Write a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> ServiceBookResult<()> {
        let contents = format!(
            "\
# servicebook configuration

# Where your records are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# How far ahead recurring responsibilities are scheduled:
# horizon_days = {DEFAULT_HORIZON_DAYS}
# horizon_months = {DEFAULT_HORIZON_MONTHS}

# Maximum number of upcoming assignments shown:
# upcoming_limit = {DEFAULT_UPCOMING_LIMIT}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ServiceBookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ServiceBookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned())
    }

    pub fn horizon(&self) -> Horizon {
        Horizon {
            days: self.horizon_days,
            months: self.horizon_months,
        }
    }

    /// Open the file-backed record store under `data_dir`.
    pub fn open_store(&self) -> ServiceBookResult<RecordStore<FileBlobStore>> {
        RecordStore::open(FileBlobStore::new(self.data_path()))
    }
}
