//! Application configuration: data locations and console behaviour.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ::config::{Config, Environment, File, FileFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory under the platform config/data roots used by the application.
pub const APP_DIR: &str = "vethub";
/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.json";
/// Prefix for environment overrides, e.g. `VETHUB_DATA_DIR`.
pub const ENV_PREFIX: &str = "VETHUB";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the catalog files.
    pub data_dir: PathBuf,
    /// Registry file; relative paths are resolved against `data_dir`.
    pub registry_file: PathBuf,
    /// Clear the terminal between menus.
    pub clear_screen: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            registry_file: PathBuf::from("veterans.json"),
            clear_screen: true,
        }
    }
}

impl AppConfig {
    /// Load from the default config file plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Layer defaults, the optional JSON file at `path`, then `VETHUB_*` variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().into_owned())?
            .set_default(
                "registry_file",
                defaults.registry_file.to_string_lossy().into_owned(),
            )?
            .set_default("clear_screen", defaults.clear_screen)?
            .add_source(File::from(path).format(FileFormat::Json).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let config: Self = settings
            .try_deserialize()
            .context("invalid configuration values")?;
        info!(
            data_dir = %config.data_dir.display(),
            registry = %config.registry_path().display(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Directory holding the five catalog files.
    pub fn catalog_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Absolute or data-dir-relative path of the registry file.
    pub fn registry_path(&self) -> PathBuf {
        if self.registry_file.is_absolute() {
            self.registry_file.clone()
        } else {
            self.data_dir.join(&self.registry_file)
        }
    }

    /// Write this configuration as pretty JSON, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }

        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize configuration")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write config {}", path.display()))
    }
}

/// Default location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Default data directory, falling back to `./data` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Write the default configuration on first run. Returns the config file path.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    ensure_config_at(&path)?;
    Ok(path)
}

/// Write the default configuration to `path` unless a file already exists there.
pub fn ensure_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    info!(path = %path.display(), "writing default configuration");
    AppConfig::default().persist(path)
}
