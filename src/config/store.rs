use crate::config::Configuration;
use crate::error::ConfigError;
use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";

/// Reads and writes the [`Configuration`] record on disk.
///
/// The store is the only component that touches the configuration file;
/// everything else works on the in-memory value.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at the per-user default location.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Store backed by an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", "qr-filetransfer").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, falling back to defaults when it is missing or broken.
    pub fn load(&self) -> Configuration {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No configuration at {}, using defaults", self.path.display());
                return Configuration::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read configuration {}, using defaults: {}",
                    self.path.display(),
                    e
                );
                return Configuration::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse configuration, using defaults: {}", e);
            Configuration::default()
        })
    }

    /// Remove the record. Removing a record that does not exist succeeds.
    pub fn delete(&self) -> Result<(), ConfigError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Deleted configuration {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Write the record, creating its directory when needed.
    pub fn update(&self, config: &Configuration) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content).map_err(|e| self.io_error(e))?;
        tracing::debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
