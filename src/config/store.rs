//! Loading and saving config files
//!
//! Reads are synchronous and happen once at startup. Writes go through a
//! temp file and a rename so an interrupted save never leaves a truncated
//! config behind.

use super::types::{GlobalConfig, ProjectInfo};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding config files, under the home directory or a project
pub const CONFIG_DIR: &str = ".erda.d";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config";

/// Location of the global config file
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
        .ok_or_else(|| Error::config("Cannot determine the home directory"))
}

/// Store for the global config file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the given file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a store for the file under the home directory
    pub fn at_default() -> Result<Self> {
        Ok(Self::new(default_config_path()?))
    }

    /// Path of the config file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, or an empty one when the file does not exist yet
    pub fn load(&self) -> Result<GlobalConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no global config, using defaults");
            return Ok(GlobalConfig::new());
        }
        read_yaml(&self.path)
    }

    /// Save the config atomically, creating its directory if needed
    pub async fn save(&self, config: &GlobalConfig) -> Result<()> {
        write_yaml(&self.path, config).await?;
        debug!(path = %self.path.display(), "saved global config");
        Ok(())
    }
}

/// Find the nearest project config walking up from `start`
///
/// `skip` excludes one file, typically the global config, which lives at the
/// same relative path under the home directory.
pub fn find_project_config(start: &Path, skip: Option<&Path>) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .filter(|candidate| skip != Some(candidate.as_path()))
        .find(|candidate| candidate.is_file())
}

/// Load a project config file
pub fn load_project_config(path: &Path) -> Result<ProjectInfo> {
    read_yaml(path)
}

/// Save a project config file atomically
pub async fn save_project_config(path: &Path, info: &ProjectInfo) -> Result<()> {
    write_yaml(path, info).await
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {e}", path.display()))
    })?;
    serde_yaml::from_str(&contents).map_err(|e| {
        Error::config(format!("Failed to parse config file {}: {e}", path.display()))
    })
}

async fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_yaml::to_string(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            Error::config(format!("Failed to create {}: {e}", parent.display()))
        })?;
    }

    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, &contents).await.map_err(|e| {
        Error::config(format!("Failed to write config file: {e}"))
    })?;
    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        Error::config(format!("Failed to rename config file: {e}"))
    })?;

    Ok(())
}
