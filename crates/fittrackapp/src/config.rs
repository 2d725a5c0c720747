//! # Configuration
//!
//! Fittrack configuration is loaded with [`confique`] from layered sources.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `FITTRACK_BACKEND`, `FITTRACK_DATA_DIR`, `FITTRACK_DATABASE`.
//! 2. **Config file**: the path given with `--config`, else `fittrack.toml` in the OS
//!    config directory (via `directories`). A missing default file is not an error.
//! 3. **Compiled defaults**.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `storage.backend` | `file` | Backend selected at startup (`memory`, `file`, `relational`) |
//! | `storage.data_dir` | OS data dir | Directory of the file backend |
//! | `storage.database` | `<data_dir>/fittrack.db` | SQLite database path |
//!
//! The relational endpoint is a local path, so no credentials are ever configured.

use crate::error::{FitError, Result};
use crate::model::BackendKind;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "fittrack.toml";
pub const DATABASE_FILE: &str = "fittrack.db";

/// Configuration for fittrack, stored in `fittrack.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct FitTrackConfig {
    #[config(nested)]
    pub storage: StorageConfig,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Backend selected at startup: "memory", "file" or "relational".
    #[config(default = "file", env = "FITTRACK_BACKEND")]
    pub backend: String,

    /// Directory holding history.csv and profile.csv.
    /// When absent, the OS data directory is used.
    #[config(env = "FITTRACK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// SQLite database file. When absent, `fittrack.db` inside the data directory.
    #[config(env = "FITTRACK_DATABASE")]
    pub database: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File.to_string(),
            data_dir: None,
            database: None,
        }
    }
}

impl StorageConfig {
    /// Storage rooted at `dir`, for tests and embedding.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    pub fn backend(&self) -> Result<BackendKind> {
        self.backend.parse()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn database(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| self.data_dir().join(DATABASE_FILE))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "fittrack")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".fittrack"))
}

/// `fittrack.toml` in the OS config directory, if one can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl FitTrackConfig {
    /// Load from environment, then `path` (or the default location), then defaults.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = FitTrackConfig::builder().env();
        match path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(FitError::Config(format!(
                        "config file not found: {}",
                        explicit.display()
                    )));
                }
                builder = builder.file(explicit);
            }
            None => {
                if let Some(default) = default_config_path() {
                    builder = builder.file(default);
                }
            }
        }
        let config = builder.load()?;
        config.storage.backend()?;
        Ok(config)
    }

    /// A commented sample `fittrack.toml`.
    pub fn template() -> String {
        confique::toml::template::<FitTrackConfig>(confique::toml::FormatOptions::default())
    }
}
