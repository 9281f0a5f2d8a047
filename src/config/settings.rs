use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::engine::error::{SplitError, SplitResult};

/// Values read from an optional JSON config file.
///
/// Every field is optional; anything missing falls back to the command line
/// or the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Dataset root whose subdirectories are labels
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,

    /// Destination root for the split groups
    #[serde(default)]
    pub destination_path: Option<PathBuf>,

    #[serde(default)]
    pub train_ratio: Option<f64>,

    /// Only used by three-way splits
    #[serde(default)]
    pub test_ratio: Option<f64>,

    /// Image extensions, with or without the leading dot
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    #[serde(default)]
    pub seed: Option<u64>,
}

impl Settings {
    /// Path of the config file in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dataset-splitter").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> SplitResult<Self> {
        info!("Loading settings from: {:?}", path);
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SplitError::NotFound(path.to_path_buf())
            } else {
                SplitError::io(path, e)
            }
        })?;
        Self::parse(&contents).map_err(|e| {
            SplitError::config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// Load from `explicit` if given, otherwise from the default location
    /// when a file exists there.
    pub fn load(explicit: Option<&Path>) -> SplitResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            Some(path) => {
                info!("No settings file at {:?}. Using defaults.", path);
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory. Using defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}
