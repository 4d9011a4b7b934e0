use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stocking_refs::BundledAssets;

use crate::error::{SdkError, SdkResult};

/// Directory the file-backed store lives in when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = ".stocking";

/// Settings for a [`Calendar`](crate::Calendar).
///
/// Every field is optional in TOML; missing fields take their defaults.
///
/// ```toml
/// data_dir = "/var/lib/stocking"
/// log_level = "debug"
///
/// [bundled]
/// base = "/static/"
/// tada = "fanfare.ogg"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub bundled: BundledAssets,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_level: "info".into(),
            bundled: BundledAssets::default(),
        }
    }
}

impl CalendarConfig {
    /// Read a TOML config file.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}
