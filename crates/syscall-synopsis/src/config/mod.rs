//! Settings loaded from `syscall-synopsis.toml`.
//!
//! Settings are split into one file per category. [`Settings`] aggregates all
//! categories and deserializes partial TOML documents through private `*Patch`
//! structs, so a config file only needs the keys it changes.

pub(crate) mod availability;
pub(crate) mod logging;
pub(crate) mod lookup;
pub(crate) mod manual;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use availability::AvailabilitySettingsPatch;
pub use availability::{AvailabilitySettings, LibraryKind, LibrarySpec};
use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use lookup::LookupSettingsPatch;
pub use lookup::{LookupSettings, MAX_CONCURRENCY, MAX_JOINED_LINES, MIN_CONCURRENCY, MIN_JOINED_LINES};
use manual::ManualSettingsPatch;
pub use manual::{DEFAULT_MAN_COMMAND, DEFAULT_MAN_SECTION, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS, ManualSettings};
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "syscall-synopsis.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub manual: ManualSettings,
    pub lookup: LookupSettings,
    pub availability: AvailabilitySettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::default().merged_with_toml(content, "<inline>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::default().merged_with_toml(&content, &path.display().to_string())
    }

    /// Load the nearest config file above `start`, or defaults when there is none.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        match find_config_file(start) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn merged_with_toml(
        &self,
        content: &str,
        origin: &str,
    ) -> Result<Self, ConfigError> {
        let patch: SettingsPatch = toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;

        let mut merged = self.clone();
        merged.apply_patch(patch);
        merged.normalize();
        Ok(merged)
    }

    fn apply_patch(
        &mut self,
        patch: SettingsPatch,
    ) {
        if let Some(p) = patch.manual {
            self.manual.apply_patch(p);
        }
        if let Some(p) = patch.lookup {
            self.lookup.apply_patch(p);
        }
        if let Some(p) = patch.availability {
            self.availability.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.manual.normalize();
        self.lookup.normalize();
        self.availability.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct SettingsPatch {
    manual: Option<ManualSettingsPatch>,
    lookup: Option<LookupSettingsPatch>,
    availability: Option<AvailabilitySettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, toml::Value>,
}

/// Walks parent directories from `start` looking for [`CONFIG_FILENAME`].
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
