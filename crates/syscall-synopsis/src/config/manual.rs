use std::{collections::HashMap, time::Duration};

use serde::Deserialize;

use crate::manpage::ManCommand;

pub const DEFAULT_MAN_COMMAND: &str = "man";
pub const DEFAULT_MAN_SECTION: &str = "2";
pub const MIN_TIMEOUT_MS: u64 = 100;
pub const MAX_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ManualSettings {
    pub command: String,
    pub section: String,
    pub timeout_ms: u64,
}

impl Default for ManualSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_MAN_COMMAND.to_string(),
            section: DEFAULT_MAN_SECTION.to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ManualSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn man_command(&self) -> ManCommand {
        ManCommand::new(self.command.clone(), self.section.clone(), self.timeout())
    }

    pub(crate) fn apply_patch(
        &mut self,
        patch: ManualSettingsPatch,
    ) {
        if let Some(v) = patch.command {
            self.command = v;
        }
        if let Some(v) = patch.section {
            self.section = v;
        }
        if let Some(v) = patch.timeout_ms {
            self.timeout_ms = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.command = self.command.trim().to_string();
        if self.command.is_empty() {
            self.command = DEFAULT_MAN_COMMAND.to_string();
        }
        self.section = self.section.trim().to_string();
        if self.section.is_empty() {
            self.section = DEFAULT_MAN_SECTION.to_string();
        }
        self.timeout_ms = self.timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct ManualSettingsPatch {
    pub(crate) command: Option<String>,
    pub(crate) section: Option<String>,
    pub(crate) timeout_ms: Option<u64>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
