use std::collections::HashMap;

use serde::Deserialize;

pub const MIN_JOINED_LINES: usize = 1;
pub const MAX_JOINED_LINES: usize = 8;
pub const MIN_CONCURRENCY: usize = 1;
pub const MAX_CONCURRENCY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct LookupSettings {
    /// Continuation lines joined onto a declaration that does not end in `;`.
    pub max_joined_lines: usize,
    /// Lookups in flight during a batch; `0` means one per available core.
    pub concurrency: usize,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            max_joined_lines: 3,
            concurrency: 0,
        }
    }
}

impl LookupSettings {
    pub fn resolved_concurrency(&self) -> usize {
        if self.concurrency == 0 {
            return std::thread::available_parallelism().map(|n| n.get()).unwrap_or(MIN_CONCURRENCY);
        }
        self.concurrency
    }

    pub(crate) fn apply_patch(
        &mut self,
        patch: LookupSettingsPatch,
    ) {
        if let Some(v) = patch.max_joined_lines {
            self.max_joined_lines = v;
        }
        if let Some(v) = patch.concurrency {
            self.concurrency = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.max_joined_lines = self.max_joined_lines.clamp(MIN_JOINED_LINES, MAX_JOINED_LINES);
        if self.concurrency != 0 {
            self.concurrency = self.concurrency.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY);
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct LookupSettingsPatch {
    pub(crate) max_joined_lines: Option<usize>,
    pub(crate) concurrency: Option<usize>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
