use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// How a configured environment's symbols are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryKind {
    /// A shared object whose dynamic symbols are listed with `nm`.
    #[default]
    SharedObject,
    /// A text file with one symbol name per line.
    SymbolList,
}

impl LibraryKind {
    pub(crate) fn from_setting_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "symbols" | "symbol-list" | "list" => Self::SymbolList,
            _ => Self::SharedObject,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibrarySpec {
    pub name: String,
    pub path: String,
    pub kind: LibraryKind,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AvailabilitySettings {
    /// Environment precedence; empty means every environment is checked independently.
    pub order: Vec<String>,
    pub libraries: Vec<LibrarySpec>,
}

impl AvailabilitySettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: AvailabilitySettingsPatch,
    ) {
        if let Some(v) = patch.order {
            self.order = v;
        }
        if let Some(libraries) = patch.libraries {
            self.libraries = libraries
                .into_iter()
                .filter_map(|lib| {
                    Some(LibrarySpec {
                        name: lib.name?,
                        path: lib.path?,
                        kind: lib.kind.as_deref().map(LibraryKind::from_setting_value).unwrap_or_default(),
                    })
                })
                .collect();
        }
    }

    pub(crate) fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.order = self
            .order
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();

        let mut seen = HashSet::new();
        self.libraries.retain_mut(|lib| {
            lib.name = lib.name.trim().to_string();
            lib.path = lib.path.trim().to_string();
            !lib.name.is_empty() && !lib.path.is_empty() && seen.insert(lib.name.clone())
        });
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct AvailabilitySettingsPatch {
    pub(crate) order: Option<Vec<String>>,
    pub(crate) libraries: Option<Vec<LibrarySpecPatch>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct LibrarySpecPatch {
    pub(crate) name: Option<String>,
    pub(crate) path: Option<String>,
    pub(crate) kind: Option<String>,
}
