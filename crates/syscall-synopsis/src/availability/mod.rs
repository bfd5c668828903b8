//! Which runtime environments already expose a function for each call name.
//!
//! Environments are probed by symbol name only. With [`ScanOrder::Unordered`]
//! a call name is recorded in every environment that has it; with
//! [`ScanOrder::Ordered`] only the listed environments are probed, in that
//! order, and the first match wins.

mod environment;
mod report;

pub use environment::{SymbolEnvironment, SymbolSet, parse_nm_output};
pub use report::{AvailabilityReport, EnvironmentSymbols};

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::config::{LibraryKind, LibrarySpec};

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("environment `{name}` named in the scan order was not loaded")]
    UnknownEnvironment { name: String },

    #[error("failed to run `nm` on {}: {source}", .path.display())]
    Nm {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`nm` failed on {}: {stderr}", .path.display())]
    NmFailed { path: PathBuf, stderr: String },

    #[error("failed to read symbol list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Environment precedence for [`check_availability`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// Probe every environment; a call name may be recorded in several.
    #[default]
    Unordered,
    /// Probe only these environments, first match wins.
    Ordered(Vec<String>),
}

impl ScanOrder {
    /// Names are trimmed and repeats dropped. An empty list means no precedence.
    pub fn from_names(names: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty() && seen.insert(name.clone()))
            .collect();
        if names.is_empty() {
            Self::Unordered
        } else {
            Self::Ordered(names)
        }
    }
}

/// Load every configured environment, in configuration order.
pub async fn load_environments(libraries: &[LibrarySpec]) -> Result<Vec<SymbolSet>, AvailabilityError> {
    let mut environments = Vec::with_capacity(libraries.len());
    for library in libraries {
        let path = Path::new(&library.path);
        let environment = match library.kind {
            LibraryKind::SharedObject => SymbolSet::load_shared_library(library.name.clone(), path).await?,
            LibraryKind::SymbolList => SymbolSet::load_symbol_list(library.name.clone(), path)?,
        };
        environments.push(environment);
    }
    Ok(environments)
}

pub fn check_availability<E: SymbolEnvironment>(
    environments: &[E],
    call_names: &[String],
    order: &ScanOrder,
) -> Result<AvailabilityReport, AvailabilityError> {
    let probed: Vec<usize> = match order {
        ScanOrder::Unordered => (0..environments.len()).collect(),
        ScanOrder::Ordered(names) => names
            .iter()
            .map(|name| {
                environments.iter().position(|env| env.name() == name).ok_or_else(|| {
                    AvailabilityError::UnknownEnvironment {
                        name: name.clone(),
                    }
                })
            })
            .collect::<Result<_, _>>()?,
    };

    let mut found: Vec<EnvironmentSymbols> =
        probed.iter().map(|&idx| EnvironmentSymbols::new(environments[idx].name())).collect();
    let mut unavailable = Vec::new();

    for call_name in call_names {
        let mut contained = false;
        for (slot, &idx) in probed.iter().enumerate() {
            if !environments[idx].contains(call_name) {
                continue;
            }
            found[slot].symbols.push(call_name.clone());
            contained = true;
            if matches!(order, ScanOrder::Ordered(_)) {
                break;
            }
        }

        if !contained {
            debug!("{call_name} is not available in any environment");
            unavailable.push(call_name.clone());
        }
    }

    Ok(AvailabilityReport {
        environments: found,
        unavailable,
    })
}

#[cfg(test)]
#[path = "../../tests/src/availability/availability_tests.rs"]
mod tests;
