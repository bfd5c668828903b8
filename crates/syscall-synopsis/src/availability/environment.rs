use std::{
    collections::HashSet,
    path::Path,
    sync::OnceLock,
};

use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::availability::AvailabilityError;

static NM_SYMBOL_RE: OnceLock<Regex> = OnceLock::new();

/// A named runtime environment that can be asked whether a symbol exists.
pub trait SymbolEnvironment {
    fn name(&self) -> &str;

    fn contains(
        &self,
        symbol: &str,
    ) -> bool;
}

impl<E: SymbolEnvironment + ?Sized> SymbolEnvironment for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn contains(
        &self,
        symbol: &str,
    ) -> bool {
        (**self).contains(symbol)
    }
}

/// An environment backed by a fixed set of symbol names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    name: String,
    symbols: HashSet<String>,
}

impl SymbolSet {
    pub fn from_names<I, S>(
        name: impl Into<String>,
        symbols: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_nm_output(
        name: impl Into<String>,
        output: &str,
    ) -> Self {
        Self::from_names(name, parse_nm_output(output))
    }

    /// One symbol per line; blank lines and `#` comments are skipped.
    pub fn load_symbol_list(
        name: impl Into<String>,
        path: &Path,
    ) -> Result<Self, AvailabilityError> {
        let content = std::fs::read_to_string(path).map_err(|source| AvailabilityError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let symbols = content.lines().map(str::trim).filter(|line| !line.is_empty() && !line.starts_with('#'));
        Ok(Self::from_names(name, symbols))
    }

    /// List the dynamic function symbols a shared object defines.
    pub async fn load_shared_library(
        name: impl Into<String>,
        path: &Path,
    ) -> Result<Self, AvailabilityError> {
        let mut command = Command::new("nm");
        command.kill_on_drop(true).args(["-D", "--defined-only"]).arg(path);

        let output = command.output().await.map_err(|source| AvailabilityError::Nm {
            path: path.to_path_buf(),
            source,
        })?;
        if !output.status.success() {
            return Err(AvailabilityError::NmFailed {
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let set = Self::from_nm_output(name, &String::from_utf8_lossy(&output.stdout));
        debug!("{}: {} function symbol(s) in {}", set.name, set.len(), path.display());
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolEnvironment for SymbolSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn contains(
        &self,
        symbol: &str,
    ) -> bool {
        self.symbols.contains(symbol)
    }
}

/// Function symbols from `nm` output, with symbol versions (`@GLIBC_2.2.5`) removed.
pub fn parse_nm_output(output: &str) -> Vec<String> {
    let re = NM_SYMBOL_RE.get_or_init(|| {
        Regex::new(r"^\s*[0-9A-Fa-f]*\s+[TtWwi]\s+([A-Za-z_][A-Za-z0-9_]*)(?:@.*)?$").expect("nm pattern is valid")
    });

    output.lines().filter_map(|line| re.captures(line)).map(|caps| caps[1].to_string()).collect()
}
