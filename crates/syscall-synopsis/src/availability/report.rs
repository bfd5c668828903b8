use std::fmt;

use serde::Serialize;

/// Call names found in one environment, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSymbols {
    pub environment: String,
    pub symbols: Vec<String>,
}

impl EnvironmentSymbols {
    pub(crate) fn new(environment: &str) -> Self {
        Self {
            environment: environment.to_string(),
            symbols: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    pub environments: Vec<EnvironmentSymbols>,
    /// Call names no probed environment provides.
    pub unavailable: Vec<String>,
}

impl fmt::Display for EnvironmentSymbols {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let title = format!("Functions in {}({})", self.environment, self.symbols.len());
        writeln!(f, "{title}")?;
        writeln!(f, "{}", "-".repeat(title.len()))?;
        for symbol in &self.symbols {
            writeln!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl fmt::Display for AvailabilityReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut environments: Vec<&EnvironmentSymbols> = self.environments.iter().collect();
        // Stable sort keeps the probe order among equal counts.
        environments.sort_by(|a, b| b.symbols.len().cmp(&a.symbols.len()));
        for environment in environments {
            writeln!(f, "{environment}")?;
        }

        let title = format!("Syscalls not in any of the examined environments ({}):", self.unavailable.len());
        writeln!(f, "{title}")?;
        writeln!(f, "{}", "-".repeat(title.len()))?;
        for call_name in &self.unavailable {
            writeln!(f, "{call_name}")?;
        }
        Ok(())
    }
}
