//! Resolution of a call name into a [`LookupResult`].
//!
//! Every lookup runs the same fixed sequence: fetch the page, extract the
//! synopsis, detect the unimplemented marker, parse each declaration line and
//! select one definition. A line that fails to parse is dropped; a fetch
//! failure or selector ambiguity ends that lookup only.

mod batch;
mod result;

use std::sync::Arc;

use tracing::{debug, warn};

pub use batch::{BatchReport, LookupDefect};
pub use result::{InvalidLookupRecord, LookupKind, LookupResult};

use crate::{
    config::LookupSettings,
    definition::{Definition, SelectError, parse_declaration, select_definition},
    manpage::{ManualSource, Synopsis, extract_synopsis},
};

/// Lookup failures that are defects rather than expected outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Ambiguous(SelectError),
}

/// Classify one call name given its page text, or `None` when no page exists.
pub fn classify_page(
    call_name: &str,
    page: Option<&str>,
    settings: &LookupSettings,
) -> Result<LookupResult, LookupError> {
    let Some(page) = page else {
        return Ok(LookupResult::no_manual_entry(call_name));
    };

    let lines = match extract_synopsis(page, settings.max_joined_lines) {
        Synopsis::Unimplemented => return Ok(LookupResult::unimplemented(call_name)),
        Synopsis::Declarations(lines) => lines,
    };

    let candidates = parse_candidates(call_name, &lines);
    if candidates.is_empty() {
        return Ok(LookupResult::no_declaration_found(call_name));
    }

    match select_definition(candidates, call_name) {
        Ok(definition) => Ok(LookupResult::found(call_name, definition)),
        Err(SelectError::NoMatchingDeclaration { .. }) => Ok(LookupResult::no_declaration_found(call_name)),
        Err(e @ SelectError::AmbiguousDeclaration { .. }) => Err(LookupError::Ambiguous(e)),
    }
}

fn parse_candidates(
    call_name: &str,
    lines: &[String],
) -> Vec<Definition> {
    lines
        .iter()
        .filter_map(|line| match parse_declaration(line) {
            Ok(definition) => Some(definition),
            Err(e) => {
                debug!("[{call_name}] dropping synopsis line `{line}`: {e}");
                None
            },
        })
        .collect()
}

/// Resolves call names against a [`ManualSource`].
pub struct SyscallResolver<S> {
    source: Arc<S>,
    settings: LookupSettings,
}

impl<S> Clone for SyscallResolver<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            settings: self.settings.clone(),
        }
    }
}

impl<S: ManualSource> SyscallResolver<S> {
    pub fn new(
        source: S,
        settings: LookupSettings,
    ) -> Self {
        Self {
            source: Arc::new(source),
            settings,
        }
    }

    pub fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    /// Fetch and classify one call name. A failed fetch counts as no manual entry.
    pub async fn lookup(
        &self,
        call_name: &str,
    ) -> Result<LookupResult, LookupError> {
        let page = match self.source.fetch(call_name).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Failed to fetch manual page: {e}");
                None
            },
        };
        if page.is_none() {
            debug!("[{call_name}] no manual entry");
        }

        classify_page(call_name, page.as_deref(), &self.settings)
    }
}

#[cfg(test)]
#[path = "../../tests/src/lookup/lookup_tests.rs"]
mod tests;
