use tracing::debug;

use crate::definition::{declaration::Definition, error::SelectError};

/// Pick the one declaration that documents `call_name` from all declarations
/// found on its page.
///
/// Candidates are narrowed in order:
/// 1. `_name` is renamed to `name` when `name` is a prefix of the call name.
/// 2. Only names that are a prefix of the call name survive (`eventfd` for `eventfd2`).
/// 3. An exact name match wins; among several, the one with the most parameters.
/// 4. Otherwise the call name without its trailing version digits must match
///    exactly one candidate.
pub fn select_definition(
    mut candidates: Vec<Definition>,
    call_name: &str,
) -> Result<Definition, SelectError> {
    for candidate in &mut candidates {
        normalize_leading_underscore(candidate, call_name);
    }
    candidates.retain(|candidate| call_name.starts_with(candidate.name.as_str()));

    match candidates.len() {
        0 => {
            return Err(SelectError::NoMatchingDeclaration {
                call_name: call_name.to_string(),
            });
        },
        1 => return Ok(candidates.remove(0)),
        n => debug!("{n} declarations admissible for {call_name}"),
    }

    if let Some(best) = take_richest_exact_match(&mut candidates, call_name) {
        return Ok(best);
    }

    select_versioned_synonym(candidates, call_name)
}

fn normalize_leading_underscore(
    candidate: &mut Definition,
    call_name: &str,
) {
    if let Some(public_name) = candidate.name.strip_prefix('_')
        && !public_name.is_empty()
        && call_name.starts_with(public_name)
    {
        candidate.name = public_name.to_string();
    }
}

/// Removes and returns the exact-name candidate with the most parameters.
/// The earliest one wins a tie.
fn take_richest_exact_match(
    candidates: &mut Vec<Definition>,
    call_name: &str,
) -> Option<Definition> {
    let mut best: Option<usize> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        if candidate.name != call_name {
            continue;
        }
        match best {
            Some(best_idx) if candidates[best_idx].parameter_count() >= candidate.parameter_count() => {},
            _ => best = Some(idx),
        }
    }
    best.map(|idx| candidates.swap_remove(idx))
}

/// Matches a versioned call name (`chown32`, `eventfd2`) against a candidate
/// documented under the unversioned name.
///
/// The comparison strips trailing digits from the call name. Stripping them from
/// the candidate instead can never succeed once the prefix filter has run, so this
/// rule follows the documented intent rather than any observed behavior.
fn select_versioned_synonym(
    candidates: Vec<Definition>,
    call_name: &str,
) -> Result<Definition, SelectError> {
    let unversioned = strip_version_suffix(call_name);
    let mut synonyms: Vec<Definition> = if unversioned.is_empty() || unversioned == call_name {
        Vec::new()
    } else {
        candidates.into_iter().filter(|candidate| candidate.name == unversioned).collect()
    };

    match synonyms.len() {
        0 => Err(SelectError::NoMatchingDeclaration {
            call_name: call_name.to_string(),
        }),
        1 => Ok(synonyms.remove(0)),
        _ => Err(SelectError::AmbiguousDeclaration {
            call_name: call_name.to_string(),
            candidates: synonyms.iter().map(ToString::to_string).collect(),
        }),
    }
}

fn strip_version_suffix(call_name: &str) -> &str {
    call_name.trim_end_matches(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
#[path = "../../tests/src/definition/select_tests.rs"]
mod tests;
