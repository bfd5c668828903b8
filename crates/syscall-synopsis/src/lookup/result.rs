use std::fmt;

use serde::{Deserialize, Serialize};

use crate::definition::Definition;

/// How a call name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKind {
    NoManualEntry,
    NoDeclarationFound,
    Unimplemented,
    Found,
}

impl LookupKind {
    pub const ALL: [Self; 4] = [Self::NoManualEntry, Self::NoDeclarationFound, Self::Unimplemented, Self::Found];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoManualEntry => "NoManualEntry",
            Self::NoDeclarationFound => "NoDeclarationFound",
            Self::Unimplemented => "Unimplemented",
            Self::Found => "Found",
        }
    }
}

/// Outcome of resolving one call name. `definition` is present iff `kind` is `Found`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LookupRecord")]
pub struct LookupResult {
    pub call_name: String,
    pub kind: LookupKind,
    pub definition: Option<Definition>,
}

impl LookupResult {
    pub fn no_manual_entry(call_name: &str) -> Self {
        Self::without_definition(call_name, LookupKind::NoManualEntry)
    }

    pub fn no_declaration_found(call_name: &str) -> Self {
        Self::without_definition(call_name, LookupKind::NoDeclarationFound)
    }

    pub fn unimplemented(call_name: &str) -> Self {
        Self::without_definition(call_name, LookupKind::Unimplemented)
    }

    pub fn found(
        call_name: &str,
        definition: Definition,
    ) -> Self {
        Self {
            call_name: call_name.to_string(),
            kind: LookupKind::Found,
            definition: Some(definition),
        }
    }

    fn without_definition(
        call_name: &str,
        kind: LookupKind,
    ) -> Self {
        Self {
            call_name: call_name.to_string(),
            kind,
            definition: None,
        }
    }
}

#[derive(Deserialize)]
struct LookupRecord {
    call_name: String,
    kind: LookupKind,
    // Required key; only an explicit `null` means no definition.
    #[serde(deserialize_with = "Option::deserialize")]
    definition: Option<Definition>,
}

#[derive(Debug, thiserror::Error)]
#[error("lookup result for `{call_name}` is {kind:?} but has_definition={has_definition}")]
pub struct InvalidLookupRecord {
    call_name: String,
    kind: LookupKind,
    has_definition: bool,
}

impl TryFrom<LookupRecord> for LookupResult {
    type Error = InvalidLookupRecord;

    fn try_from(record: LookupRecord) -> Result<Self, Self::Error> {
        let has_definition = record.definition.is_some();
        if has_definition != (record.kind == LookupKind::Found) {
            return Err(InvalidLookupRecord {
                call_name: record.call_name,
                kind: record.kind,
                has_definition,
            });
        }
        Ok(Self {
            call_name: record.call_name,
            kind: record.kind,
            definition: record.definition,
        })
    }
}

impl fmt::Display for LookupResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Syscall Name: {}\nDefinition:   ", self.call_name)?;
        match (&self.kind, &self.definition) {
            (LookupKind::Found, Some(definition)) => write!(f, "{definition}"),
            (LookupKind::NoManualEntry, _) => f.write_str("No man entry found for this system call name."),
            (LookupKind::Unimplemented, _) => f.write_str("System call is Unimplemented"),
            _ => f.write_str("Definition not found in man page."),
        }
    }
}
