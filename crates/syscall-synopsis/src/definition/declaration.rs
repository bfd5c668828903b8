use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::definition::{
    error::DeclarationError,
    parameter::{Parameter, parse_parameter},
};

const NO_PARAMETERS: &str = "void";
const PARAMETER_SEPARATOR: &str = ", ";

/// One C declaration recovered from a manual page synopsis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Return type; ends in `*` for pointer-returning calls.
    pub return_type: String,
    pub name: String,
    /// Parameters in source order. Empty for a `(void)` declaration.
    pub parameters: Vec<Parameter>,
}

impl Definition {
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

impl FromStr for Definition {
    type Err = DeclarationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_declaration(s)
    }
}

/// Parse a joined, comment-free declaration line such as
/// `int open(const char *pathname, int flags);`.
pub fn parse_declaration(line: &str) -> Result<Definition, DeclarationError> {
    let line = line.trim();
    let Some((head, tail)) = line.split_once('(') else {
        return Err(DeclarationError::MissingOpenParen {
            line: line.to_string(),
        });
    };

    let (return_type, name) = split_head(head).ok_or_else(|| DeclarationError::MissingName {
        line: line.to_string(),
    })?;

    let tail = tail.trim_end();
    let tail = tail.strip_suffix(';').unwrap_or(tail).trim_end();
    let Some(parameter_list) = tail.strip_suffix(')') else {
        return Err(DeclarationError::MissingCloseParen {
            line: line.to_string(),
        });
    };
    let parameter_list = parameter_list.trim();
    if parameter_list.is_empty() {
        return Err(DeclarationError::EmptyParameterList {
            line: line.to_string(),
        });
    }

    let raw_parameters: Vec<&str> = parameter_list.split(PARAMETER_SEPARATOR).collect();
    let parameters = if raw_parameters == [NO_PARAMETERS] {
        Vec::new()
    } else {
        raw_parameters.into_iter().map(parse_raw_parameter).collect::<Result<Vec<_>, _>>()?
    };

    Ok(Definition {
        return_type,
        name,
        parameters,
    })
}

/// Split `ret_type name` on the last whitespace, moving leading `*` from the
/// name onto the return type.
fn split_head(head: &str) -> Option<(String, String)> {
    let (return_type, name) = head.trim().rsplit_once(char::is_whitespace)?;
    let mut return_type = return_type.trim_end().to_string();
    let mut name = name;
    while let Some(rest) = name.strip_prefix('*') {
        return_type.push('*');
        name = rest;
    }

    if return_type.is_empty() || name.is_empty() {
        return None;
    }
    Some((return_type, name.to_string()))
}

fn parse_raw_parameter(raw: &str) -> Result<Parameter, DeclarationError> {
    // A `*` split away from its name (`struct timespec * tp`) is glued back on.
    let token = raw.split_whitespace().collect::<Vec<_>>().join(" ").replace("* ", "*");

    let parameter = parse_parameter(&token).map_err(|source| DeclarationError::Parameter {
        token: token.clone(),
        source,
    })?;

    let rendered = parameter.to_string();
    if rendered != token {
        return Err(DeclarationError::RoundTrip {
            token,
            rendered,
        });
    }

    Ok(parameter)
}

impl fmt::Display for Definition {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        if self.parameters.is_empty() {
            f.write_str(NO_PARAMETERS)?;
        }
        for (idx, parameter) in self.parameters.iter().enumerate() {
            if idx > 0 {
                f.write_str(PARAMETER_SEPARATOR)?;
            }
            write!(f, "{parameter}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
#[path = "../../tests/src/definition/declaration_tests.rs"]
mod tests;
