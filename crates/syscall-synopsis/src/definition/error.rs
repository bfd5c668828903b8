//! Error types for parameter parsing, declaration parsing and candidate selection.

/// A single parameter token that does not fit the accepted grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    #[error("parameter `{parameter}` has no separable type and name")]
    MissingName { parameter: String },

    #[error("unexpected token `{token}` in parameter `{parameter}`")]
    UnexpectedToken { token: String, parameter: String },

    #[error("function pointer parameter `{parameter}` has no `(*` declarator")]
    MalformedFunctionPointer { parameter: String },

    #[error("invalid parameter record: {reason}")]
    InvalidRecord { reason: &'static str },
}

/// A declaration line that could not be turned into a [`Definition`](super::Definition).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    #[error("declaration `{line}` has no opening parenthesis")]
    MissingOpenParen { line: String },

    #[error("declaration `{line}` has no closing parenthesis")]
    MissingCloseParen { line: String },

    #[error("declaration `{line}` has no separable return type and name")]
    MissingName { line: String },

    #[error("declaration `{line}` has an empty parameter list")]
    EmptyParameterList { line: String },

    #[error("malformed parameter `{token}`: {source}")]
    Parameter {
        token: String,
        #[source]
        source: ParameterError,
    },

    #[error("parameter `{token}` renders back as `{rendered}`")]
    RoundTrip { token: String, rendered: String },
}

/// Candidate selection failures for one call name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("no declaration matches `{call_name}`")]
    NoMatchingDeclaration { call_name: String },

    #[error("`{call_name}` matches several versioned declarations: {}", .candidates.join("; "))]
    AmbiguousDeclaration { call_name: String, candidates: Vec<String> },
}
