use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::definition::error::ParameterError;

const VARIADIC_MARKER: &str = "...";
const FUNCTION_POINTER_MARKER: &str = " (*";
const CONST_POINTER_MARKER: &str = "*const";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QualifierKeyword {
    Const,
    Unsigned,
    Struct,
    Union,
    Enum,
}

const QUALIFIER_KEYWORDS: &[(&str, QualifierKeyword)] = &[
    ("const", QualifierKeyword::Const),
    ("unsigned", QualifierKeyword::Unsigned),
    ("struct", QualifierKeyword::Struct),
    ("union", QualifierKeyword::Union),
    ("enum", QualifierKeyword::Enum),
];

impl QualifierKeyword {
    fn from_token(token: &str) -> Option<Self> {
        QUALIFIER_KEYWORDS.iter().find(|(keyword, _)| *keyword == token).map(|(_, qualifier)| *qualifier)
    }
}

/// Type qualifiers written before the base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Qualifiers {
    pub is_const: bool,
    pub is_unsigned: bool,
    pub is_struct: bool,
    pub is_union: bool,
    pub is_enum: bool,
}

impl Qualifiers {
    fn set(
        &mut self,
        keyword: QualifierKeyword,
    ) {
        match keyword {
            QualifierKeyword::Const => self.is_const = true,
            QualifierKeyword::Unsigned => self.is_unsigned = true,
            QualifierKeyword::Struct => self.is_struct = true,
            QualifierKeyword::Union => self.is_union = true,
            QualifierKeyword::Enum => self.is_enum = true,
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An ordinary `type name` parameter, possibly a pointer and/or an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueParameter {
    pub base_type: String,
    pub name: String,
    pub qualifiers: Qualifiers,
    pub is_pointer: bool,
    /// The pointer itself is `const`, as in `char *const argv[]`.
    pub is_const_pointer: bool,
    pub is_array: bool,
}

/// One formal parameter of a declaration.
///
/// The declarator shape is carried by the variant, so a function pointer can
/// never also be an array and the variadic marker never carries a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ParameterRecord", try_from = "ParameterRecord")]
pub enum Parameter {
    /// The trailing `...` marker.
    Variadic,
    /// `return_type (*name)(args)`. `declarator` keeps the text from `(*` onward.
    FunctionPointer { return_type: String, declarator: String },
    Value(ValueParameter),
}

impl Parameter {
    pub fn is_variadic(&self) -> bool {
        matches!(self, Self::Variadic)
    }

    pub fn is_function_pointer(&self) -> bool {
        matches!(self, Self::FunctionPointer { .. })
    }

    /// Base type name; the return type for function pointers, empty for `...`.
    pub fn base_type(&self) -> &str {
        match self {
            Self::Variadic => "",
            Self::FunctionPointer { return_type, .. } => return_type,
            Self::Value(value) => &value.base_type,
        }
    }

    /// Identifier; the pointer declarator text for function pointers, empty for `...`.
    pub fn name(&self) -> &str {
        match self {
            Self::Variadic => "",
            Self::FunctionPointer { declarator, .. } => declarator,
            Self::Value(value) => &value.name,
        }
    }

    pub fn qualifiers(&self) -> Qualifiers {
        match self {
            Self::Value(value) => value.qualifiers,
            _ => Qualifiers::default(),
        }
    }

    pub fn is_const(&self) -> bool {
        self.qualifiers().is_const
    }

    pub fn is_unsigned(&self) -> bool {
        self.qualifiers().is_unsigned
    }

    pub fn is_struct(&self) -> bool {
        self.qualifiers().is_struct
    }

    pub fn is_union(&self) -> bool {
        self.qualifiers().is_union
    }

    pub fn is_enum(&self) -> bool {
        self.qualifiers().is_enum
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Value(value) if value.is_pointer)
    }

    pub fn is_const_pointer(&self) -> bool {
        matches!(self, Self::Value(value) if value.is_const_pointer)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Value(value) if value.is_array)
    }
}

impl FromStr for Parameter {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_parameter(s)
    }
}

/// Parse one whitespace-normalized parameter token such as `const char *pathname`.
pub fn parse_parameter(parameter: &str) -> Result<Parameter, ParameterError> {
    if parameter == VARIADIC_MARKER {
        return Ok(Parameter::Variadic);
    }

    if parameter.ends_with(')') {
        return parse_function_pointer(parameter);
    }

    let (type_part, name_part) = match parameter.rsplit_once(char::is_whitespace) {
        Some((type_part, name_part)) if !type_part.trim().is_empty() && !name_part.is_empty() => {
            (type_part.trim(), name_part)
        },
        _ => {
            return Err(ParameterError::MissingName {
                parameter: parameter.to_string(),
            });
        },
    };

    let (name, is_pointer) = match name_part.strip_prefix('*') {
        Some(rest) => (rest, true),
        None => (name_part, false),
    };
    let (name, is_array) = match name.strip_suffix("[]") {
        Some(rest) => (rest, true),
        None => (name, false),
    };

    let scanned = scan_type(type_part, parameter)?;

    Ok(Parameter::Value(ValueParameter {
        base_type: scanned.base_type.to_string(),
        name: name.to_string(),
        qualifiers: scanned.qualifiers,
        is_pointer,
        is_const_pointer: scanned.is_const_pointer,
        is_array,
    }))
}

fn parse_function_pointer(parameter: &str) -> Result<Parameter, ParameterError> {
    let Some(split) = parameter.find(FUNCTION_POINTER_MARKER) else {
        return Err(ParameterError::MalformedFunctionPointer {
            parameter: parameter.to_string(),
        });
    };

    let return_type = parameter[..split].trim();
    if return_type.is_empty() {
        return Err(ParameterError::MalformedFunctionPointer {
            parameter: parameter.to_string(),
        });
    }

    Ok(Parameter::FunctionPointer {
        return_type: return_type.to_string(),
        declarator: parameter[split..].trim().to_string(),
    })
}

struct ScannedType<'a> {
    qualifiers: Qualifiers,
    base_type: &'a str,
    is_const_pointer: bool,
}

/// Peel qualifier keywords off the front of `type_part` until one token is left.
///
/// A non-keyword token is only accepted when everything after it is `*const`;
/// any other unknown token rejects the whole parameter.
fn scan_type<'a>(
    type_part: &'a str,
    parameter: &str,
) -> Result<ScannedType<'a>, ParameterError> {
    let mut qualifiers = Qualifiers::default();
    let mut rest = type_part;

    while let Some((token, tail)) = rest.split_once(char::is_whitespace) {
        let tail = tail.trim_start();
        if let Some(keyword) = QualifierKeyword::from_token(token) {
            qualifiers.set(keyword);
            rest = tail;
            continue;
        }

        if tail == CONST_POINTER_MARKER {
            return Ok(ScannedType {
                qualifiers,
                base_type: token,
                is_const_pointer: true,
            });
        }

        return Err(ParameterError::UnexpectedToken {
            token: token.to_string(),
            parameter: parameter.to_string(),
        });
    }

    Ok(ScannedType {
        qualifiers,
        base_type: rest,
        is_const_pointer: false,
    })
}

impl fmt::Display for Parameter {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Variadic => f.write_str(VARIADIC_MARKER),
            Self::FunctionPointer {
                return_type,
                declarator,
            } => write!(f, "{return_type} {declarator}"),
            Self::Value(value) => fmt::Display::fmt(value, f),
        }
    }
}

impl fmt::Display for ValueParameter {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let q = &self.qualifiers;
        if q.is_const {
            f.write_str("const ")?;
        }
        if q.is_struct {
            f.write_str("struct ")?;
        }
        if q.is_union {
            f.write_str("union ")?;
        }
        if q.is_enum {
            f.write_str("enum ")?;
        }
        if q.is_unsigned {
            f.write_str("unsigned ")?;
        }

        write!(f, "{} ", self.base_type)?;

        // `*const` belongs to the type, the plain `*` sticks to the name.
        if self.is_const_pointer {
            f.write_str("*const ")?;
        }
        if self.is_pointer {
            f.write_str("*")?;
        }

        f.write_str(&self.name)?;

        if self.is_array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// Flat serialized form of a [`Parameter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParameterRecord {
    is_variadic: bool,
    base_type: String,
    name: String,
    is_const: bool,
    is_unsigned: bool,
    is_struct: bool,
    is_union: bool,
    is_enum: bool,
    is_pointer: bool,
    is_const_pointer: bool,
    is_array: bool,
    is_function_pointer: bool,
}

impl From<Parameter> for ParameterRecord {
    fn from(parameter: Parameter) -> Self {
        let qualifiers = parameter.qualifiers();
        let (is_pointer, is_const_pointer, is_array) =
            (parameter.is_pointer(), parameter.is_const_pointer(), parameter.is_array());
        let (is_variadic, is_function_pointer) = (parameter.is_variadic(), parameter.is_function_pointer());

        let (base_type, name) = match parameter {
            Parameter::Variadic => (String::new(), String::new()),
            Parameter::FunctionPointer {
                return_type,
                declarator,
            } => (return_type, declarator),
            Parameter::Value(value) => (value.base_type, value.name),
        };

        Self {
            is_variadic,
            base_type,
            name,
            is_const: qualifiers.is_const,
            is_unsigned: qualifiers.is_unsigned,
            is_struct: qualifiers.is_struct,
            is_union: qualifiers.is_union,
            is_enum: qualifiers.is_enum,
            is_pointer,
            is_const_pointer,
            is_array,
            is_function_pointer,
        }
    }
}

impl TryFrom<ParameterRecord> for Parameter {
    type Error = ParameterError;

    fn try_from(record: ParameterRecord) -> Result<Self, Self::Error> {
        let qualifiers = Qualifiers {
            is_const: record.is_const,
            is_unsigned: record.is_unsigned,
            is_struct: record.is_struct,
            is_union: record.is_union,
            is_enum: record.is_enum,
        };
        let has_declarator_flags = record.is_pointer || record.is_const_pointer || record.is_array;

        if record.is_variadic {
            if record.is_function_pointer
                || has_declarator_flags
                || !qualifiers.is_empty()
                || !record.base_type.is_empty()
                || !record.name.is_empty()
            {
                return Err(ParameterError::InvalidRecord {
                    reason: "variadic parameter carries other fields",
                });
            }
            return Ok(Self::Variadic);
        }

        if record.is_function_pointer {
            if has_declarator_flags || !qualifiers.is_empty() {
                return Err(ParameterError::InvalidRecord {
                    reason: "function pointer parameter carries qualifier or declarator flags",
                });
            }
            return Ok(Self::FunctionPointer {
                return_type: record.base_type,
                declarator: record.name,
            });
        }

        Ok(Self::Value(ValueParameter {
            base_type: record.base_type,
            name: record.name,
            qualifiers,
            is_pointer: record.is_pointer,
            is_const_pointer: record.is_const_pointer,
            is_array: record.is_array,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/src/definition/parameter_tests.rs"]
mod tests;
