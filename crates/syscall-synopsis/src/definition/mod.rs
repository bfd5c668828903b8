//! Declaration parsing and candidate selection.
//!
//! A synopsis line such as `int open(const char *pathname, int flags);` is
//! parsed into a [`Definition`] whose [`Parameter`]s carry their qualifiers and
//! declarator shape. [`select_definition`] then picks the declaration that
//! documents a given call name out of everything found on its page.

mod declaration;
mod error;
mod parameter;
mod select;

pub use declaration::{Definition, parse_declaration};
pub use error::{DeclarationError, ParameterError, SelectError};
pub use parameter::{Parameter, Qualifiers, ValueParameter, parse_parameter};
pub use select::select_definition;
