pub mod availability;
pub mod config;
pub mod definition;
pub mod lookup;
pub mod manpage;

pub use availability::{AvailabilityReport, ScanOrder, SymbolEnvironment, SymbolSet, check_availability};
pub use config::Settings;
pub use definition::{
    DeclarationError, Definition, Parameter, ParameterError, Qualifiers, SelectError, ValueParameter,
    parse_declaration, parse_parameter, select_definition,
};
pub use lookup::{BatchReport, LookupError, LookupKind, LookupResult, SyscallResolver, classify_page};
pub use manpage::{InMemoryPages, ManCommand, ManualSource, PageDirectory, PageSource, Synopsis, extract_synopsis};
