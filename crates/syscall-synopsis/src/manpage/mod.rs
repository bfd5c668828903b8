//! Manual page retrieval and synopsis extraction.

mod source;
mod synopsis;

pub use source::{FetchError, InMemoryPages, ManCommand, ManualSource, PageDirectory, PageSource};
pub use synopsis::{Synopsis, UNIMPLEMENTED_MARKER, extract_synopsis, strip_overstrike};
