#![allow(dead_code)]

use std::path::PathBuf;

use syscall_synopsis::{
    PageDirectory, Synopsis,
    config::{DEFAULT_MAN_SECTION, LookupSettings},
    extract_synopsis,
};

pub fn pages_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pages")
}

pub fn page_directory() -> PageDirectory {
    PageDirectory::new(pages_root(), DEFAULT_MAN_SECTION)
}

pub fn read_page(call_name: &str) -> String {
    let path = pages_root().join(format!("{call_name}.{DEFAULT_MAN_SECTION}"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {} must exist: {e}", path.display()))
}

/// Joined synopsis lines of every fixture page, in call-name order.
pub fn all_synopsis_lines() -> Vec<String> {
    let settings = LookupSettings::default();
    page_directory()
        .call_names()
        .iter()
        .filter_map(|name| match extract_synopsis(&read_page(name), settings.max_joined_lines) {
            Synopsis::Declarations(lines) => Some(lines),
            Synopsis::Unimplemented => None,
        })
        .flatten()
        .collect()
}
