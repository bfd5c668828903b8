use std::sync::OnceLock;

use regex::Regex;

const SYNOPSIS_HEADER: &str = "SYNOPSIS";
const DESCRIPTION_HEADER: &str = "DESCRIPTION";
const TYPEDEF_PREFIX: &str = "typedef";

/// A synopsis line containing this marker means the call is not implemented.
pub const UNIMPLEMENTED_MARKER: &str = "Unimplemented";

static OVERSTRIKE_RE: OnceLock<Regex> = OnceLock::new();

/// Candidate declaration lines of one page, or the unimplemented marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synopsis {
    Unimplemented,
    /// Joined, comment-free lines ending in `);`, in page order.
    Declarations(Vec<String>),
}

/// Remove `X\bX` / `_\bX` overstrike sequences that `man` emits for bold and underline.
pub fn strip_overstrike(text: &str) -> String {
    let re = OVERSTRIKE_RE.get_or_init(|| Regex::new(r".\x08").expect("overstrike pattern is valid"));
    re.replace_all(text, "").into_owned()
}

/// Collect candidate declarations from the `SYNOPSIS` block of a rendered page.
///
/// A declaration that does not end with `;` on its own line is joined with up
/// to `max_joined_lines` following lines. The following lines are not consumed,
/// so a declaration starting on one of them is still found.
pub fn extract_synopsis(
    page: &str,
    max_joined_lines: usize,
) -> Synopsis {
    let page = strip_overstrike(page);
    let block = synopsis_block(&page);

    let mut declarations = Vec::new();
    for (idx, raw) in block.iter().enumerate() {
        let line = raw.trim();
        if line.contains(UNIMPLEMENTED_MARKER) {
            return Synopsis::Unimplemented;
        }
        if line.starts_with(TYPEDEF_PREFIX) {
            continue;
        }

        let mut line = strip_comment(line);
        if !looks_like_declaration_start(&line) {
            continue;
        }

        for next in block[idx + 1..].iter().take(max_joined_lines) {
            if line.ends_with(';') {
                break;
            }
            line.push(' ');
            line.push_str(next.trim());
            line = strip_comment(&line);
        }

        if looks_like_declaration_start(&line) && line.ends_with(");") {
            declarations.push(line);
        }
    }

    Synopsis::Declarations(declarations)
}

fn synopsis_block(page: &str) -> Vec<&str> {
    page.lines()
        .skip_while(|line| line.trim_end() != SYNOPSIS_HEADER)
        .skip(1)
        .take_while(|line| line.trim_end() != DESCRIPTION_HEADER)
        .collect()
}

/// Drop everything from the first `/*` to the last `*/`.
fn strip_comment(line: &str) -> String {
    match (line.find("/*"), line.rfind("*/")) {
        (Some(start), Some(end)) if start < end => {
            let mut stripped = String::with_capacity(line.len());
            stripped.push_str(&line[..start]);
            stripped.push_str(&line[end + 2..]);
            stripped.trim().to_string()
        },
        _ => line.to_string(),
    }
}

fn looks_like_declaration_start(line: &str) -> bool {
    line.split_whitespace().nth(1).is_some() && line.contains('(')
}

#[cfg(test)]
#[path = "../../tests/src/manpage/synopsis_tests.rs"]
mod tests;
