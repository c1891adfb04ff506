//! Best-effort reader for Takeout "saved places" CSV exports.
//!
//! # Invariants
//! - The first two lines are header/metadata and never produce candidates.
//! - Blank lines are skipped.
//! - Fields are split on every comma; quoted fields containing commas are
//!   NOT supported and end up split across columns.

use serde::Serialize;

/// Number of leading non-data lines in an export.
pub const TAKEOUT_HEADER_LINES: usize = 2;

/// One data row of a Takeout export, mapped positionally onto
/// `title, note, url, tags, comments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TakeoutCandidate {
    pub title: String,
    pub note: String,
    pub url: String,
    pub tags: String,
    pub comments: String,
}

/// Parses CSV text into import candidates.
///
/// Missing trailing fields become empty strings; extra fields are ignored.
pub fn parse_takeout_csv(content: &str) -> Vec<TakeoutCandidate> {
    content
        .split('\n')
        .skip(TAKEOUT_HEADER_LINES)
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> TakeoutCandidate {
    let mut fields = line.split(',').map(clean_field);
    let mut next = || fields.next().unwrap_or_default();
    TakeoutCandidate {
        title: next(),
        note: next(),
        url: next(),
        tags: next(),
        comments: next(),
    }
}

fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
    unquoted.trim().to_string()
}
