//! Conventional-commit header parsing and scope merging.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Matches `type(scope): description` on a trimmed first line.
static CONVENTIONAL_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+)(?:\(([^)]+)\))?:\s*(.*)$").unwrap());

/// A parsed conventional-commit first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalHeader {
    /// Commit type, e.g. `fix` or `feat`.
    pub commit_type: String,
    /// Scopes in the order they were written, trimmed.
    pub scopes: Vec<String>,
    /// Everything after the colon.
    pub description: String,
}

impl ConventionalHeader {
    /// Appends each scope not already present. Returns whether anything was added.
    pub fn add_scopes<S: AsRef<str>>(&mut self, new_scopes: &[S]) -> bool {
        let mut added = false;
        for scope in new_scopes {
            let scope = scope.as_ref();
            if scope.is_empty() || self.scopes.iter().any(|s| s == scope) {
                continue;
            }
            self.scopes.push(scope.to_string());
            added = true;
        }
        added
    }
}

impl fmt::Display for ConventionalHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scopes.is_empty() {
            write!(f, "{}: {}", self.commit_type, self.description)
        } else {
            write!(
                f,
                "{}({}): {}",
                self.commit_type,
                self.scopes.join(","),
                self.description
            )
        }
    }
}

/// Parses a commit header line. Returns `None` if it has no type prefix.
pub fn parse_header(line: &str) -> Option<ConventionalHeader> {
    let caps = CONVENTIONAL_HEADER.captures(line.trim())?;

    let scopes: Vec<String> = caps
        .get(2)
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Some(ConventionalHeader {
        commit_type: caps[1].to_string(),
        scopes,
        description: caps[3].to_string(),
    })
}

/// Merges `new_scopes` into the first line of `message`.
///
/// Only the header is rewritten; the body is kept byte for byte. Messages
/// without a conventional type, or where every scope is already present,
/// come back unchanged.
pub fn merge_scopes<S: AsRef<str>>(message: &str, new_scopes: &[S]) -> String {
    let (first_line, rest) = message
        .find('\n')
        .map_or((message, ""), |i| message.split_at(i));
    let (line, line_ending) = first_line
        .strip_suffix('\r')
        .map_or((first_line, ""), |line| (line, "\r"));

    let Some(mut header) = parse_header(line) else {
        return message.to_string();
    };

    if !header.add_scopes(new_scopes) {
        return message.to_string();
    }

    format!("{header}{line_ending}{rest}")
}
