//! Module rules: validation and file matching.

use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModuleViolation, PatternKind, ScopeError};

/// Capture-group name that carries a scope value.
pub const SCOPE_GROUP: &str = "scope";

/// One entry of the `modules` list.
///
/// A module is either a named glob (`name` + `glob`) that yields `name` for
/// every matching path, or a regex (`filesRe`) whose scope groups yield the
/// scope. Compiled patterns are cached on first use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Module {
    /// Scope produced when `glob` matches.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Glob matched against repository-relative paths.
    #[serde(default, alias = "files", skip_serializing_if = "String::is_empty")]
    pub glob: String,
    /// Regex whose `scope` group extracts the scope from the path.
    #[serde(default, rename = "filesRe", skip_serializing_if = "String::is_empty")]
    pub files_re: String,
    #[serde(skip)]
    compiled_glob: OnceLock<GlobMatcher>,
    #[serde(skip)]
    compiled_re: OnceLock<Regex>,
}

impl Module {
    /// Creates a named-glob module.
    pub fn named_glob(name: impl Into<String>, glob: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            glob: glob.into(),
            ..Self::default()
        }
    }

    /// Creates a regex module.
    pub fn regex(files_re: impl Into<String>) -> Self {
        Self {
            files_re: files_re.into(),
            ..Self::default()
        }
    }

    /// Checks the name/glob/filesRe exclusivity rules.
    pub fn validate(&self) -> Result<(), ModuleViolation> {
        let has_name = !self.name.is_empty();
        let has_glob = !self.glob.is_empty();
        let has_re = !self.files_re.is_empty();

        if has_glob && !has_name {
            return Err(ModuleViolation::GlobWithoutName);
        }
        if has_name && !has_glob {
            return Err(ModuleViolation::NameWithoutGlob);
        }
        if has_name && has_re {
            return Err(ModuleViolation::GlobAndRegex);
        }
        if !has_name && !has_re {
            return Err(ModuleViolation::Empty);
        }
        Ok(())
    }

    /// Returns the scopes this module assigns to `path`.
    ///
    /// An empty result means the module does not apply: either the pattern
    /// did not match, or a regex matched without capturing a scope.
    pub fn matches_file(&self, path: &str) -> Result<Vec<String>, ScopeError> {
        if !self.name.is_empty() && !self.glob.is_empty() {
            return self.matches_glob(path);
        }
        if !self.files_re.is_empty() {
            return self.matches_regex(path);
        }
        Ok(Vec::new())
    }

    /// Compiles this module's pattern without matching anything.
    pub fn compile(&self) -> Result<(), ScopeError> {
        if !self.name.is_empty() && !self.glob.is_empty() {
            self.compiled_glob()?;
        } else if !self.files_re.is_empty() {
            self.compiled_regex()?;
        }
        Ok(())
    }

    fn matches_glob(&self, path: &str) -> Result<Vec<String>, ScopeError> {
        let matcher = self.compiled_glob()?;
        if !matcher.is_match(path) {
            return Ok(Vec::new());
        }
        debug!(module = %self.name, glob = %self.glob, path, "Glob matched");
        Ok(vec![self.name.clone()])
    }

    fn matches_regex(&self, path: &str) -> Result<Vec<String>, ScopeError> {
        let re = self.compiled_regex()?;
        let Some(captures) = re.captures(path) else {
            return Ok(Vec::new());
        };

        let scopes: Vec<String> = re
            .capture_names()
            .enumerate()
            .filter(|(_, name)| name.is_some_and(is_scope_group))
            .filter_map(|(i, _)| captures.get(i))
            .map(|m| m.as_str().to_string())
            .filter(|scope| !scope.is_empty())
            .collect();

        if scopes.len() > 1 {
            return Err(ScopeError::AmbiguousCapture {
                pattern: self.files_re.clone(),
                path: path.to_string(),
                captures: scopes,
            });
        }

        debug!(files_re = %self.files_re, path, ?scopes, "Regex matched");
        Ok(scopes)
    }

    fn compiled_glob(&self) -> Result<&GlobMatcher, ScopeError> {
        if let Some(matcher) = self.compiled_glob.get() {
            return Ok(matcher);
        }
        let matcher = GlobBuilder::new(&self.glob)
            .literal_separator(true)
            .build()
            .map_err(|e| ScopeError::PatternCompile {
                kind: PatternKind::Glob,
                pattern: self.glob.clone(),
                message: e.kind().to_string(),
            })?
            .compile_matcher();
        Ok(self.compiled_glob.get_or_init(|| matcher))
    }

    fn compiled_regex(&self) -> Result<&Regex, ScopeError> {
        if let Some(re) = self.compiled_re.get() {
            return Ok(re);
        }
        let pattern = rename_repeated_scope_groups(&self.files_re);
        if let Cow::Owned(renamed) = &pattern {
            debug!(
                files_re = %self.files_re,
                renamed = %renamed,
                "Renamed repeated scope groups"
            );
        }
        let re = Regex::new(&pattern).map_err(|e| ScopeError::PatternCompile {
            kind: PatternKind::Regex,
            pattern: self.files_re.clone(),
            message: e.to_string(),
        })?;
        Ok(self.compiled_re.get_or_init(|| re))
    }
}

/// Gives the second and later `(?P<scope>` / `(?<scope>` groups unique
/// `scope_<n>` names so the regex engine accepts them.
///
/// Escaped parentheses and parentheses inside character classes are left
/// alone.
fn rename_repeated_scope_groups(pattern: &str) -> Cow<'_, str> {
    const OPENERS: [&str; 2] = ["(?P<scope>", "(?<scope>"];

    let bytes = pattern.as_bytes();
    let mut renamed = String::new();
    let mut copied = 0;
    let mut seen = 0;
    let mut suffix = 1;
    let mut class_depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'[' => {
                class_depth += 1;
                i += 1;
                // A `]` right after `[` or `[^` is a literal.
                if bytes.get(i) == Some(&b'^') {
                    i += 1;
                }
                if bytes.get(i) == Some(&b']') {
                    i += 1;
                }
                continue;
            }
            b']' if class_depth > 0 => class_depth -= 1,
            b'(' if class_depth == 0 => {
                let opener = OPENERS
                    .iter()
                    .find(|opener| bytes[i..].starts_with(opener.as_bytes()));
                if let Some(&opener) = opener {
                    seen += 1;
                    if seen > 1 {
                        let name = unused_scope_name(pattern, &mut suffix);
                        renamed.push_str(&pattern[copied..i]);
                        renamed.push_str(&opener[..opener.len() - "scope>".len()]);
                        renamed.push_str(&name);
                        renamed.push('>');
                        copied = i + opener.len();
                    }
                    i += opener.len();
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    if copied == 0 {
        return Cow::Borrowed(pattern);
    }
    renamed.push_str(&pattern[copied..]);
    Cow::Owned(renamed)
}

fn unused_scope_name(pattern: &str, suffix: &mut usize) -> String {
    loop {
        let name = format!("{SCOPE_GROUP}_{suffix}");
        *suffix += 1;
        if !pattern.contains(&format!("<{name}>")) {
            return name;
        }
    }
}

/// `scope` itself, or `scope_<suffix>` for explicitly distinct scope groups.
fn is_scope_group(name: &str) -> bool {
    name == SCOPE_GROUP
        || name
            .strip_prefix(SCOPE_GROUP)
            .is_some_and(|rest| rest.starts_with('_'))
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = [
            ("name", &self.name),
            ("glob", &self.glob),
            ("filesRe", &self.files_re),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}: {value}"))
        .collect();

        if fields.is_empty() {
            write!(f, "empty module")
        } else {
            write!(f, "{}", fields.join(", "))
        }
    }
}
