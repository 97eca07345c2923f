//! Error types for scope detection.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading rules, matching files, or touching disk.
#[derive(Error, Debug)]
pub enum ScopeError {
    /// No configuration file exists at any of the searched locations.
    #[error("Config file not found (searched: {})", display_paths(.searched))]
    ConfigNotFound {
        /// Every path that was checked, in resolution order.
        searched: Vec<PathBuf>,
    },

    /// The configuration file is not valid YAML or does not fit the schema.
    #[error("Failed to parse config file {}", .path.display())]
    ConfigParse {
        /// Config file that failed to parse.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A module entry breaks the name/glob/filesRe exclusivity rules.
    #[error("Invalid module at index {index} ({module}): {reason}")]
    ConfigValidation {
        /// Position of the offending module in the `modules` list.
        index: usize,
        /// Short rendering of the module for diagnostics.
        module: String,
        /// Which rule the module violates.
        reason: ModuleViolation,
    },

    /// A glob or regex pattern failed to compile.
    #[error("Invalid {kind} pattern '{pattern}': {message}")]
    PatternCompile {
        /// Pattern flavour, `glob` or `regex`.
        kind: PatternKind,
        /// The pattern as written in the config.
        pattern: String,
        /// Compiler error message.
        message: String,
    },

    /// More than one scope group took part in a single regex match.
    #[error(
        "Ambiguous match: pattern '{pattern}' captured {} scopes for file {path}: {}",
        .captures.len(),
        .captures.join(", ")
    )]
    AmbiguousCapture {
        /// The regex that produced the captures.
        pattern: String,
        /// File path being matched.
        path: String,
        /// Every scope value captured for the match.
        captures: Vec<String>,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Structural problems a module entry can have.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleViolation {
    /// `glob` is set but `name` is empty.
    #[error("a module with a glob must have a name")]
    GlobWithoutName,
    /// `name` is set but `glob` is empty.
    #[error("a module with a name must have a glob")]
    NameWithoutGlob,
    /// Both a name/glob pair and `filesRe` are set.
    #[error("define either name and glob, or filesRe, not both")]
    GlobAndRegex,
    /// None of `name`, `glob`, `filesRe` are set.
    #[error("a module must define either name and glob, or filesRe")]
    Empty,
}

/// Pattern flavours a module can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Shell-style glob with `**` support.
    Glob,
    /// Regular expression.
    Regex,
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Glob => write!(f, "glob"),
            Self::Regex => write!(f, "regex"),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ScopeError {
    /// Returns true for the missing-config case.
    pub fn is_config_not_found(&self) -> bool {
        matches!(self, Self::ConfigNotFound { .. })
    }
}
