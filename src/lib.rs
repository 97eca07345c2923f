//! # autoscope
//!
//! Adds conventional-commit scopes to commit messages based on which modules
//! of a codebase a commit touches.
//!
//! Modules are declared in `.autoscope.yaml`, either as a named glob or as a
//! regex with a `scope` capture group:
//!
//! ```yaml
//! modules:
//!   - name: api
//!     glob: src/api/**/*
//!   - filesRe: modules/(?P<scope>\w+)/.*
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use autoscope::{merge_scopes, Config, Module};
//!
//! let config = Config::new(vec![
//!     Module::named_glob("api", "src/api/**/*"),
//!     Module::regex(r"modules/(?P<scope>\w+)/.*"),
//! ]);
//! let scopes = config
//!     .scopes_for_files(&["src/api/h.go", "modules/cache/m.tf"])
//!     .unwrap();
//! assert_eq!(scopes, vec!["api", "cache"]);
//! assert_eq!(
//!     merge_scopes("fix: fixed the bug", &scopes),
//!     "fix(api,cache): fixed the bug"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod scope;

pub use crate::cli::Cli;
pub use crate::commit::{merge_scopes, parse_header, ConventionalHeader};
pub use crate::config::{Config, Module};
pub use crate::error::ScopeError;

/// The current version of autoscope.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
