//! Rule configuration: the `modules` file, its validation, and discovery.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScopeError;

pub mod discovery;
pub mod module;

pub use discovery::{load_config, require_config, ConfigSource, LoadedConfig};
pub use module::Module;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Rules mapping changed files to scopes.
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Config {
    /// Creates a configuration from already-built modules.
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Loads, parses and validates a configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScopeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ScopeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parses and validates YAML content. `origin` is only used in errors.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ScopeError> {
        // An empty file is a config with no rules.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self =
            serde_yaml::from_str(content).map_err(|source| ScopeError::ConfigParse {
                path: origin.to_path_buf(),
                source,
            })?;

        config.validate()?;
        debug!(
            path = %origin.display(),
            modules = config.modules.len(),
            "Loaded scope config"
        );
        Ok(config)
    }

    /// Validates every module, stopping at the first violation.
    pub fn validate(&self) -> Result<(), ScopeError> {
        for (index, module) in self.modules.iter().enumerate() {
            module
                .validate()
                .map_err(|reason| ScopeError::ConfigValidation {
                    index,
                    module: module.to_string(),
                    reason,
                })?;
        }
        Ok(())
    }

    /// Compiles every module's pattern, stopping at the first failure.
    pub fn compile(&self) -> Result<(), ScopeError> {
        self.modules.iter().try_for_each(Module::compile)
    }
}
