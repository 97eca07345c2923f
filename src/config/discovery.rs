//! Config file discovery.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Config;
use crate::error::ScopeError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "AUTOSCOPE_CONFIG";

/// File names searched in the base directory, in priority order.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".autoscope.yaml",
    ".autoscope.yml",
    ".svscope.yaml",
    ".svscope.yml",
];

/// Where a config file came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed with `--config`.
    Flag(PathBuf),
    /// Named by `AUTOSCOPE_CONFIG`.
    Env(PathBuf),
    /// Found by name in the base directory.
    Project(PathBuf),
}

impl ConfigSource {
    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        match self {
            Self::Flag(p) | Self::Env(p) | Self::Project(p) => p,
        }
    }

    /// Whether the user named this file explicitly.
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Flag(_) | Self::Env(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(p) => write!(f, "--config: {}", p.display()),
            Self::Env(p) => write!(f, "{CONFIG_ENV_VAR}: {}", p.display()),
            Self::Project(p) => write!(f, "Project: {}", p.display()),
        }
    }
}

/// A parsed config together with its origin.
#[derive(Debug)]
pub struct LoadedConfig {
    /// The validated rules.
    pub config: Config,
    /// Where the rules were read from.
    pub source: ConfigSource,
}

/// Returns the well-known config paths under `base_dir`, in priority order.
pub fn candidate_paths(base_dir: &Path) -> Vec<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| base_dir.join(name))
        .collect()
}

/// Resolves which config file to use.
///
/// Priority:
/// 1. `override_path` (from the `--config` CLI flag)
/// 2. `AUTOSCOPE_CONFIG` environment variable
/// 3. the first of [`CONFIG_FILE_NAMES`] that exists in `base_dir`
///
/// Explicit sources are returned even when the file does not exist so the
/// caller can report it. Returns `None` when nothing was named and no
/// well-known file exists.
pub fn resolve_config_source(
    base_dir: &Path,
    override_path: Option<&Path>,
) -> Option<ConfigSource> {
    if let Some(path) = override_path {
        return Some(ConfigSource::Flag(path.to_path_buf()));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if !env_path.is_empty() {
            return Some(ConfigSource::Env(PathBuf::from(env_path)));
        }
    }

    candidate_paths(base_dir)
        .into_iter()
        .find(|path| path.is_file())
        .map(ConfigSource::Project)
}

/// Loads the config via [`resolve_config_source`].
///
/// Returns `Ok(None)` when discovery in `base_dir` finds nothing. A file that
/// was named explicitly but does not exist is `ConfigNotFound`.
pub fn load_config(
    base_dir: &Path,
    override_path: Option<&Path>,
) -> Result<Option<LoadedConfig>, ScopeError> {
    let Some(source) = resolve_config_source(base_dir, override_path) else {
        debug!(base_dir = %base_dir.display(), "No scope config found");
        return Ok(None);
    };

    if source.is_explicit() && !source.path().is_file() {
        return Err(ScopeError::ConfigNotFound {
            searched: vec![source.path().to_path_buf()],
        });
    }

    debug!(source = %source, "Resolved scope config");
    let config = Config::load_from_file(source.path())?;
    Ok(Some(LoadedConfig { config, source }))
}

/// Like [`load_config`], but a missing config is an error.
pub fn require_config(
    base_dir: &Path,
    override_path: Option<&Path>,
) -> Result<LoadedConfig, ScopeError> {
    load_config(base_dir, override_path)?.ok_or_else(|| ScopeError::ConfigNotFound {
        searched: candidate_paths(base_dir),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Serializes tests that read or modify AUTOSCOPE_CONFIG.
    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    const VALID: &str = "modules:\n  - name: api\n    glob: src/api/**\n";

    // ── resolve_config_source ──────────────────────────────────────

    #[test]
    fn prefers_autoscope_over_svscope() -> anyhow::Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join(".svscope.yaml"), VALID)?;
        std::fs::write(dir.path().join(".autoscope.yml"), VALID)?;

        let source = resolve_config_source(dir.path(), None);
        assert_eq!(
            source,
            Some(ConfigSource::Project(dir.path().join(".autoscope.yml")))
        );
        Ok(())
    }

    #[test]
    fn falls_back_to_svscope_yml() -> anyhow::Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join(".svscope.yml"), VALID)?;

        let source = resolve_config_source(dir.path(), None);
        assert_eq!(
            source,
            Some(ConfigSource::Project(dir.path().join(".svscope.yml")))
        );
        Ok(())
    }

    #[test]
    fn nothing_found() -> anyhow::Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);
        let dir = TempDir::new()?;
        assert_eq!(resolve_config_source(dir.path(), None), None);
        Ok(())
    }

    #[test]
    fn env_var_beats_project_file() -> anyhow::Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join(".autoscope.yaml"), VALID)?;

        std::env::set_var(CONFIG_ENV_VAR, "/tmp/team-scopes.yaml");
        let source = resolve_config_source(dir.path(), None);
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(
            source,
            Some(ConfigSource::Env(PathBuf::from("/tmp/team-scopes.yaml")))
        );
        Ok(())
    }

    #[test]
    fn flag_beats_env_var() -> anyhow::Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = TempDir::new()?;
        let flag = PathBuf::from("cli-scopes.yaml");

        std::env::set_var(CONFIG_ENV_VAR, "/tmp/env-scopes.yaml");
        let source = resolve_config_source(dir.path(), Some(flag.as_path()));
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(source, Some(ConfigSource::Flag(flag)));
        Ok(())
    }

    #[test]
    fn ignores_empty_env_var() -> anyhow::Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = TempDir::new()?;

        std::env::set_var(CONFIG_ENV_VAR, "");
        let source = resolve_config_source(dir.path(), None);
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(source, None);
        Ok(())
    }

    // ── load_config / require_config ───────────────────────────────

    #[test]
    fn load_config_missing_is_none() -> anyhow::Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);
        let dir = TempDir::new()?;
        assert!(load_config(dir.path(), None)?.is_none());
        Ok(())
    }

    #[test]
    fn load_config_reads_project_file() -> anyhow::Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join(".autoscope.yaml"), VALID)?;

        let loaded = load_config(dir.path(), None)?.unwrap();
        assert_eq!(loaded.config.modules.len(), 1);
        assert!(!loaded.source.is_explicit());
        Ok(())
    }

    #[test]
    fn explicit_missing_file_is_not_found() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let missing = dir.path().join("nope.yaml");

        let err = load_config(dir.path(), Some(missing.as_path())).unwrap_err();
        match err {
            ScopeError::ConfigNotFound { searched } => assert_eq!(searched, vec![missing]),
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn require_config_lists_candidates() -> anyhow::Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);
        let dir = TempDir::new()?;

        match require_config(dir.path(), None).unwrap_err() {
            ScopeError::ConfigNotFound { searched } => {
                assert_eq!(searched, candidate_paths(dir.path()));
                assert_eq!(searched.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn invalid_config_propagates_validation_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("scopes.yaml");
        std::fs::write(&path, "modules:\n  - glob: src/**\n")?;

        let err = load_config(dir.path(), Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ScopeError::ConfigValidation { index: 0, .. }));
        Ok(())
    }

    // ── ConfigSource Display ───────────────────────────────────────

    #[test]
    fn display_sources() {
        assert_eq!(
            ConfigSource::Flag(PathBuf::from("a.yaml")).to_string(),
            "--config: a.yaml"
        );
        assert_eq!(
            ConfigSource::Env(PathBuf::from("b.yaml")).to_string(),
            "AUTOSCOPE_CONFIG: b.yaml"
        );
        assert_eq!(
            ConfigSource::Project(PathBuf::from(".autoscope.yaml")).to_string(),
            "Project: .autoscope.yaml"
        );
    }
}
