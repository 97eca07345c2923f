//! Commit message hook.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use crate::commit::merge_scopes;
use crate::config::load_config;
use crate::error::ScopeError;
use crate::git::GitRepository;

/// Hook command options.
///
/// Install as `.git/hooks/commit-msg` (or `prepare-commit-msg`) with
/// `exec autoscope hook "$@"`.
#[derive(Parser)]
pub struct HookCommand {
    /// Commit message file passed by git.
    pub message_file: PathBuf,

    /// Extra arguments git passes to prepare-commit-msg hooks (ignored).
    #[arg(hide = true)]
    pub hook_args: Vec<String>,

    /// Repository to read staged files from.
    #[arg(long, short = 'C', default_value = ".")]
    pub repo: PathBuf,

    /// Config file to use instead of discovering one.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// What the hook did to the message file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// No config file was found, so nothing was done.
    NoConfig,
    /// No staged file matched any module.
    NoScopes,
    /// Every matched scope was already in the header, or the header is not conventional.
    Unchanged(Vec<String>),
    /// The message file was rewritten with these scopes merged in.
    Updated(Vec<String>),
}

impl HookCommand {
    /// Executes the hook command.
    pub fn execute(self) -> Result<()> {
        let outcome = self.run()?;
        debug!(?outcome, "Hook finished");
        Ok(())
    }

    /// Runs the hook and reports what happened.
    pub fn run(&self) -> Result<HookOutcome> {
        let repo = GitRepository::discover(&self.repo)?;
        let workdir = repo
            .workdir()
            .context("Repository has no working tree")?
            .to_path_buf();

        let Some(loaded) = load_config(&workdir, self.config.as_deref())? else {
            info!(
                dir = %workdir.display(),
                "No scope config found, leaving commit message untouched"
            );
            return Ok(HookOutcome::NoConfig);
        };
        debug!(source = %loaded.source, "Using scope config");

        let files = repo.staged_files()?;
        let scopes = loaded.config.scopes_for_files(&files)?;
        if scopes.is_empty() {
            return Ok(HookOutcome::NoScopes);
        }

        let message = fs::read_to_string(&self.message_file).map_err(|source| ScopeError::Io {
            path: self.message_file.clone(),
            source,
        })?;

        let merged = merge_scopes(&message, &scopes);
        if merged == message {
            return Ok(HookOutcome::Unchanged(scopes));
        }

        fs::write(&self.message_file, merged).map_err(|source| ScopeError::Io {
            path: self.message_file.clone(),
            source,
        })?;
        info!(?scopes, file = %self.message_file.display(), "Added scopes to commit message");

        Ok(HookOutcome::Updated(scopes))
    }
}
