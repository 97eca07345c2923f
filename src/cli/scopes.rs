//! Scope listing.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::config::require_config;
use crate::git::GitRepository;

/// Scopes command options.
#[derive(Parser)]
pub struct ScopesCommand {
    /// Files to match. Defaults to the files staged in the repository.
    pub files: Vec<String>,

    /// Repository to read staged files and config from.
    #[arg(long, short = 'C', default_value = ".")]
    pub repo: PathBuf,

    /// Config file to use instead of discovering one.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ScopesCommand {
    /// Executes the scopes command.
    pub fn execute(self) -> Result<()> {
        for scope in self.collect()? {
            println!("{scope}");
        }
        Ok(())
    }

    /// Returns the matched scopes, sorted.
    pub fn collect(&self) -> Result<Vec<String>> {
        if !self.files.is_empty() {
            let loaded = require_config(&self.repo, self.config.as_deref())?;
            return Ok(loaded.config.scopes_for_files(&self.files)?);
        }

        let repo = GitRepository::discover(&self.repo)?;
        let base_dir = repo.workdir().unwrap_or(Path::new(".")).to_path_buf();
        let loaded = require_config(&base_dir, self.config.as_deref())?;
        let files = repo.staged_files()?;
        Ok(loaded.config.scopes_for_files(&files)?)
    }
}
