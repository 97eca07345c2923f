//! Argument-form scope merging.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::commit::merge_scopes;
use crate::config::load_config;

/// Apply command options.
#[derive(Parser)]
pub struct ApplyCommand {
    /// Commit message to add scopes to.
    pub message: String,

    /// Changed files, relative to the repository root.
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Config file to use instead of discovering one.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ApplyCommand {
    /// Executes the apply command.
    pub fn execute(self) -> Result<()> {
        let message = self.render(Path::new("."))?;
        print!("{message}");
        if !message.ends_with('\n') {
            println!();
        }
        Ok(())
    }

    /// Returns the merged message, discovering the config in `base_dir`.
    ///
    /// A missing config passes the message through unchanged.
    pub fn render(&self, base_dir: &Path) -> Result<String> {
        let Some(loaded) = load_config(base_dir, self.config.as_deref())? else {
            info!("No scope config found, message passed through unchanged");
            return Ok(self.message.clone());
        };

        let scopes = loaded.config.scopes_for_files(&self.files)?;
        Ok(merge_scopes(&self.message, &scopes))
    }
}
