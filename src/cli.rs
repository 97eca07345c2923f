//! CLI interface for autoscope.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod apply;
pub mod config;
pub mod hook;
pub mod scopes;

/// autoscope: adds module scopes to conventional commit messages.
#[derive(Parser)]
#[command(name = "autoscope")]
#[command(
    about = "Adds conventional-commit scopes based on the files a commit touches",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Rewrites a commit message file in place (git commit-msg hook).
    Hook(hook::HookCommand),
    /// Prints a message with scopes for the given files merged in.
    Apply(apply::ApplyCommand),
    /// Prints the scopes matched by the given or staged files.
    Scopes(scopes::ScopesCommand),
    /// Config file inspection.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Hook(hook_cmd) => hook_cmd.execute(),
            Commands::Apply(apply_cmd) => apply_cmd.execute(),
            Commands::Scopes(scopes_cmd) => scopes_cmd.execute(),
            Commands::Config(config_cmd) => config_cmd.execute(),
        }
    }
}
