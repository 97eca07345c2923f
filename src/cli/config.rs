//! Configuration-related CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{require_config, LoadedConfig};

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Loads and validates the config file.
    Check(CheckCommand),
    /// Shows where the config was found and the rules it defines.
    Show(ShowCommand),
}

/// Check command options.
#[derive(Parser)]
pub struct CheckCommand {
    /// Config file to use instead of discovering one.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {
    /// Config file to use instead of discovering one.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Check(check_cmd) => check_cmd.execute(),
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(),
        }
    }
}

impl CheckCommand {
    /// Executes the check command.
    pub fn execute(self) -> Result<()> {
        println!("{}", self.report(Path::new("."))?);
        Ok(())
    }

    /// Validates the config, compiles its patterns and describes it in one line.
    pub fn report(&self, base_dir: &Path) -> Result<String> {
        let LoadedConfig { config, source } = require_config(base_dir, self.config.as_deref())?;
        config
            .compile()
            .with_context(|| format!("Invalid pattern in {source}"))?;
        let count = config.modules.len();
        let noun = if count == 1 { "module" } else { "modules" };
        Ok(format!("{source}: {count} {noun}, OK"))
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        print!("{}", self.render(Path::new("."))?);
        Ok(())
    }

    /// Renders the config source followed by the normalized rules.
    pub fn render(&self, base_dir: &Path) -> Result<String> {
        let LoadedConfig { config, source } = require_config(base_dir, self.config.as_deref())?;
        let yaml = serde_yaml::to_string(&config).context("Failed to serialize config to YAML")?;
        Ok(format!("# {source}\n{yaml}"))
    }
}
