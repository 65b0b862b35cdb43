//! CLI argument parsing and command dispatch

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ghq::config::Config;

use crate::commands;

/// ghq - Manage remote repository clones under local root directories
#[derive(Parser, Debug)]
#[command(name = "ghq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone a remote repository under the primary root
    Get(commands::get::GetArgs),

    /// List local repositories
    List(commands::list::ListArgs),

    /// Show repository root directories
    Root(commands::root::RootArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // A logger may already be installed when running under tests
        let _ = env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .try_init();

        match self.command {
            Commands::Get(args) => commands::get::execute(args, &load_config()?),
            Commands::List(args) => commands::list::execute(args, &load_config()?),
            Commands::Root(args) => commands::root::execute(args, &load_config()?),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn load_config() -> Result<Config> {
    Config::load().context("Failed to resolve repository roots")
}
