//! # Root Command Implementation
//!
//! Prints the primary repository root, or every root with `--all`, one per
//! line in precedence order.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use ghq::config::Config;

/// Show repository root directories
#[derive(Args, Debug)]
pub struct RootArgs {
    /// Show all roots, not only the primary one.
    #[arg(long)]
    pub all: bool,
}

/// Execute the `root` command.
pub fn execute(args: RootArgs, config: &Config) -> Result<()> {
    let stdout = io::stdout();
    render(&args, config, &mut stdout.lock())
}

fn render(args: &RootArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    if args.all {
        for root in config.roots() {
            writeln!(out, "{}", root.display())?;
        }
    } else {
        writeln!(out, "{}", config.primary_root().display())?;
    }
    Ok(())
}
