//! # Get Command Implementation
//!
//! Clones a remote repository to `<primary root>/<host>/<path>`.
//!
//! ## Functionality
//!
//! - **Reuse**: If a clone with the same relative path already exists under
//!   any root, it is reused instead of cloning again.
//! - **Update**: With `--update`, an existing clone is updated with its
//!   detected backend.
//! - **Backend Selection**: `--vcs` picks the backend for new clones; git is
//!   the default.
//! - **Shallow**: `--shallow` asks for a shallow clone. Backends without
//!   shallow support ignore it.

use anyhow::{anyhow, Context, Result};
use clap::Args;

use ghq::config::Config;
use ghq::local_repository::LocalRepository;
use ghq::process::{CommandRunner, SystemRunner};
use ghq::remote;
use ghq::vcs::VcsBackend;

/// Clone a remote repository under the primary root
#[derive(Args, Debug, Default)]
pub struct GetArgs {
    /// Repository URL, `host/owner/name`, or `owner/name` (github.com).
    pub remote: String,

    /// Update the local clone if it already exists.
    #[arg(short, long)]
    pub update: bool,

    /// Perform a shallow clone where the VCS supports it.
    #[arg(long)]
    pub shallow: bool,

    /// Hide output of the VCS command.
    #[arg(short, long)]
    pub silent: bool,

    /// VCS to clone with (git, svn, hg, darcs, fossil, bzr, git-svn).
    #[arg(long, value_name = "VCS")]
    pub vcs: Option<String>,
}

/// What `get` did to the repository.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Cloned,
    Updated,
    Skipped,
}

/// Execute the `get` command.
pub fn execute(args: GetArgs, config: &Config) -> Result<()> {
    run(&args, config, &SystemRunner)?;
    Ok(())
}

fn run(args: &GetArgs, config: &Config, runner: &dyn CommandRunner) -> Result<Outcome> {
    let url = remote::parse_remote(&args.remote)?;
    let repo = LocalRepository::from_url(config, &url)
        .with_context(|| format!("Failed to resolve local path for {}", url))?;

    if repo.full_path().exists() {
        if !args.update {
            eprintln!("     exists {}", repo.full_path().display());
            return Ok(Outcome::Skipped);
        }

        let (backend, dir) = repo
            .vcs(config.detector())
            .ok_or_else(|| anyhow!("No VCS detected for {}", repo.full_path().display()))?;
        eprintln!("     update {}", dir.display());
        backend
            .update(runner, dir, args.silent)
            .with_context(|| format!("Failed to update {}", dir.display()))?;
        return Ok(Outcome::Updated);
    }

    let backend = match &args.vcs {
        Some(name) => name.parse::<VcsBackend>()?,
        None => VcsBackend::Git,
    };
    eprintln!("      clone {} -> {}", url, repo.full_path().display());
    backend
        .clone_repo(runner, &url, repo.full_path(), args.shallow, args.silent)
        .with_context(|| format!("Failed to clone {}", url))?;
    Ok(Outcome::Cloned)
}
