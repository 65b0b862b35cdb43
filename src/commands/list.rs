//! # List Command Implementation
//!
//! Lists the repositories found under every root.
//!
//! ## Functionality
//!
//! - **Query Filtering**: A query matches by substring of the relative path,
//!   or with `--exact` only when it equals a path suffix such as `ghq`,
//!   `motemen/ghq` or `github.com/motemen/ghq`.
//! - **VCS Filtering**: `--vcs` keeps only repositories of one kind.
//! - **Full Paths**: `--full-path` prints absolute paths instead of relative
//!   ones.
//!
//! Discovery is unordered, so the output is sorted by full path.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;

use ghq::config::Config;
use ghq::local_repository::LocalRepository;
use ghq::vcs::VcsBackend;
use ghq::walker;

/// List local repositories
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Print full paths instead of paths relative to the root.
    #[arg(short = 'p', long)]
    pub full_path: bool,

    /// Only show repositories whose path suffix equals the query.
    #[arg(short, long)]
    pub exact: bool,

    /// Only show repositories managed by this VCS (git, hg, svn, ...).
    #[arg(long, value_name = "VCS")]
    pub vcs: Option<String>,

    /// Filter repositories by this query.
    pub query: Option<String>,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, config: &Config) -> Result<()> {
    let repos = walker::find_local_repositories(config).context("Failed to list repositories")?;
    let repos = filter_repositories(repos, &args, config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for repo in &repos {
        if args.full_path {
            writeln!(out, "{}", repo.full_path().display())?;
        } else {
            writeln!(out, "{}", repo.rel_path())?;
        }
    }
    Ok(())
}

/// Applies the query and VCS filters, then sorts by full path.
fn filter_repositories(
    mut repos: Vec<LocalRepository>,
    args: &ListArgs,
    config: &Config,
) -> Result<Vec<LocalRepository>> {
    let vcs: Option<VcsBackend> = args
        .vcs
        .as_deref()
        .map(str::parse::<VcsBackend>)
        .transpose()?;

    repos.retain(|repo| {
        let query_ok = match &args.query {
            None => true,
            Some(query) if args.exact => repo.matches(query),
            Some(query) => repo.rel_path().contains(query.as_str()),
        };
        let vcs_ok = match vcs {
            None => true,
            Some(wanted) => repo
                .vcs(config.detector())
                .is_some_and(|(backend, _)| backend == wanted),
        };
        query_ok && vcs_ok
    });

    repos.sort_by(|a, b| a.full_path().cmp(b.full_path()));
    Ok(repos)
}
