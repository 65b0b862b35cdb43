//! # ghq Library
//!
//! This library locates, models and discovers locally cloned repositories
//! kept under one or more root directories, and drives the external VCS
//! commands that clone and update them. It is used by the `ghq`
//! command-line tool but can be embedded in other tools that need to find
//! repositories laid out as `<root>/<host>/<owner>/<name>`.
//!
//! ## Quick Example
//!
//! ```no_run
//! use ghq::config::Config;
//! use ghq::walker;
//!
//! let config = Config::load().unwrap();
//! let mut repos = walker::find_local_repositories(&config).unwrap();
//! repos.sort_by(|a, b| a.full_path().cmp(b.full_path()));
//! for repo in &repos {
//!     println!("{}", repo.rel_path());
//! }
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: Resolves the ordered root list from
//!   `GHQ_ROOT`, `git config ghq.root`, or `~/.ghq`, and the detector
//!   restrictions from `ghq.findVcs`. Built once and passed by reference.
//! - **Backends (`vcs`)**: One variant per VCS kind with `clone_repo`,
//!   `update` and the marker files that identify a working copy.
//! - **Detection (`detect`)**: Finds the backend owning a directory,
//!   preferring the longest matching marker.
//! - **Discovery (`walker`)**: Walks the roots in parallel and reports every
//!   working copy.
//! - **Repositories (`local_repository`)**: A clone's identity as root plus
//!   relative path, with the suffix matching used to look repositories up.
//! - **Remotes (`remote`)**: Normalizes remote arguments to URLs and derives
//!   the relative path a clone of them lives at.
//! - **Processes (`process`)**: The narrow interface used to spawn VCS
//!   commands.

pub mod config;
pub mod defaults;
pub mod detect;
pub mod error;
pub mod local_repository;
pub mod process;
pub mod remote;
pub mod vcs;
pub mod walker;
