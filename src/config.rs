//! # Root Resolution and Configuration
//!
//! The [`Config`] value holds everything discovery needs to know about the
//! environment: the ordered list of root directories and the
//! [`BackendDetector`] built from `ghq.findVcs`. It is built once at program
//! start and passed by reference to every component, so nothing re-reads
//! the environment mid-run.
//!
//! ## Root Resolution Order
//!
//! The first non-empty source wins:
//!
//! 1. The `GHQ_ROOT` environment variable, a platform path-list.
//! 2. `git config --path --get-all ghq.root`.
//! 3. The default root, `~/.ghq`.
//!
//! Every root is cleaned, has its symlinks resolved when it exists, and is
//! made absolute against the current working directory. Order is kept: the
//! first root is the primary root where new clones are placed.
//!
//! `git config` access goes through the [`GitConfig`] trait so tests can
//! substitute fixed values.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::defaults::{self, FIND_VCS_CONFIG_KEY, ROOT_CONFIG_KEY, ROOT_ENV_VAR};
use crate::detect::BackendDetector;
use crate::error::{Error, Result};

/// Trait for reading multi-valued `git config` entries.
pub trait GitConfig {
    /// All values of `key`. A missing key yields an empty list.
    fn get_all(&self, key: &str) -> Result<Vec<String>>;

    /// All values of `key`, with `~` and path syntax expanded by git.
    fn get_all_paths(&self, key: &str) -> Result<Vec<String>> {
        self.get_all(key)
    }
}

/// Reads configuration by running the `git config` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGitConfig;

impl SystemGitConfig {
    fn query(&self, key: &str, path: bool) -> Result<Vec<String>> {
        let mut command = Command::new("git");
        command.arg("config");
        if path {
            command.arg("--path");
        }
        command.args(["--get-all", key]);

        let output = match command.output() {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("git not found, treating {} as unset", key);
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(Error::GitConfig {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            }
        };

        if !output.status.success() {
            // git config exits with 1 when the key is not set
            if output.status.code() == Some(1) {
                return Ok(Vec::new());
            }
            return Err(Error::GitConfig {
                key: key.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl GitConfig for SystemGitConfig {
    fn get_all(&self, key: &str) -> Result<Vec<String>> {
        self.query(key, false)
    }

    fn get_all_paths(&self, key: &str) -> Result<Vec<String>> {
        self.query(key, true)
    }
}

/// Resolved, immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Never empty.
    roots: Vec<PathBuf>,
    detector: BackendDetector,
}

impl Config {
    /// Loads configuration from the environment and the system `git config`.
    pub fn load() -> Result<Self> {
        Self::load_with(&SystemGitConfig)
    }

    /// Loads configuration from the environment and the given `git config`
    /// source.
    pub fn load_with(git_config: &dyn GitConfig) -> Result<Self> {
        let cwd = env::current_dir()?;
        let roots = resolve_roots(env::var_os(ROOT_ENV_VAR), git_config, &cwd)?;
        let find_vcs = git_config.get_all(FIND_VCS_CONFIG_KEY)?;
        Ok(Self {
            roots,
            detector: BackendDetector::from_names(&find_vcs[..]),
        })
    }

    /// Builds a configuration from explicit roots.
    ///
    /// The roots go through the same normalization as configured ones. An
    /// empty list falls back to the default root.
    pub fn new(roots: Vec<PathBuf>, detector: BackendDetector) -> Result<Self> {
        let cwd = env::current_dir()?;
        let roots = if roots.is_empty() {
            vec![defaults::default_root()?]
        } else {
            roots
        };
        let roots = roots
            .iter()
            .map(|root| normalize_root(root, &cwd))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { roots, detector })
    }

    /// Builds a configuration from explicit roots, detecting every backend.
    pub fn with_roots(roots: Vec<PathBuf>) -> Result<Self> {
        Self::new(roots, BackendDetector::all())
    }

    /// All roots, in precedence order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The first root, where new repositories are placed.
    pub fn primary_root(&self) -> &Path {
        &self.roots[0]
    }

    pub fn detector(&self) -> &BackendDetector {
        &self.detector
    }
}

/// Computes the ordered root list from the three configuration sources.
pub fn resolve_roots(
    env_root: Option<OsString>,
    git_config: &dyn GitConfig,
    cwd: &Path,
) -> Result<Vec<PathBuf>> {
    let mut roots: Vec<PathBuf> = match env_root {
        Some(value) if !value.is_empty() => env::split_paths(&value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect(),
        _ => Vec::new(),
    };

    if roots.is_empty() {
        roots = git_config
            .get_all_paths(ROOT_CONFIG_KEY)?
            .into_iter()
            .map(PathBuf::from)
            .collect();
    }

    if roots.is_empty() {
        roots.push(defaults::default_root()?);
    }

    roots.iter().map(|root| normalize_root(root, cwd)).collect()
}

/// Cleans `root`, resolves symlinks if it exists, and makes it absolute.
pub fn normalize_root(root: &Path, cwd: &Path) -> Result<PathBuf> {
    let mut path = clean_path(root);
    if path.exists() {
        path = fs::canonicalize(&path)?;
    }
    if !path.is_absolute() {
        path = clean_path(&cwd.join(path));
    }
    Ok(path)
}

/// Lexically normalizes a path: drops `.` components and folds `..` into
/// the preceding component where possible.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
