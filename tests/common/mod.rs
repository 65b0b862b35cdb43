//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a fixture with an isolated repository root and
//! a home directory, plus helpers to lay out fake working copies.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_repo("github.com/motemen/ghq", ".git");
//!     fixture.command().arg("list").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::TestFixture;
}

/// A temporary workspace with a `root/` directory used as the only
/// repository root and a `home/` directory standing in for `$HOME`.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_repo("github.com/motemen/ghq", ".git")
///     .with_repo("hg.example.org/team/proj", ".hg");
///
/// fixture.command().arg("list").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    root: PathBuf,
    home: PathBuf,
}

impl TestFixture {
    /// Create a new fixture with empty `root/` and `home/` directories.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("root")
            .create_dir_all()
            .expect("Failed to create root");
        temp_dir
            .child("home")
            .create_dir_all()
            .expect("Failed to create home");

        // Roots are canonicalized by the binary, so compare against the
        // canonical form (macOS puts temp dirs behind a symlink).
        let root = temp_dir
            .path()
            .join("root")
            .canonicalize()
            .expect("Failed to canonicalize root");
        let home = temp_dir.path().join("home");

        Self {
            temp_dir,
            root,
            home,
        }
    }

    /// Add a working copy at `rel_path` under the root, marked by `marker`
    /// (a directory such as `.git`, or the file `_FOSSIL_`).
    pub fn with_repo(self, rel_path: &str, marker: &str) -> Self {
        let repo = self.root.join(rel_path);
        if marker == "_FOSSIL_" {
            std::fs::create_dir_all(&repo).expect("Failed to create repo dir");
            std::fs::write(repo.join(marker), "").expect("Failed to write marker");
        } else {
            std::fs::create_dir_all(repo.join(marker)).expect("Failed to create marker");
        }
        self
    }

    /// Add a plain file under the root.
    #[allow(dead_code)]
    pub fn with_file(self, rel_path: &str, content: &str) -> Self {
        let path = self.root.join(rel_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent");
        }
        std::fs::write(path, content).expect("Failed to write file");
        self
    }

    /// The canonical repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the temporary directory holding `root/` and `home/`.
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a `ghq` command isolated from the user's environment.
    ///
    /// `GHQ_ROOT` points at the fixture root and git reads no system or
    /// user configuration.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ghq");
        cmd.current_dir(self.temp_dir.path())
            .env("GHQ_ROOT", &self.root)
            .env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env_remove("GIT_CONFIG_GLOBAL")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_root_and_home() {
        let fixture = TestFixture::new();
        assert!(fixture.root().is_dir());
        assert!(fixture.path().join("home").is_dir());
    }

    #[test]
    fn test_fixture_with_repo() {
        let fixture = TestFixture::new()
            .with_repo("github.com/a/b", ".git")
            .with_repo("example.com/c/d", "_FOSSIL_");
        assert!(fixture.root().join("github.com/a/b/.git").is_dir());
        assert!(fixture.root().join("example.com/c/d/_FOSSIL_").is_file());
    }
}
