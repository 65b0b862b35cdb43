//! # Local Repositories
//!
//! A [`LocalRepository`] is one clone on disk, or the place where a clone
//! would go. It is identified by the root it lives under and its path
//! relative to that root, e.g. `github.com/motemen/ghq`.
//!
//! Repositories are created two ways:
//!
//! - [`LocalRepository::from_full_path`], used by the walker for directories
//!   already known to be working copies.
//! - [`LocalRepository::from_url`], which reuses an existing clone when one is
//!   found under any root and otherwise synthesizes a not-yet-cloned
//!   repository under the primary root.
//!
//! The owning VCS backend is either known at construction or detected lazily
//! by [`LocalRepository::vcs`], walking up from the full path towards the
//! host directory. The first hit is cached and never looked up again.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use url::Url;

use crate::config::Config;
use crate::detect::BackendDetector;
use crate::error::{Error, Result};
use crate::remote;
use crate::vcs::VcsBackend;
use crate::walker;

/// A repository under one of the configured roots.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    full_path: PathBuf,
    rel_path: String,
    root_path: PathBuf,
    path_parts: Vec<String>,
    /// Backend and the directory its markers were found in. Written at most
    /// once.
    vcs: OnceLock<(VcsBackend, PathBuf)>,
}

impl LocalRepository {
    /// Builds a repository for `full_path`, which must live under one of the
    /// configured roots. The first matching root wins.
    pub fn from_full_path(
        config: &Config,
        full_path: &Path,
        backend: Option<VcsBackend>,
    ) -> Result<Self> {
        let (root, rel) = config
            .roots()
            .iter()
            .find_map(|root| {
                full_path
                    .strip_prefix(root)
                    .ok()
                    .filter(|rel| !rel.as_os_str().is_empty())
                    .map(|rel| (root, rel))
            })
            .ok_or_else(|| Error::NoLocalRepository {
                path: full_path.to_path_buf(),
            })?;

        let path_parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        let vcs = OnceLock::new();
        if let Some(backend) = backend {
            let _ = vcs.set((backend, full_path.to_path_buf()));
        }

        Ok(Self {
            full_path: full_path.to_path_buf(),
            rel_path: path_parts.join("/"),
            root_path: root.clone(),
            path_parts,
            vcs,
        })
    }

    /// Resolves a remote URL to a local repository.
    ///
    /// Walks every root looking for a repository whose relative path matches
    /// the one derived from the URL. If none exists, returns a repository
    /// under the primary root that has not been cloned yet.
    pub fn from_url(config: &Config, remote_url: &Url) -> Result<Self> {
        let (rel_path, path_parts) = remote::rel_path_parts(remote_url)?;

        let found: Mutex<Option<LocalRepository>> = Mutex::new(None);
        walker::walk_local_repositories(config, |repo| {
            if repo.rel_path == rel_path {
                if let Ok(mut found) = found.lock() {
                    found.get_or_insert(repo);
                }
            }
        })?;

        let found = found.into_inner().map_err(|_| Error::LockPoisoned {
            context: "repository lookup".to_string(),
        })?;
        if let Some(repo) = found {
            return Ok(repo);
        }

        let primary = config.primary_root();
        let full_path = path_parts
            .iter()
            .fold(primary.to_path_buf(), |path, part| path.join(part));
        Ok(Self {
            full_path,
            rel_path,
            root_path: primary.to_path_buf(),
            path_parts,
            vcs: OnceLock::new(),
        })
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path relative to the root, `/`-separated.
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// `rel_path` split on `/`; the first segment is the host.
    pub fn path_parts(&self) -> &[String] {
        &self.path_parts
    }

    /// Tail parts of the relative path, shortest first. For
    /// `github.com/motemen/ghq` this is
    /// `["ghq", "motemen/ghq", "github.com/motemen/ghq"]`.
    pub fn subpaths(&self) -> Vec<String> {
        let n = self.path_parts.len();
        (1..=n).map(|i| self.path_parts[n - i..].join("/")).collect()
    }

    /// The relative path without its host segment.
    pub fn non_host_path(&self) -> String {
        self.path_parts[1..].join("/")
    }

    /// Directories that may hold the working copy's markers, longest first:
    /// the full path, then each ancestor down to the host directory.
    pub fn repo_root_candidates(&self) -> Vec<PathBuf> {
        let host_root = self.root_path.join(&self.path_parts[0]);
        let non_host = &self.path_parts[1..];
        (0..=non_host.len())
            .rev()
            .map(|len| {
                non_host[..len]
                    .iter()
                    .fold(host_root.clone(), |path, part| path.join(part))
            })
            .collect()
    }

    /// True when `query` equals one of the [`subpaths`](Self::subpaths).
    pub fn matches(&self, query: &str) -> bool {
        self.subpaths().iter().any(|p| p == query)
    }

    pub fn is_under_primary_root(&self, config: &Config) -> bool {
        self.full_path.starts_with(config.primary_root())
    }

    /// The directory holding the VCS markers if known, else the full path.
    pub fn repo_path(&self) -> &Path {
        self.vcs
            .get()
            .map(|(_, dir)| dir.as_path())
            .unwrap_or(self.full_path.as_path())
    }

    /// The backend owning this repository and the directory where its
    /// markers live.
    ///
    /// Probes [`repo_root_candidates`](Self::repo_root_candidates) in order
    /// unless a backend is already known. Misses are not cached.
    pub fn vcs(&self, detector: &BackendDetector) -> Option<(VcsBackend, &Path)> {
        if self.vcs.get().is_none() {
            let hit = self
                .repo_root_candidates()
                .into_iter()
                .find_map(|dir| detector.detect(&dir).map(|backend| (backend, dir)));
            if let Some(hit) = hit {
                let _ = self.vcs.set(hit);
            }
        }
        self.vcs
            .get()
            .map(|(backend, dir)| (*backend, dir.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::with_roots(vec![temp_dir.path().to_path_buf()]).unwrap();
        (temp_dir, config)
    }

    fn repo_at(config: &Config, rel: &str) -> LocalRepository {
        let path = config.primary_root().join(rel);
        LocalRepository::from_full_path(config, &path, None).unwrap()
    }

    #[test]
    fn test_from_full_path() {
        let (_tmp, config) = setup();
        let full = config.primary_root().join("github.com/motemen/ghq");
        let repo = LocalRepository::from_full_path(&config, &full, Some(VcsBackend::Git)).unwrap();

        assert_eq!(repo.full_path(), full);
        assert_eq!(repo.root_path(), config.primary_root());
        assert_eq!(repo.rel_path(), "github.com/motemen/ghq");
        assert_eq!(repo.path_parts(), &["github.com", "motemen", "ghq"]);
        assert_eq!(repo.non_host_path(), "motemen/ghq");
        assert_eq!(repo.repo_path(), full);
        assert!(repo.is_under_primary_root(&config));
    }

    #[test]
    fn test_from_full_path_picks_matching_root() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let config =
            Config::with_roots(vec![a.path().to_path_buf(), b.path().to_path_buf()]).unwrap();
        let second = config.roots()[1].clone();

        let repo =
            LocalRepository::from_full_path(&config, &second.join("example.com/x/y"), None)
                .unwrap();
        assert_eq!(repo.root_path(), second);
        assert_eq!(repo.rel_path(), "example.com/x/y");
        assert!(!repo.is_under_primary_root(&config));
    }

    #[test]
    fn test_from_full_path_outside_roots() {
        let (_tmp, config) = setup();
        let result = LocalRepository::from_full_path(&config, Path::new("/elsewhere/repo"), None);
        assert!(matches!(result, Err(Error::NoLocalRepository { .. })));
    }

    #[test]
    fn test_from_full_path_sibling_with_common_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("ghq");
        fs::create_dir(&root).unwrap();
        let config = Config::with_roots(vec![root]).unwrap();
        let sibling = config.primary_root().with_file_name("ghq2").join("h/o/n");

        assert!(LocalRepository::from_full_path(&config, &sibling, None).is_err());
    }

    #[test]
    fn test_from_full_path_root_itself_is_not_a_repository() {
        let (_tmp, config) = setup();
        let root = config.primary_root().to_path_buf();
        assert!(LocalRepository::from_full_path(&config, &root, None).is_err());
    }

    #[test]
    fn test_subpaths() {
        let (_tmp, config) = setup();
        let repo = repo_at(&config, "github.com/motemen/ghq");
        assert_eq!(
            repo.subpaths(),
            vec!["ghq", "motemen/ghq", "github.com/motemen/ghq"]
        );
    }

    #[test]
    fn test_matches_exact_only() {
        let (_tmp, config) = setup();
        let repo = repo_at(&config, "github.com/motemen/ghq");
        assert!(repo.matches("ghq"));
        assert!(repo.matches("motemen/ghq"));
        assert!(repo.matches("github.com/motemen/ghq"));
        assert!(!repo.matches("gh"));
        assert!(!repo.matches("motemen"));
        assert!(!repo.matches("github.com/motemen"));
        assert!(!repo.matches("otemen/ghq"));
    }

    #[test]
    fn test_repo_root_candidates() {
        let (_tmp, config) = setup();
        let repo = repo_at(&config, "github.com/motemen/ghq/cmdutil");
        let root = config.primary_root();
        assert_eq!(
            repo.repo_root_candidates(),
            vec![
                root.join("github.com/motemen/ghq/cmdutil"),
                root.join("github.com/motemen/ghq"),
                root.join("github.com/motemen"),
                root.join("github.com"),
            ]
        );
    }

    #[test]
    fn test_vcs_checks_ancestors_and_caches() {
        let (_tmp, config) = setup();
        let root = config.primary_root().to_path_buf();
        fs::create_dir_all(root.join("github.com/motemen/ghq/.git")).unwrap();
        fs::create_dir_all(root.join("github.com/motemen/ghq/cmdutil")).unwrap();

        let repo = repo_at(&config, "github.com/motemen/ghq/cmdutil");
        let detector = BackendDetector::all();
        let (backend, dir) = repo.vcs(&detector).unwrap();
        assert_eq!(backend, VcsBackend::Git);
        assert_eq!(dir, root.join("github.com/motemen/ghq"));
        assert_eq!(repo.repo_path(), root.join("github.com/motemen/ghq"));

        // cached: removing the marker does not change the answer
        fs::remove_dir(root.join("github.com/motemen/ghq/.git")).unwrap();
        let (backend, _) = repo.vcs(&detector).unwrap();
        assert_eq!(backend, VcsBackend::Git);
    }

    #[test]
    fn test_vcs_miss_is_not_cached() {
        let (_tmp, config) = setup();
        let root = config.primary_root().to_path_buf();
        let repo = repo_at(&config, "example.com/o/n");
        let detector = BackendDetector::all();

        assert!(repo.vcs(&detector).is_none());
        assert_eq!(repo.repo_path(), root.join("example.com/o/n"));

        fs::create_dir_all(root.join("example.com/o/n/.hg")).unwrap();
        let (backend, dir) = repo.vcs(&detector).unwrap();
        assert_eq!(backend, VcsBackend::Mercurial);
        assert_eq!(dir, root.join("example.com/o/n"));
    }

    #[test]
    fn test_vcs_known_at_construction_skips_detection() {
        let (_tmp, config) = setup();
        let full = config.primary_root().join("example.com/o/n");
        let repo =
            LocalRepository::from_full_path(&config, &full, Some(VcsBackend::Darcs)).unwrap();
        let (backend, dir) = repo.vcs(&BackendDetector::all()).unwrap();
        assert_eq!(backend, VcsBackend::Darcs);
        assert_eq!(dir, full);
    }

    #[test]
    fn test_from_url_synthesizes_under_primary_root() {
        let (_tmp, config) = setup();
        let url = Url::parse("https://github.com/motemen/ghq.git").unwrap();
        let repo = LocalRepository::from_url(&config, &url).unwrap();

        assert_eq!(repo.rel_path(), "github.com/motemen/ghq");
        assert_eq!(repo.path_parts(), &["github.com", "motemen", "ghq"]);
        assert_eq!(repo.root_path(), config.primary_root());
        assert_eq!(
            repo.full_path(),
            config.primary_root().join("github.com/motemen/ghq")
        );
        assert!(!repo.full_path().exists());
    }

    #[test]
    fn test_from_url_reuses_existing_clone() {
        let primary = TempDir::new().unwrap();
        let secondary = TempDir::new().unwrap();
        let config = Config::with_roots(vec![
            primary.path().to_path_buf(),
            secondary.path().to_path_buf(),
        ])
        .unwrap();
        let existing = config.roots()[1].join("github.com/motemen/ghq");
        fs::create_dir_all(existing.join(".git")).unwrap();

        let url = Url::parse("https://github.com/motemen/ghq").unwrap();
        let repo = LocalRepository::from_url(&config, &url).unwrap();
        assert_eq!(repo.full_path(), existing);
        assert_eq!(repo.root_path(), config.roots()[1]);
        assert_eq!(
            repo.vcs(config.detector()).map(|(b, _)| b),
            Some(VcsBackend::Git)
        );
    }

    #[test]
    fn test_from_url_matches_percent_decoded_clone() {
        let (_tmp, config) = setup();
        let existing = config.primary_root().join("example.com/o/my repo");
        fs::create_dir_all(existing.join(".git")).unwrap();

        let url = Url::parse("https://example.com/o/my%20repo.git").unwrap();
        let repo = LocalRepository::from_url(&config, &url).unwrap();
        assert_eq!(repo.rel_path(), "example.com/o/my repo");
        assert_eq!(repo.full_path(), existing);
        assert!(repo.vcs.get().is_some());
    }

    proptest! {
        /// Property: subpaths are shortest first, end with the relative path,
        /// and every one of them matches
        #[test]
        fn subpaths_are_suffixes(parts in proptest::collection::vec("[a-z0-9.]{1,6}", 1..6)) {
            prop_assume!(parts.iter().all(|p| p != "." && p != ".."));
            let temp_dir = TempDir::new().unwrap();
            let config = Config::with_roots(vec![temp_dir.path().to_path_buf()]).unwrap();
            let rel = parts.join("/");
            let repo = repo_at(&config, &rel);

            let subpaths = repo.subpaths();
            prop_assert_eq!(subpaths.len(), parts.len());
            prop_assert_eq!(subpaths.last().unwrap(), &rel);
            prop_assert_eq!(&subpaths[0], parts.last().unwrap());
            for pair in subpaths.windows(2) {
                let suffix = format!("/{}", pair[0]);
                prop_assert!(
                    pair[1].ends_with(&suffix),
                    "{:?} does not end with {:?}",
                    pair[1],
                    suffix
                );
            }
            for p in &subpaths {
                prop_assert!(repo.matches(p));
            }
        }
    }
}
