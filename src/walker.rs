//! # Repository Discovery
//!
//! Walks every configured root and reports each working copy found below it.
//!
//! ## Process
//!
//! 1.  **Root checks**: A root that does not exist is skipped. A root with no
//!     read bits set aborts the whole walk with [`Error::Permission`].
//! 2.  **Traversal**: Each root is walked with `ignore`'s parallel walker,
//!     with every filter turned off. Each directory is handed to the
//!     [`BackendDetector`](crate::detect::BackendDetector).
//! 3.  **Pruning**: Once a directory is identified as a working copy it is
//!     reported and not descended into. Symlinks are followed only to decide
//!     whether they point at a working copy; they are never descended into.
//!
//! Unreadable entries below a root are skipped silently. Any other I/O error
//! aborts the walk and is returned to the caller; there is no partial result.
//!
//! Repositories are reported in no particular order, and the callback may run
//! on several threads at once.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use ignore::{DirEntry, WalkBuilder, WalkState};
use log::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::local_repository::LocalRepository;

/// Walks all roots in `config`, calling `callback` for every working copy.
///
/// The callback must be safe to call concurrently.
pub fn walk_local_repositories<F>(config: &Config, callback: F) -> Result<()>
where
    F: Fn(LocalRepository) + Sync + Send,
{
    for root in config.roots() {
        let metadata = match fs::metadata(root) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("root {} does not exist, skipping", root.display());
                continue;
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(Error::Permission { path: root.clone() })
            }
            Err(e) => return Err(e.into()),
        };

        if is_unreadable(&metadata) {
            return Err(Error::Permission { path: root.clone() });
        }
        if !metadata.is_dir() {
            debug!("root {} is not a directory, skipping", root.display());
            continue;
        }

        walk_root(config, root, &callback)?;
    }
    Ok(())
}

/// Collects every working copy under the configured roots.
///
/// The result is unordered.
pub fn find_local_repositories(config: &Config) -> Result<Vec<LocalRepository>> {
    let repos = Mutex::new(Vec::new());
    walk_local_repositories(config, |repo| {
        if let Ok(mut repos) = repos.lock() {
            repos.push(repo);
        }
    })?;
    repos.into_inner().map_err(|_| Error::LockPoisoned {
        context: "repository list".to_string(),
    })
}

#[cfg(unix)]
fn is_unreadable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o444 == 0
}

#[cfg(not(unix))]
fn is_unreadable(_metadata: &fs::Metadata) -> bool {
    false
}

fn walk_root<F>(config: &Config, root: &Path, callback: &F) -> Result<()>
where
    F: Fn(LocalRepository) + Sync + Send,
{
    let failure: Mutex<Option<ignore::Error>> = Mutex::new(None);
    let first_failure = &failure;

    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false).follow_links(false);
    builder.build_parallel().run(move || {
        Box::new(
            move |entry: std::result::Result<DirEntry, ignore::Error>| match entry {
                Ok(entry) => visit(config, &entry, callback),
                Err(err) if is_permission_denied(&err) => {
                    debug!("{}, skipping", err);
                    WalkState::Continue
                }
                Err(err) => {
                    if let Ok(mut failure) = first_failure.lock() {
                        failure.get_or_insert(err);
                    }
                    WalkState::Quit
                }
            },
        )
    });

    match failure.into_inner() {
        Ok(None) => Ok(()),
        Ok(Some(err)) => Err(err.into()),
        Err(_) => Err(Error::LockPoisoned {
            context: "walk failure".to_string(),
        }),
    }
}

fn visit<F>(config: &Config, entry: &DirEntry, callback: &F) -> WalkState
where
    F: Fn(LocalRepository) + Sync + Send,
{
    // the root itself is never a working copy
    if entry.depth() == 0 {
        return WalkState::Continue;
    }

    let path = entry.path();
    if !is_directory(entry) {
        return WalkState::Continue;
    }

    // Symlinks are not followed, so a non-matching link is never descended.
    let Some(backend) = config.detector().detect(path) else {
        return WalkState::Continue;
    };

    match LocalRepository::from_full_path(config, path, Some(backend)) {
        Ok(repo) => callback(repo),
        Err(e) => debug!("{}: {}", path.display(), e),
    }
    WalkState::Skip
}

/// Whether the entry is a directory, following symlinks. Broken links are
/// not directories.
fn is_directory(entry: &DirEntry) -> bool {
    if !entry.path_is_symlink() {
        return entry.file_type().is_some_and(|ft| ft.is_dir());
    }
    match fs::metadata(entry.path()) {
        Ok(metadata) => metadata.is_dir(),
        Err(e) => {
            debug!("{}: cannot resolve symlink: {}", entry.path().display(), e);
            false
        }
    }
}

fn is_permission_denied(err: &ignore::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied)
}
