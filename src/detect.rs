//! Working-copy detection by marker paths.
//!
//! A directory belongs to a backend when one of the backend's marker paths
//! (`.git`, `.svn`, `CVS/Repository`, ...) exists inside it. Markers are
//! checked longest first so that a nested marker beats its prefix: a
//! directory holding `.git/svn` is a git-svn clone, not a plain git one.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};

use crate::vcs::VcsBackend;

/// Maps marker paths to backends and checks directories for them.
#[derive(Debug, Clone)]
pub struct BackendDetector {
    /// Sorted by descending marker length.
    markers: Vec<(&'static str, VcsBackend)>,
}

impl BackendDetector {
    /// A detector that knows every registered backend.
    pub fn all() -> Self {
        Self::from_backends(VcsBackend::ALL)
    }

    /// A detector restricted to the given backends.
    pub fn from_backends<I>(backends: I) -> Self
    where
        I: IntoIterator<Item = VcsBackend>,
    {
        let mut map = BTreeMap::new();
        for backend in backends {
            for marker in backend.contents() {
                map.insert(*marker, backend);
            }
        }

        let mut markers: Vec<_> = map.into_iter().collect();
        // stable sort keeps equal lengths in lexical order
        markers.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { markers }
    }

    /// Builds the detector from a `ghq.findVcs`-style list of kind names.
    ///
    /// An empty list selects every backend. Names that are not in the
    /// registry are skipped.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        if names.is_empty() {
            return Self::all();
        }

        let backends = names.iter().filter_map(|name| {
            let name = name.as_ref();
            let backend = VcsBackend::from_name(name);
            if backend.is_none() {
                warn!("ignoring unknown VCS in findVcs: {}", name);
            }
            backend
        });
        Self::from_backends(backends)
    }

    /// Marker paths in lookup order.
    pub fn markers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.markers.iter().map(|(marker, _)| *marker)
    }

    /// Returns the backend owning `dir`, if any marker exists inside it.
    pub fn detect(&self, dir: &Path) -> Option<VcsBackend> {
        self.markers.iter().find_map(|(marker, backend)| {
            if dir.join(marker).metadata().is_ok() {
                debug!("{}: found {} ({})", dir.display(), marker, backend);
                Some(*backend)
            } else {
                None
            }
        })
    }
}

impl Default for BackendDetector {
    fn default() -> Self {
        Self::all()
    }
}
