//! # VCS Backend Registry
//!
//! Each supported version-control system is a [`VcsBackend`] variant. A
//! backend knows three things:
//!
//! - how to clone a remote into a local path,
//! - how to update an existing working copy,
//! - which marker paths identify a working copy of its kind.
//!
//! Backends hold no per-repository state. The registry maps kind names and
//! their aliases (`github` for git, `subversion` for svn, ...) to the same
//! variant.
//!
//! Shallow clones are best-effort: git and svn pass `--depth 1`, darcs passes
//! `--lazy`, and git-svn, Mercurial and Bazaar ignore the request. CVS is
//! detect-only; both mutating operations fail with [`Error::Unsupported`].

use std::fmt;
use std::fs::DirBuilder;
use std::path::Path;

use url::Url;

use crate::error::{Error, Result};
use crate::process::{CommandRunner, CommandSpec};

/// Name of the Fossil repository file inside a Fossil checkout.
const FOSSIL_REPO_NAME: &str = ".fossil";

/// A version-control system the tool can detect and drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VcsBackend {
    Git,
    Subversion,
    GitSvn,
    Mercurial,
    Darcs,
    Fossil,
    Bazaar,
    Cvs,
}

/// Kind names and aliases, mapped to their backend.
pub const REGISTRY: &[(&str, VcsBackend)] = &[
    ("git", VcsBackend::Git),
    ("github", VcsBackend::Git),
    ("svn", VcsBackend::Subversion),
    ("subversion", VcsBackend::Subversion),
    ("git-svn", VcsBackend::GitSvn),
    ("hg", VcsBackend::Mercurial),
    ("mercurial", VcsBackend::Mercurial),
    ("darcs", VcsBackend::Darcs),
    ("fossil", VcsBackend::Fossil),
    ("bzr", VcsBackend::Bazaar),
    ("bazaar", VcsBackend::Bazaar),
    ("cvs", VcsBackend::Cvs),
];

impl VcsBackend {
    /// Every backend, once each.
    pub const ALL: [VcsBackend; 8] = [
        VcsBackend::Git,
        VcsBackend::Subversion,
        VcsBackend::GitSvn,
        VcsBackend::Mercurial,
        VcsBackend::Darcs,
        VcsBackend::Fossil,
        VcsBackend::Bazaar,
        VcsBackend::Cvs,
    ];

    /// Looks up a backend by kind name or alias.
    pub fn from_name(name: &str) -> Option<VcsBackend> {
        REGISTRY
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, backend)| *backend)
    }

    /// The canonical kind name.
    pub fn name(&self) -> &'static str {
        match self {
            VcsBackend::Git => "git",
            VcsBackend::Subversion => "svn",
            VcsBackend::GitSvn => "git-svn",
            VcsBackend::Mercurial => "hg",
            VcsBackend::Darcs => "darcs",
            VcsBackend::Fossil => "fossil",
            VcsBackend::Bazaar => "bzr",
            VcsBackend::Cvs => "cvs",
        }
    }

    /// Marker paths, relative to a working copy's top directory.
    pub fn contents(&self) -> &'static [&'static str] {
        match self {
            VcsBackend::Git => &[".git"],
            VcsBackend::Subversion => &[".svn"],
            VcsBackend::GitSvn => &[".git/svn"],
            VcsBackend::Mercurial => &[".hg"],
            VcsBackend::Darcs => &["_darcs"],
            VcsBackend::Fossil => &[".fslckout", "_FOSSIL_"],
            VcsBackend::Bazaar => &[".bzr"],
            VcsBackend::Cvs => &["CVS/Repository"],
        }
    }

    /// Clones `remote` into `local`.
    ///
    /// The parent of `local` is created first (Fossil creates `local` itself,
    /// since it clones into a file inside the checkout and then opens it).
    pub fn clone_repo(
        &self,
        runner: &dyn CommandRunner,
        remote: &Url,
        local: &Path,
        shallow: bool,
        silent: bool,
    ) -> Result<()> {
        let remote = remote.as_str();
        let local_lossy = local.to_string_lossy();
        let local_str: &str = &local_lossy;

        let cmd = match self {
            VcsBackend::Git => {
                let mut args = vec!["clone"];
                if shallow {
                    args.extend(["--depth", "1"]);
                }
                args.extend([remote, local_str]);
                CommandSpec::new("git", args)
            }
            VcsBackend::Subversion => {
                let mut args = vec!["checkout"];
                if shallow {
                    args.extend(["--depth", "1"]);
                }
                args.extend([remote, local_str]);
                CommandSpec::new("svn", args)
            }
            VcsBackend::GitSvn => CommandSpec::new("git", ["svn", "clone", remote, local_str]),
            VcsBackend::Mercurial => CommandSpec::new("hg", ["clone", remote, local_str]),
            VcsBackend::Darcs => {
                let mut args = vec!["get"];
                if shallow {
                    args.push("--lazy");
                }
                args.extend([remote, local_str]);
                CommandSpec::new("darcs", args)
            }
            VcsBackend::Bazaar => CommandSpec::new("bzr", ["branch", remote, local_str]),
            VcsBackend::Fossil => {
                create_dir_0755(local)?;
                let repo_file = local.join(FOSSIL_REPO_NAME);
                let repo_file = repo_file.to_string_lossy();
                runner.run(
                    &CommandSpec::new("fossil", ["clone", remote, &*repo_file]),
                    silent,
                )?;
                return runner.run(
                    &CommandSpec::new("fossil", ["open", FOSSIL_REPO_NAME]).in_dir(local),
                    silent,
                );
            }
            VcsBackend::Cvs => {
                return Err(Error::Unsupported {
                    vcs: "CVS",
                    operation: "clone",
                })
            }
        };

        if let Some(parent) = local.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_0755(parent)?;
        }
        runner.run(&cmd, silent)
    }

    /// Updates the working copy at `local`. Always runs inside `local`.
    pub fn update(&self, runner: &dyn CommandRunner, local: &Path, silent: bool) -> Result<()> {
        let cmd = match self {
            VcsBackend::Git => CommandSpec::new("git", ["pull", "--ff-only"]),
            VcsBackend::Subversion => CommandSpec::new("svn", ["update"]),
            VcsBackend::GitSvn => CommandSpec::new("git", ["svn", "rebase"]),
            VcsBackend::Mercurial => CommandSpec::new("hg", ["pull", "--update"]),
            VcsBackend::Darcs => CommandSpec::new("darcs", ["pull"]),
            VcsBackend::Fossil => CommandSpec::new("fossil", ["update"]),
            // Without --overwrite bzr will not pull tags that changed.
            VcsBackend::Bazaar => CommandSpec::new("bzr", ["pull", "--overwrite"]),
            VcsBackend::Cvs => {
                return Err(Error::Unsupported {
                    vcs: "CVS",
                    operation: "update",
                })
            }
        };
        runner.run(&cmd.in_dir(local), silent)
    }
}

impl fmt::Display for VcsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for VcsBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        VcsBackend::from_name(s).ok_or_else(|| Error::UnknownVcs {
            name: s.to_string(),
        })
    }
}

fn create_dir_0755(dir: &Path) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)?;
    Ok(())
}
