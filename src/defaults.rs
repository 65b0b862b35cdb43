//! Default values for ghq configuration.
//!
//! This module provides centralized names and defaults used across the
//! library and the commands, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable holding a platform path-list of root directories.
pub const ROOT_ENV_VAR: &str = "GHQ_ROOT";

/// Multi-valued `git config` key listing root directories.
pub const ROOT_CONFIG_KEY: &str = "ghq.root";

/// Multi-valued `git config` key restricting which VCS kinds are detected.
pub const FIND_VCS_CONFIG_KEY: &str = "ghq.findVcs";

/// Name of the default root directory under the home directory.
pub const DEFAULT_ROOT_DIRNAME: &str = ".ghq";

/// Returns the default root directory, `~/.ghq`.
///
/// Fails with [`Error::HomeDirectory`] when the platform home directory
/// cannot be determined.
pub fn default_root() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_ROOT_DIRNAME))
        .ok_or(Error::HomeDirectory)
}
