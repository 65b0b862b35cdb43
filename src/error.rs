//! # Error Handling
//!
//! This module defines the centralized error type for `ghq`. It uses the
//! `thiserror` library to create an `Error` enum that covers every failure
//! mode of root resolution, repository discovery and VCS command execution.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant corresponds to one kind of
//!   failure and carries the context needed to report it.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants fall into a few groups:
//!
//! - Configuration errors (`GitConfig`, `HomeDirectory`), fatal for root
//!   resolution.
//! - Resolution errors (`NoLocalRepository`), reported to the immediate caller.
//! - Permission errors (`Permission`), raised only for an unreadable root.
//! - Unsupported operations (`Unsupported`), a deliberate capability gap.
//! - External command failures (`Command`), propagated verbatim.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for ghq operations
#[derive(Error, Debug)]
pub enum Error {
    /// A repository root exists but cannot be read.
    ///
    /// This aborts a whole discovery run; unreadable entries below a root are
    /// skipped instead.
    #[error("Permission denied: {}", path.display())]
    Permission { path: PathBuf },

    /// No configured root contains the given path.
    #[error("no local repository found for: {}", path.display())]
    NoLocalRepository { path: PathBuf },

    /// The backend does not implement the requested operation.
    #[error("{vcs} {operation} is not supported")]
    Unsupported {
        vcs: &'static str,
        operation: &'static str,
    },

    /// An external VCS command failed or could not be spawned.
    #[error("Command failed: {command} - {message}")]
    Command { command: String, message: String },

    /// A `git config` lookup failed for a reason other than a missing key.
    #[error("Git config error for {key}: {message}")]
    GitConfig { key: String, message: String },

    /// The user's home directory could not be determined.
    #[error("Could not determine the home directory")]
    HomeDirectory,

    /// A remote repository argument could not be understood.
    #[error("Invalid remote repository '{input}': {message}")]
    InvalidRemote { input: String, message: String },

    /// A VCS name that is not in the backend registry.
    #[error("Unknown VCS: {name}")]
    UnknownVcs { name: String },

    /// An error indicating that a mutex has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory traversal error, wrapped from `ignore::Error`.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Returns true when this error represents a permission failure, either
    /// an unreadable root or a wrapped `PermissionDenied` I/O error (also
    /// when it comes from the directory walker).
    pub fn is_permission(&self) -> bool {
        match self {
            Error::Permission { .. } => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::PermissionDenied,
            Error::Walk(e) => e
                .io_error()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied),
            _ => false,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
