//! # CLI Command Implementations
//!
//! Each subcommand of the `ghq` command-line tool lives in its own file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` (and the resolved
//!   `Config` where needed) and performs the command's logic by calling into
//!   the `ghq` library.

pub mod completions;
pub mod get;
pub mod list;
pub mod root;
