//! # External Command Execution
//!
//! VCS backends never talk to remotes themselves; they decide which command
//! to run and where, then hand a [`CommandSpec`] to a [`CommandRunner`].
//!
//! The runner is a trait so the argument vectors produced by each backend
//! can be checked in tests without spawning real VCS binaries. In the
//! application, [`SystemRunner`] spawns the command with `std::process`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory, or the current directory when `None`.
    pub dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            dir: None,
        }
    }

    /// Run the command inside `dir`.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.dir = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Trait for spawning external commands - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion.
    ///
    /// With `silent` set, the command's output is discarded; otherwise it
    /// inherits the parent's stdio.
    fn run(&self, cmd: &CommandSpec, silent: bool) -> Result<()>;
}

/// The default `CommandRunner`, which spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandSpec, silent: bool) -> Result<()> {
        debug!("running: {}", cmd);

        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(dir) = &cmd.dir {
            command.current_dir(dir);
        }
        if silent {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = command.status().map_err(|e| Error::Command {
            command: cmd.to_string(),
            message: e.to_string(),
        })?;

        if !status.success() {
            return Err(Error::Command {
                command: cmd.to_string(),
                message: status.to_string(),
            });
        }

        Ok(())
    }
}

/// A `CommandRunner` that records commands instead of spawning them.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub commands: std::sync::Mutex<Vec<(CommandSpec, bool)>>,
}

#[cfg(test)]
impl RecordingRunner {
    pub fn recorded(&self) -> Vec<CommandSpec> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|(cmd, _)| cmd.clone())
            .collect()
    }
}

#[cfg(test)]
impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &CommandSpec, silent: bool) -> Result<()> {
        self.commands.lock().unwrap().push((cmd.clone(), silent));
        Ok(())
    }
}
