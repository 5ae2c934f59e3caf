// src/exec.rs

//! External process execution
//!
//! Every interaction with `git`, `eopkg` and `pkexec` goes through the
//! [`Runner`] trait so callers can be exercised without the real tools.

use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::debug;

/// Lazily read stdout lines of a running child process
pub type LineStream = Box<dyn Iterator<Item = Result<String>>>;

/// A command line for an external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Run `program` through a privilege elevation helper such as `pkexec`
    pub fn elevated(elevator: impl AsRef<Path>, program: impl AsRef<Path>) -> Self {
        Self::new(elevator).arg(program.as_ref())
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Arguments as lossy UTF-8, for matching in logs and tests
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Executes external tools
#[cfg_attr(test, mockall::automock)]
pub trait Runner {
    /// Run to completion with inherited stdio
    ///
    /// Interactive tools (pkexec prompts, git credentials) talk to the user
    /// directly. A non-zero exit is `Error::ExternalToolFailed`.
    fn run(&self, command: &ToolCommand) -> Result<()>;

    /// Spawn with a piped stdout and return its lines as they are produced
    ///
    /// The stream is single-pass. The child is reaped when the stream is
    /// exhausted; a non-zero exit is reported as the final item.
    fn stream_lines(&self, command: &ToolCommand) -> Result<LineStream>;
}

/// Runs tools as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<()> {
        debug!("Running: {}", command);

        let status = command.to_command().status().map_err(|e| Error::Spawn {
            tool: command.to_string(),
            source: e,
        })?;

        if !status.success() {
            return Err(Error::ExternalToolFailed {
                tool: command.to_string(),
                code: status.code(),
            });
        }

        Ok(())
    }

    fn stream_lines(&self, command: &ToolCommand) -> Result<LineStream> {
        debug!("Streaming output of: {}", command);

        let mut child = command
            .to_command()
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Spawn {
                tool: command.to_string(),
                source: e,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| Error::Spawn {
            tool: command.to_string(),
            source: io::Error::other("stdout was not captured"),
        })?;

        Ok(Box::new(ChildLines {
            tool: command.to_string(),
            child: Some(child),
            lines: BufReader::new(stdout).lines(),
        }))
    }
}

/// Line iterator that owns its child process
struct ChildLines {
    tool: String,
    child: Option<Child>,
    lines: Lines<BufReader<ChildStdout>>,
}

impl ChildLines {
    /// Wait for the child once stdout is drained
    fn finish(&mut self) -> Option<Result<String>> {
        let mut child = self.child.take()?;
        match child.wait() {
            Ok(status) if status.success() => None,
            Ok(status) => Some(Err(Error::ExternalToolFailed {
                tool: self.tool.clone(),
                code: status.code(),
            })),
            Err(e) => Some(Err(Error::Io(e))),
        }
    }
}

impl Iterator for ChildLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.child.as_ref()?;
        match self.lines.next() {
            Some(Ok(line)) => Some(Ok(line)),
            Some(Err(e)) => {
                if let Some(mut child) = self.child.take() {
                    let _ = child.kill();
                    let _ = child.wait();
                }
                Some(Err(Error::Io(e)))
            }
            None => self.finish(),
        }
    }
}

impl Drop for ChildLines {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
