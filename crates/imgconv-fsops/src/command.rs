//! External tool invocation.
//!
//! # Design
//! - `ToolCommand` is a pure description (program, arguments, redirections) so
//!   converters can be tested without spawning anything.
//! - `CommandRunner` is the seam between conversion logic and the OS;
//!   `SystemRunner` spawns without a shell and blocks until the tool exits.
//! - Runner failures are outcomes, not errors: a tool that cannot start or
//!   exits non-zero must not abort the walk.

use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display, Formatter};
use std::fs::{self, File};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::model::ToolOutcome;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Fully described external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program to execute.
    pub program: PathBuf,
    /// Arguments passed verbatim.
    pub args: Vec<OsString>,
    /// File streamed into the tool's standard input.
    pub stdin: Option<PathBuf>,
    /// File receiving the tool's standard output.
    pub stdout: Option<PathBuf>,
}

impl ToolCommand {
    /// Start a command for `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            stdout: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Stream `path` into standard input.
    #[must_use]
    pub fn stdin_from(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    /// Write standard output into `path`.
    #[must_use]
    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }

    /// Arguments rendered lossily, for assertions and logs.
    #[must_use]
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl Display for ToolCommand {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.program.display())?;
        for arg in &self.args {
            write!(formatter, " {}", arg.to_string_lossy())?;
        }
        if let Some(stdin) = &self.stdin {
            write!(formatter, " < {}", stdin.display())?;
        }
        if let Some(stdout) = &self.stdout {
            write!(formatter, " > {}", stdout.display())?;
        }
        Ok(())
    }
}

/// Executes tool commands.
pub trait CommandRunner {
    /// Run `command` to completion, or until `timeout` elapses when one is given.
    fn run(&self, command: &ToolCommand, timeout: Option<Duration>) -> ToolOutcome;
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand, timeout: Option<Duration>) -> ToolOutcome {
        let mut process = Command::new(&command.program);
        process.args(&command.args);

        match &command.stdin {
            Some(path) => match File::open(path) {
                Ok(file) => {
                    process.stdin(Stdio::from(file));
                }
                Err(err) => return unavailable(&err),
            },
            None => {
                process.stdin(Stdio::null());
            }
        }
        if let Some(path) = &command.stdout {
            match File::create(path) {
                Ok(file) => {
                    process.stdout(Stdio::from(file));
                }
                Err(err) => return unavailable(&err),
            }
        }

        let mut child = match process.spawn() {
            Ok(child) => child,
            Err(err) => {
                // Remove the output file truncated above.
                if let Some(path) = &command.stdout {
                    let _ = fs::remove_file(path);
                }
                return unavailable(&err);
            }
        };

        let waited = match timeout {
            Some(limit) => wait_with_timeout(&mut child, limit),
            None => child.wait().map(Some),
        };
        match waited {
            Ok(Some(status)) => outcome_from_status(status),
            Ok(None) => ToolOutcome::TimedOut {
                after: timeout.unwrap_or_default(),
            },
            Err(err) => unavailable(&err),
        }
    }
}

fn wait_with_timeout(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if started.elapsed() >= limit {
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn outcome_from_status(status: ExitStatus) -> ToolOutcome {
    if status.success() {
        ToolOutcome::Succeeded
    } else {
        ToolOutcome::Exited {
            code: status.code(),
        }
    }
}

fn unavailable(err: &std::io::Error) -> ToolOutcome {
    ToolOutcome::Unavailable {
        reason: err.to_string(),
    }
}
