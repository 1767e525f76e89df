//! Shared run context, error types, and progress logging for the CLI.

use std::fmt::{self, Display, Formatter};

use imgconv_config::{ConfigError, RunConfig};
use imgconv_fsops::{CommandRunner, FsOpsError};
use imgconv_telemetry::TelemetryError;
use tracing::info;

use crate::output::progress_line;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidField {
                field,
                value: Some(value),
                reason,
            } => Self::validation(format!("invalid {field} '{value}': {reason}")),
            ConfigError::InvalidField {
                field,
                value: None,
                reason,
            } => Self::validation(format!("invalid {field}: {reason}")),
            ConfigError::ProjectRootMissing { path } => Self::validation(format!(
                "cannot derive a project directory from {}; pass --project-dir",
                path.display()
            )),
            other @ ConfigError::Io { .. } => Self::failure(other),
        }
    }
}

impl From<FsOpsError> for CliError {
    fn from(err: FsOpsError) -> Self {
        if let FsOpsError::InvalidFilter { pattern, source } = &err {
            return Self::validation(format!("invalid --file pattern '{pattern}': {source}"));
        }
        let context = describe_fsops(&err);
        Self::Failure(anyhow::Error::new(err).context(context))
    }
}

impl From<TelemetryError> for CliError {
    fn from(err: TelemetryError) -> Self {
        Self::failure(err)
    }
}

fn describe_fsops(err: &FsOpsError) -> String {
    match err {
        FsOpsError::Io {
            operation, path, ..
        }
        | FsOpsError::Walkdir {
            operation, path, ..
        } => format!("{operation} failed for {}", path.display()),
        FsOpsError::InvalidFilter { pattern, .. } => format!("invalid file filter {pattern}"),
        FsOpsError::PathOutsideRoot { path, root } => {
            format!("{} is not below {}", path.display(), root.display())
        }
        FsOpsError::MoveExhausted {
            from, to, attempts, ..
        } => format!(
            "could not move {} to {} after {attempts} attempts",
            from.display(),
            to.display()
        ),
    }
}

/// Everything a command handler needs for one invocation.
pub(crate) struct AppContext<'a> {
    pub(crate) config: &'a RunConfig,
    pub(crate) runner: &'a dyn CommandRunner,
}

impl<'a> AppContext<'a> {
    pub(crate) const fn new(config: &'a RunConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Log a progress line tagged with the project (and file filter).
    pub(crate) fn progress(&self, message: &str) {
        let line = progress_line(
            &self.config.layout.project_name,
            self.config.flags.file.as_deref(),
            message,
        );
        info!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    use anyhow::anyhow;

    #[test]
    fn exit_codes_follow_error_kind() {
        let validation = CliError::validation("bad");
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(validation.display_message(), "bad");

        let failure = CliError::failure(anyhow!("boom").context("outer"));
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(failure.display_message(), "outer: boom");
        assert_eq!(failure.to_string(), "cli error");
    }

    #[test]
    fn config_errors_map_to_validation_except_io() {
        let poster = CliError::from(ConfigError::InvalidField {
            field: "poster",
            value: Some("-2".to_string()),
            reason: "must be a positive finite number",
        });
        assert_eq!(
            poster.display_message(),
            "invalid poster '-2': must be a positive finite number"
        );
        assert_eq!(poster.exit_code(), 2);

        let missing = CliError::from(ConfigError::ProjectRootMissing {
            path: PathBuf::from("/"),
        });
        assert_eq!(missing.exit_code(), 2);

        let io_err = CliError::from(ConfigError::Io {
            operation: "current_dir",
            source: io::Error::other("gone"),
        });
        assert_eq!(io_err.exit_code(), 3);
    }

    #[test]
    fn fsops_errors_carry_path_context() {
        let exhausted = CliError::from(FsOpsError::MoveExhausted {
            from: PathBuf::from("img/a.svg"),
            to: PathBuf::from("out/a.svg"),
            attempts: 100,
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert_eq!(exhausted.exit_code(), 3);
        assert!(
            exhausted
                .display_message()
                .starts_with("could not move img/a.svg to out/a.svg after 100 attempts")
        );

        let Err(invalid) = imgconv_fsops::PathFilter::new("(") else {
            return;
        };
        let filter = CliError::from(invalid);
        assert_eq!(filter.exit_code(), 2);
        assert!(filter.display_message().starts_with("invalid --file pattern '('"));
    }
}
