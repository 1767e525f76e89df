//! Domain models for image conversion runs.
//!
//! # Design
//! - Keep job and report types plain data; no IO handles.
//! - Move requests are returned to the caller instead of living in shared state.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Source and destination extension for one walk, including the leading dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionPair {
    /// Extension matched on source files (e.g. `.uxf`).
    pub from: &'static str,
    /// Extension given to destination files (e.g. `.svg`).
    pub to: &'static str,
}

impl ExtensionPair {
    /// Build a pair from the two extensions.
    #[must_use]
    pub const fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }
}

/// One matched file ready to be handed to a converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Source file.
    pub source: PathBuf,
    /// Destination file inside the mirrored output tree.
    pub destination: PathBuf,
    /// Extension pair the walk was run with.
    pub extensions: ExtensionPair,
}

/// Rename that can only happen once an external tool has written its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// Path the external tool writes to.
    pub produced: PathBuf,
    /// Path the output must end up at.
    pub desired: PathBuf,
}

/// How an external tool invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The tool exited with status zero.
    Succeeded,
    /// The tool exited with a non-zero status (or was killed by a signal).
    Exited {
        /// Exit code when one was reported.
        code: Option<i32>,
    },
    /// The tool exceeded the configured timeout and was killed.
    TimedOut {
        /// Timeout that was exceeded.
        after: Duration,
    },
    /// The tool could not be started or its redirections could not be opened.
    Unavailable {
        /// Rendered IO error.
        reason: String,
    },
}

impl ToolOutcome {
    /// Whether the tool ran to a zero exit status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl Display for ToolOutcome {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => formatter.write_str("succeeded"),
            Self::Exited { code: Some(code) } => write!(formatter, "exited with status {code}"),
            Self::Exited { code: None } => formatter.write_str("terminated by signal"),
            Self::TimedOut { after } => write!(formatter, "timed out after {}s", after.as_secs()),
            Self::Unavailable { reason } => write!(formatter, "could not be started: {reason}"),
        }
    }
}

/// External tool failure that did not abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    /// Converter label (e.g. `umlet`).
    pub converter: &'static str,
    /// Source file that was being converted.
    pub source: PathBuf,
    /// How the tool ended.
    pub outcome: ToolOutcome,
}

impl Display for ToolFailure {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} for {}",
            self.converter,
            self.outcome,
            self.source.display()
        )
    }
}

/// Summary of one conversion walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Files that matched the walk.
    pub matched: usize,
    /// Jobs whose converter finished successfully.
    pub converted: usize,
    /// Deferred moves collected during the walk.
    pub moves: Vec<MoveRequest>,
    /// Deferred moves applied after the walk.
    pub moved: usize,
    /// Soft failures recorded during the walk.
    pub failures: Vec<ToolFailure>,
}

impl ConversionReport {
    /// Whether any soft failure was recorded.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Replace the `from` suffix of `file_name` with `to`.
///
/// Returns `None` when the name does not end with `from`.
#[must_use]
pub fn replace_suffix(file_name: &str, from: &str, to: &str) -> Option<String> {
    file_name
        .strip_suffix(from)
        .map(|stem| format!("{stem}{to}"))
}

/// Sibling of `path` with its `from` suffix swapped for `to`.
#[must_use]
pub fn sibling_with_suffix(path: &Path, from: &str, to: &str) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let renamed = replace_suffix(name, from, to)?;
    Some(path.with_file_name(renamed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_suffix_only_touches_the_end() {
        assert_eq!(
            replace_suffix("flow.uxf.uxf", ".uxf", ".svg").as_deref(),
            Some("flow.uxf.svg")
        );
        assert_eq!(replace_suffix("flow.png", ".uxf", ".svg"), None);
    }

    #[test]
    fn sibling_with_suffix_keeps_directory() {
        let produced = sibling_with_suffix(Path::new("/img/a/b.uxf"), ".uxf", ".svg");
        assert_eq!(produced, Some(PathBuf::from("/img/a/b.svg")));
    }

    #[test]
    fn tool_failure_renders_for_problem_list() {
        let failure = ToolFailure {
            converter: "mermaid",
            source: PathBuf::from("img/flow.mmd"),
            outcome: ToolOutcome::Exited { code: Some(1) },
        };
        assert_eq!(
            failure.to_string(),
            "mermaid exited with status 1 for img/flow.mmd"
        );
        assert!(!failure.outcome.is_success());
        assert!(ToolOutcome::Succeeded.is_success());
    }

    #[test]
    fn report_tracks_failures() {
        let mut report = ConversionReport::default();
        assert!(!report.has_failures());
        report.failures.push(ToolFailure {
            converter: "drawio",
            source: PathBuf::from("x.drawio"),
            outcome: ToolOutcome::TimedOut {
                after: Duration::from_secs(3),
            },
        });
        assert!(report.has_failures());
        assert_eq!(
            report.failures[0].to_string(),
            "drawio timed out after 3s for x.drawio"
        );
    }
}
