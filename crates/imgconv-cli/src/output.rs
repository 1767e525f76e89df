//! Output renderers and formatting helpers for CLI commands.

/// Banner printed before any work starts.
pub(crate) const START_BANNER: &str = "image conversion: START";

/// Outcome of one invocation, rendered as the final summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) problems: Vec<String>,
}

impl Summary {
    pub(crate) const fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Format a progress line as `<project>: <message>[ for file <pattern>]`.
pub(crate) fn progress_line(project: &str, file: Option<&str>, message: &str) -> String {
    match file {
        Some(pattern) => format!("{project}: {message} for file {pattern}"),
        None => format!("{project}: {message}"),
    }
}

pub(crate) fn render_summary(summary: &Summary) -> String {
    if summary.is_ok() {
        return "imgconv: DONE ... OK".to_string();
    }
    let mut text = String::from("imgconv: DONE ... with PROBLEMS !!");
    for problem in &summary.problems {
        text.push_str("\n   ");
        text.push_str(problem);
    }
    text
}
