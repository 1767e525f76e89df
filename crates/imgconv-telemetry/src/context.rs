//! Run-scoped span helpers.
//!
//! # Design
//! - One span per CLI invocation carries the project name and command so every
//!   event emitted during the run is attributable without repeating fields.

use tracing::span::EnteredSpan;

/// Guard that keeps the run-level span entered until dropped.
pub struct RunContextGuard {
    _span: EnteredSpan,
}

impl RunContextGuard {
    /// Enter the run span for `project` executing `command`.
    #[must_use]
    pub fn new(project: &str, command: &str) -> Self {
        let span = tracing::info_span!("imgconv", project = %project, command = %command);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_context_guard_enters_and_exits() {
        let guard = RunContextGuard::new("demo", "all");
        tracing::info!("inside run span");
        drop(guard);
    }
}
