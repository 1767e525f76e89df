//! Deferred move queue.
//!
//! Some converters write next to their input and only later can the output be
//! relocated. Each request is retried with exponential backoff while the
//! produced file is missing or still locked, up to a bounded attempt budget.

use std::fs;
use std::io;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{FsOpsError, FsOpsResult};
use crate::model::MoveRequest;

/// Default number of attempts per move.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;
/// Delay before the second attempt.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(10);
/// Upper bound for the delay between attempts.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(1);

/// Bounded exponential backoff for deferred moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts made before giving up (at least one).
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub initial_delay: Duration,
    /// Ceiling for the doubled delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Default delays with a custom attempt budget.
    #[must_use]
    pub fn from_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

/// Apply every queued move in order.
///
/// Returns the number of moves applied.
///
/// # Errors
///
/// Returns [`FsOpsError::MoveExhausted`] when a move keeps failing with a
/// transient error, or [`FsOpsError::Io`] for any other rename failure.
pub fn drain_moves(moves: &[MoveRequest], policy: &RetryPolicy) -> FsOpsResult<usize> {
    if moves.is_empty() {
        info!("no deferred moves");
        return Ok(0);
    }
    for request in moves {
        move_with_retry(request, policy)?;
        debug!(
            from = %request.produced.display(),
            to = %request.desired.display(),
            "deferred move applied"
        );
    }
    Ok(moves.len())
}

fn move_with_retry(request: &MoveRequest, policy: &RetryPolicy) -> FsOpsResult<()> {
    let attempts = policy.max_attempts.max(1);
    let mut delay = policy.initial_delay;
    let mut attempt = 1;
    loop {
        match fs::rename(&request.produced, &request.desired) {
            Ok(()) => return Ok(()),
            Err(err) if is_transient(&err) => {
                if attempt >= attempts {
                    return Err(FsOpsError::MoveExhausted {
                        from: request.produced.clone(),
                        to: request.desired.clone(),
                        attempts,
                        source: err,
                    });
                }
                debug!(
                    from = %request.produced.display(),
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "deferred move not ready; retrying"
                );
                thread::sleep(delay);
                delay = policy.next_delay(delay);
                attempt += 1;
            }
            Err(err) => return Err(FsOpsError::io("rename", &request.produced, err)),
        }
    }
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    )
}
