//! Validation helpers for run flags.

use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Validate the optional poster scale factor.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the scale is not a positive
/// finite number.
pub fn validate_poster(poster: Option<f64>) -> ConfigResult<Option<f64>> {
    match poster {
        Some(scale) if !scale.is_finite() || scale <= 0.0 => Err(ConfigError::InvalidField {
            field: "poster",
            value: Some(scale.to_string()),
            reason: "must be a positive finite number",
        }),
        other => Ok(other),
    }
}

/// Validate the deferred-move attempt budget.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when zero attempts are requested.
pub fn validate_move_attempts(attempts: u32) -> ConfigResult<u32> {
    if attempts == 0 {
        return Err(ConfigError::InvalidField {
            field: "move_attempts",
            value: Some(attempts.to_string()),
            reason: "must be at least 1",
        });
    }
    Ok(attempts)
}

/// Convert an optional timeout in seconds into a duration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when a zero timeout is requested.
pub fn validate_tool_timeout(seconds: Option<u64>) -> ConfigResult<Option<Duration>> {
    match seconds {
        Some(0) => Err(ConfigError::InvalidField {
            field: "tool_timeout",
            value: Some("0".to_string()),
            reason: "must be at least one second",
        }),
        Some(secs) => Ok(Some(Duration::from_secs(secs))),
        None => Ok(None),
    }
}
