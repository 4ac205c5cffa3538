//! Error type shared by the solver and the command-line tool.

use thiserror::Error;

/// Errors that stop a solve from producing a result.
///
/// Recoverable outcomes (reduced-confidence zeroing, early termination of an
/// integration run) are reported on the result instead.
#[derive(Error, Debug)]
pub enum BallisticsError {
    /// Input that is malformed or physically meaningless
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// No elevation within the search limits reaches the zero distance
    #[error(
        "zero distance {zero_distance} m is not reachable within ±{bound:.3} rad \
         (height {height_low:.3} m at low bound, {height_high:.3} m at high bound)"
    )]
    ZeroNotBracketed {
        zero_distance: f64,
        bound: f64,
        height_low: f64,
        height_high: f64,
    },

    /// A user-supplied drag table that cannot be interpolated
    #[error("invalid drag table: {0}")]
    InvalidDragTable(String),

    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse parameter file: {0}")]
    Config(#[from] serde_json::Error),
}

impl BallisticsError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        BallisticsError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = BallisticsError::validation("muzzle_velocity", "must be positive, got -3");
        assert_eq!(err.to_string(), "invalid muzzle_velocity: must be positive, got -3");
    }

    #[test]
    fn test_zero_not_bracketed_message() {
        let err = BallisticsError::ZeroNotBracketed {
            zero_distance: 1000.0,
            bound: 0.785,
            height_low: -2057.3,
            height_high: -1083.9,
        };
        let msg = err.to_string();
        assert!(msg.contains("1000 m"));
        assert!(msg.contains("0.785"));
    }
}
