//! Error types for signal reconstruction and manual calculations

use std::io;
use thiserror::Error;

/// Result type for signal processing operations
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors surfaced by the reconstruction pipeline and the manual calculator
#[derive(Error, Debug)]
pub enum SignalError {
    /// No line of the input produced a complete numeric row
    #[error("input contains no valid rows (need at least {min_fields} numeric fields per line)")]
    InputFormat { min_fields: usize },

    /// A manual calculation input broke a formula precondition
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Failed to read an input file
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Precondition failures of the manual HR/PTT/MBP formulas
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    #[error("R_i+1 must be greater than R_i (RR interval was {rr})")]
    NonPositiveRrInterval { rr: f64 },

    #[error("PTT must be greater than 0 (was {ptt})")]
    NonPositivePtt { ptt: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SignalError::InputFormat { min_fields: 9 };
        let display = error.to_string();
        assert!(display.contains("no valid rows"));
        assert!(display.contains('9'));

        let error: SignalError = ValidationError::NonPositivePtt { ptt: -0.1 }.into();
        assert!(error.to_string().contains("PTT must be greater than 0"));
    }

    #[test]
    fn test_validation_is_wrapped() {
        let error: SignalError = ValidationError::NonPositiveRrInterval { rr: 0.0 }.into();
        assert!(matches!(
            error,
            SignalError::Validation(ValidationError::NonPositiveRrInterval { .. })
        ));
    }
}
