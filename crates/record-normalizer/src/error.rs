//! Normalization Error Types

use thiserror::Error;

/// Errors during record normalization and input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Unit token not recognized for this measurement
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Postal code is not five ASCII digits
    #[error("Invalid postal code {0:?}: expected a 5-digit code with integers only")]
    InvalidPostalCode(String),

    /// Lower bound above upper bound, or bound not on the step grid
    #[error("Invalid {field} range: {reason}")]
    InvalidRange {
        field: &'static str,
        reason: String,
    },
}
