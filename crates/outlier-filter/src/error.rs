//! Filter Error Types

use thiserror::Error;

/// Errors from outlier filter configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Multiplier must be finite and non-negative
    #[error("Invalid {name} {value}: must be finite and >= 0")]
    InvalidMultiplier { name: &'static str, value: f64 },

    /// Method name not recognized
    #[error("Unknown outlier method: {0}")]
    UnknownMethod(String),

    /// Z-score bound name not recognized
    #[error("Unknown z-score bound: {0} (expected upper or both)")]
    UnknownBound(String),
}
