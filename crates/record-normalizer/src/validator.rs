//! Query Input Validator for Range Checking

use crate::error::NormalizeError;
use serde::{Deserialize, Serialize};

/// Length of a US postal code
pub const POSTAL_CODE_LEN: usize = 5;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Plant search radius valid range (miles)
    pub distance_range: (f64, f64),
    /// 28-day strength valid range (psi)
    pub strength_range: (f64, f64),
    /// Strength bounds must be multiples of this (psi)
    pub strength_step: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            distance_range: (0.0, 200.0),
            strength_range: (0.0, 12000.0),
            strength_step: 100,
        }
    }
}

/// Returns `true` for exactly five ASCII digits
pub fn is_valid_postal_code(code: &str) -> bool {
    code.len() == POSTAL_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// Validator for material query inputs
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), NormalizeError> {
        if value < range.0 || value > range.1 {
            Err(NormalizeError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a postal code and return it as an integer
    pub fn validate_postal_code(&self, code: &str) -> Result<u32, NormalizeError> {
        if !is_valid_postal_code(code) {
            return Err(NormalizeError::InvalidPostalCode(code.to_string()));
        }
        code.parse()
            .map_err(|_| NormalizeError::InvalidPostalCode(code.to_string()))
    }

    /// Validate plant search radius
    pub fn validate_distance(&self, miles: u32) -> Result<(), NormalizeError> {
        self.validate_range("plant_distance_mi", miles as f64, self.config.distance_range)
    }

    /// Validate a strength window
    pub fn validate_strength_range(&self, min_psi: u32, max_psi: u32) -> Result<(), NormalizeError> {
        self.validate_range("strength_min_psi", min_psi as f64, self.config.strength_range)?;
        self.validate_range("strength_max_psi", max_psi as f64, self.config.strength_range)?;

        let step = self.config.strength_step;
        if step > 0 && (min_psi % step != 0 || max_psi % step != 0) {
            return Err(NormalizeError::InvalidRange {
                field: "strength",
                reason: format!("bounds must be multiples of {} psi", step),
            });
        }

        if min_psi > max_psi {
            return Err(NormalizeError::InvalidRange {
                field: "strength",
                reason: format!("minimum {} psi exceeds maximum {} psi", min_psi, max_psi),
            });
        }

        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
