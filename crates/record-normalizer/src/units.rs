//! Strength Unit Conversion and Bucketing
//!
//! Material records report 28-day compressive strength as a free-form
//! `"<value> <unit>"` string in whichever unit the EPD author used. Everything
//! downstream works in psi, rounded to a fixed bucket so that strengths can be
//! grouped on a chart axis.

use crate::error::NormalizeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Megapascal to psi
pub const MPA_TO_PSI: f64 = 145.037_737_73;

/// Kilopound-per-square-inch to psi
pub const KSI_TO_PSI: f64 = 1000.0;

/// Default strength bucket width (psi)
pub const DEFAULT_BUCKET_PSI: f64 = 500.0;

/// Recognized compressive strength units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthUnit {
    /// Megapascal
    Mpa,
    /// Pounds per square inch
    Psi,
    /// Kilopounds per square inch
    Ksi,
}

impl StrengthUnit {
    /// Multiplier taking a value in this unit to psi
    pub fn to_psi_factor(self) -> f64 {
        match self {
            StrengthUnit::Mpa => MPA_TO_PSI,
            StrengthUnit::Psi => 1.0,
            StrengthUnit::Ksi => KSI_TO_PSI,
        }
    }
}

impl FromStr for StrengthUnit {
    type Err = NormalizeError;

    // Tokens are matched exactly as the database emits them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MPa" => Ok(StrengthUnit::Mpa),
            "psi" => Ok(StrengthUnit::Psi),
            "ksi" => Ok(StrengthUnit::Ksi),
            other => Err(NormalizeError::UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for StrengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthUnit::Mpa => write!(f, "MPa"),
            StrengthUnit::Psi => write!(f, "psi"),
            StrengthUnit::Ksi => write!(f, "ksi"),
        }
    }
}

/// A number with its unit token, e.g. `"27.6 MPa"` or `"312.5 kgCO2e"`
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

/// Parse a `"<number> <unit>"` string.
///
/// Tokens past the unit are ignored. The number must be finite.
pub fn parse_quantity(s: &str) -> Result<Quantity, NormalizeError> {
    let mut tokens = s.split_ascii_whitespace();

    let value = parse_leading_number(tokens.next(), s)?;
    let unit = tokens
        .next()
        .ok_or_else(|| NormalizeError::InvalidFormat(format!("missing unit in {:?}", s)))?;

    Ok(Quantity {
        value,
        unit: unit.to_string(),
    })
}

/// Parse only the leading number of a `"<number> [unit]"` string.
pub fn parse_leading_value(s: &str) -> Result<f64, NormalizeError> {
    parse_leading_number(s.split_ascii_whitespace().next(), s)
}

fn parse_leading_number(token: Option<&str>, original: &str) -> Result<f64, NormalizeError> {
    let token = token.ok_or_else(|| {
        NormalizeError::InvalidFormat(format!("empty measurement {:?}", original))
    })?;

    let value: f64 = token.parse().map_err(|_| {
        NormalizeError::InvalidFormat(format!("{:?} is not a number", token))
    })?;

    if !value.is_finite() {
        return Err(NormalizeError::InvalidFormat(format!(
            "{:?} is not a finite number",
            token
        )));
    }

    Ok(value)
}

/// Convert a strength string in MPa, psi, or ksi to psi
pub fn strength_to_psi(s: &str) -> Result<f64, NormalizeError> {
    let quantity = parse_quantity(s)?;
    let unit: StrengthUnit = quantity.unit.parse()?;
    Ok(quantity.value * unit.to_psi_factor())
}

/// Round to the nearest multiple of `bucket`, halves to even.
///
/// `round_to_bucket(2250.0, 500.0)` is 2000 and `round_to_bucket(2750.0, 500.0)`
/// is 3000.
pub fn round_to_bucket(psi: f64, bucket: f64) -> i64 {
    ((psi / bucket).round_ties_even() * bucket) as i64
}

/// Format a psi value the way the material query expects (`"2000 psi"`)
pub fn format_psi(value: u32) -> String {
    format!("{} {}", value, StrengthUnit::Psi)
}

/// Format a distance the way the material query expects (`"10 mi"`)
pub fn format_miles(value: u32) -> String {
    format!("{} mi", value)
}
