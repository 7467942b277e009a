//! Concrete Material Record Normalization
//!
//! Provides unit conversion, strength bucketing, record flattening, and
//! query input validation for concrete EPD material records.

mod error;
mod normalizer;
mod units;
mod validator;

pub use error::NormalizeError;
pub use normalizer::{
    ConcreteRecord, Normalized, NormalizerConfig, Owner, PlantOrGroup, RawMaterial,
    RecordNormalizer, SkippedRecord, GWP_COLUMN, PLANT_COLUMN, STRENGTH_COLUMN,
};
pub use units::{
    format_miles, format_psi, parse_leading_value, parse_quantity, round_to_bucket,
    strength_to_psi, Quantity, StrengthUnit, DEFAULT_BUCKET_PSI, KSI_TO_PSI, MPA_TO_PSI,
};
pub use validator::{is_valid_postal_code, ValidationConfig, Validator, POSTAL_CODE_LEN};
