//! Material Record Normalization
//!
//! Turns raw material records (mixed strength units, optional fields,
//! nested plant/owner metadata) into flat rows with one strength unit.

use crate::error::NormalizeError;
use crate::units::{parse_leading_value, round_to_bucket, strength_to_psi, DEFAULT_BUCKET_PSI};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Display name of the strength column
pub const STRENGTH_COLUMN: &str = "Compressive Strength [psi]";
/// Display name of the GWP column
pub const GWP_COLUMN: &str = "GWP [kgCO2e]";
/// Display name of the plant column
pub const PLANT_COLUMN: &str = "Plant";

/// Owner organization attached to a plant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    /// Owner name. Not always a string in the wild.
    #[serde(default)]
    pub name: Option<serde_json::Value>,
}

/// Plant or plant group that produced the material
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantOrGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owned_by: Option<Owner>,
}

/// Material record as returned by the material database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMaterial {
    pub id: String,
    #[serde(default)]
    pub concrete_compressive_strength_28d: Option<String>,
    #[serde(default)]
    pub gwp: Option<String>,
    #[serde(default)]
    pub plant_or_group: Option<PlantOrGroup>,
}

/// Normalized concrete row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteRecord {
    pub id: String,
    /// 28-day strength in psi, rounded to the bucket
    pub strength_psi: i64,
    pub gwp_kgco2e: f64,
    pub plant: String,
}

/// A record dropped during normalization
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub id: String,
    pub reason: NormalizeError,
}

/// Output of a batch normalization
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<ConcreteRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// Normalizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Strength bucket width (psi)
    pub bucket_psi: f64,
    /// Plant label used when the owner name is missing
    pub unknown_plant: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            bucket_psi: DEFAULT_BUCKET_PSI,
            unknown_plant: "Unknown".to_string(),
        }
    }
}

/// Record normalizer
pub struct RecordNormalizer {
    config: NormalizerConfig,
}

impl RecordNormalizer {
    /// Create a new normalizer with given config
    pub fn new(config: NormalizerConfig) -> Self {
        if !(config.bucket_psi.is_finite() && config.bucket_psi > 0.0) {
            warn!(
                "Invalid bucket width {}, falling back to {}",
                config.bucket_psi, DEFAULT_BUCKET_PSI
            );
            return Self {
                config: NormalizerConfig {
                    bucket_psi: DEFAULT_BUCKET_PSI,
                    ..config
                },
            };
        }
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a single raw record
    pub fn normalize_one(&self, raw: &RawMaterial) -> Result<ConcreteRecord, NormalizeError> {
        let strength = raw
            .concrete_compressive_strength_28d
            .as_deref()
            .ok_or(NormalizeError::MissingField("concrete_compressive_strength_28d"))?;
        let strength_psi = round_to_bucket(strength_to_psi(strength)?, self.config.bucket_psi);

        let gwp = raw.gwp.as_deref().ok_or(NormalizeError::MissingField("gwp"))?;
        let gwp_kgco2e = parse_leading_value(gwp)?;

        Ok(ConcreteRecord {
            id: raw.id.clone(),
            strength_psi,
            gwp_kgco2e,
            plant: self.plant_name(raw),
        })
    }

    /// Normalize a batch, keeping input order and collecting skipped records
    pub fn normalize_all(&self, raws: &[RawMaterial]) -> Normalized {
        let mut out = Normalized {
            records: Vec::with_capacity(raws.len()),
            skipped: Vec::new(),
        };

        for raw in raws {
            match self.normalize_one(raw) {
                Ok(record) => out.records.push(record),
                Err(reason) => {
                    debug!("Skipping material {}: {}", raw.id, reason);
                    out.skipped.push(SkippedRecord {
                        id: raw.id.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            "Normalized {}/{} materials ({} skipped)",
            out.records.len(),
            raws.len(),
            out.skipped.len()
        );
        out
    }

    /// Owner name of the producing plant, or the unknown label
    pub fn plant_name(&self, raw: &RawMaterial) -> String {
        raw.plant_or_group
            .as_ref()
            .and_then(|p| p.owned_by.as_ref())
            .and_then(|o| o.name.as_ref())
            .and_then(|v| v.as_str())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.config.unknown_plant.clone())
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}
