//! Layered Settings
//!
//! Defaults, then an optional TOML/YAML/JSON file, then environment
//! variables prefixed `CONCRETE_GWP__` (nested keys joined with `__`, e.g.
//! `CONCRETE_GWP__OUTLIER__N_STD=2.5`).

use crate::PipelineError;
use config::{Config, Environment, File};
use material_source::MaterialQuery;
use outlier_filter::{Bound, OutlierMethod};
use record_normalizer::NormalizerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CONCRETE_GWP";

/// Outlier rule settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierSettings {
    /// `zscore` or `iqr`
    pub method: String,
    /// Standard deviations for `zscore`
    pub n_std: f64,
    /// `upper` or `both`, for `zscore`
    pub bound: String,
    /// Fence multiplier for `iqr`
    pub iqr_k: f64,
    /// Columns filtered, in order (`gwp`, `strength`)
    pub columns: Vec<String>,
}

impl Default for OutlierSettings {
    fn default() -> Self {
        Self {
            method: "zscore".to_string(),
            n_std: 3.0,
            bound: "upper".to_string(),
            iqr_k: 1.5,
            columns: vec!["gwp".to_string()],
        }
    }
}

impl OutlierSettings {
    /// Resolve into a filter rule
    pub fn to_method(&self) -> Result<OutlierMethod, PipelineError> {
        match self.method.as_str() {
            "zscore" => Ok(OutlierMethod::ZScore {
                n_std: self.n_std,
                bound: self.bound.parse::<Bound>()?,
            }),
            "iqr" => Ok(OutlierMethod::Iqr { k: self.iqr_k }),
            other => Err(outlier_filter::FilterError::UnknownMethod(other.to_string()).into()),
        }
    }
}

/// Query values used when the command line leaves them out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDefaults {
    pub plant_distance_mi: u32,
    pub strength_min_psi: u32,
    pub strength_max_psi: u32,
    pub max_records: usize,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        let query = MaterialQuery::default();
        Self {
            plant_distance_mi: query.plant_distance_mi,
            strength_min_psi: query.strength_min_psi,
            strength_max_psi: query.strength_max_psi,
            max_records: query.max_records,
        }
    }
}

impl QueryDefaults {
    /// Build a query for a postal code from these defaults
    pub fn to_query(&self, postal_code: u32) -> MaterialQuery {
        MaterialQuery {
            postal_code,
            plant_distance_mi: self.plant_distance_mi,
            strength_min_psi: self.strength_min_psi,
            strength_max_psi: self.strength_max_psi,
            max_records: self.max_records,
            ..Default::default()
        }
    }
}

/// Pipeline settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub normalizer: NormalizerConfig,
    pub outlier: OutlierSettings,
    pub query: QueryDefaults,
}

impl Settings {
    /// Load defaults, an optional file, and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            debug!("Reading settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
