//! Concrete GWP Pipeline
//!
//! Fetches raw concrete material records from a source, normalizes them to
//! one strength unit, removes GWP outliers, and summarizes what remains.

use gwp_report::{Report, ReportError};
use material_source::{MaterialQuery, MaterialSource, SourceError};
use outlier_filter::{record_column, Column, FilterError, OutlierFilter};
use record_normalizer::{
    ConcreteRecord, NormalizeError, RawMaterial, RecordNormalizer, SkippedRecord, Validator,
};
use thiserror::Error;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod settings;

pub use settings::{OutlierSettings, QueryDefaults, Settings, ENV_PREFIX};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] NormalizeError),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

/// Cleaned records and their summary
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<ConcreteRecord>,
    pub skipped: Vec<SkippedRecord>,
    pub report: Report,
}

/// Normalize-then-filter pipeline
pub struct Pipeline {
    normalizer: RecordNormalizer,
    filter: OutlierFilter,
    columns: Vec<&'static dyn Column<ConcreteRecord>>,
    validator: Validator,
}

impl Pipeline {
    /// Build a pipeline from settings
    pub fn new(settings: &Settings) -> Result<Self, PipelineError> {
        let filter = OutlierFilter::new(settings.outlier.to_method()?)?;

        let columns = settings
            .outlier
            .columns
            .iter()
            .map(|name| record_column(name).ok_or_else(|| PipelineError::UnknownColumn(name.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            warn!("No outlier columns configured; rows will not be filtered");
        }

        Ok(Self {
            normalizer: RecordNormalizer::new(settings.normalizer.clone()),
            filter,
            columns,
            validator: Validator::default(),
        })
    }

    /// Check a query before it is sent to a source
    pub fn validate_query(&self, query: &MaterialQuery) -> Result<(), PipelineError> {
        self.validator
            .validate_postal_code(&format!("{:05}", query.postal_code))?;
        self.validator.validate_distance(query.plant_distance_mi)?;
        self.validator
            .validate_strength_range(query.strength_min_psi, query.strength_max_psi)?;
        Ok(())
    }

    /// Query the source, then clean the result
    pub fn run(
        &self,
        source: &dyn MaterialSource,
        query: &MaterialQuery,
    ) -> Result<PipelineOutput, PipelineError> {
        self.validate_query(query)?;

        info!(
            "Querying materials within {} of {:05} with {}",
            query.plant_distance(),
            query.postal_code,
            query.params()
        );
        let raws = source.materials_within_region(query)?;
        Ok(self.clean(&raws))
    }

    /// Normalize and outlier-filter raw records
    pub fn clean(&self, raws: &[RawMaterial]) -> PipelineOutput {
        let normalized = self.normalizer.normalize_all(raws);
        let outcome = self.filter.filter_columns(normalized.records, &self.columns);

        let report = Report::build(&outcome.kept, normalized.skipped.len(), outcome.removals);
        info!("{}", report.caption());

        PipelineOutput {
            records: outcome.kept,
            skipped: normalized.skipped,
            report,
        }
    }
}

/// Initialize logging. 0 = INFO, 1 = DEBUG, 2+ = TRACE.
pub fn init_logging(verbosity: u8) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
