//! GWP Report Layer
//!
//! Builds the summaries a dashboard charts (box plot of GWP per strength
//! bucket, material count per plant) and exports the cleaned table.

mod export;
mod report;

pub use export::{export_csv, export_json, MAX_EXPORT_ROWS};
pub use report::{BoxStats, PlantCount, Report};

use thiserror::Error;

/// Report errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
