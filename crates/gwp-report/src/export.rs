//! Table and Report Export

use crate::report::Report;
use crate::ReportError;
use record_normalizer::{ConcreteRecord, GWP_COLUMN, PLANT_COLUMN, STRENGTH_COLUMN};
use std::io::Write;
use tracing::{info, warn};

/// Export row cap
pub const MAX_EXPORT_ROWS: usize = 1_000_000;

/// Write the cleaned table as CSV with display headers.
///
/// Returns the number of data rows written.
pub fn export_csv<W: Write>(records: &[ConcreteRecord], writer: W) -> Result<usize, ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([STRENGTH_COLUMN, GWP_COLUMN, PLANT_COLUMN])?;

    if records.len() > MAX_EXPORT_ROWS {
        warn!(
            "Export truncated to {} of {} rows",
            MAX_EXPORT_ROWS,
            records.len()
        );
    }

    let mut written = 0;
    for r in records.iter().take(MAX_EXPORT_ROWS) {
        csv.write_record([
            r.strength_psi.to_string(),
            r.gwp_kgco2e.to_string(),
            r.plant.clone(),
        ])?;
        written += 1;
    }
    csv.flush()?;

    info!("Exported {} rows as CSV", written);
    Ok(written)
}

/// Write the report as pretty JSON
pub fn export_json<W: Write>(report: &Report, writer: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(writer, report)
        .map_err(|e| ReportError::SerializationError(e.to_string()))
}
