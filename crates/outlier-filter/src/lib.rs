//! Outlier Filtering Engine
//!
//! Provides column statistics and z-score / IQR outlier removal over
//! normalized material rows.

mod column;
mod error;
mod filter;
mod statistics;

pub use column::{record_column, Column, GwpColumn, StrengthColumn};
pub use error::FilterError;
pub use filter::{Bound, ColumnRemoval, FilterOutcome, OutlierFilter, OutlierMethod};
pub use statistics::{quantile_sorted, ColumnStats};
