//! Numeric Column Extractors

use record_normalizer::{ConcreteRecord, GWP_COLUMN, STRENGTH_COLUMN};

/// A named numeric column over rows of type `T`
pub trait Column<T> {
    /// Display name
    fn name(&self) -> &str;

    /// Value of this column for a row
    fn value(&self, row: &T) -> f64;
}

/// GWP per declared unit (kgCO2e)
#[derive(Debug, Clone, Copy, Default)]
pub struct GwpColumn;

impl Column<ConcreteRecord> for GwpColumn {
    fn name(&self) -> &str {
        GWP_COLUMN
    }

    fn value(&self, row: &ConcreteRecord) -> f64 {
        row.gwp_kgco2e
    }
}

/// Bucketed 28-day strength (psi)
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthColumn;

impl Column<ConcreteRecord> for StrengthColumn {
    fn name(&self) -> &str {
        STRENGTH_COLUMN
    }

    fn value(&self, row: &ConcreteRecord) -> f64 {
        row.strength_psi as f64
    }
}

/// Look up a record column by display name or short alias
pub fn record_column(name: &str) -> Option<&'static dyn Column<ConcreteRecord>> {
    match name {
        GWP_COLUMN | "gwp" => Some(&GwpColumn),
        STRENGTH_COLUMN | "strength" => Some(&StrengthColumn),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_columns() {
        let rec = ConcreteRecord {
            id: "a".to_string(),
            strength_psi: 4000,
            gwp_kgco2e: 312.0,
            plant: "X".to_string(),
        };
        assert_eq!(GwpColumn.value(&rec), 312.0);
        assert_eq!(StrengthColumn.value(&rec), 4000.0);
        assert_eq!(record_column("gwp").map(|c| c.name()), Some(GWP_COLUMN));
        assert_eq!(
            record_column(STRENGTH_COLUMN).map(|c| c.value(&rec)),
            Some(4000.0)
        );
        assert!(record_column("density").is_none());
    }
}
