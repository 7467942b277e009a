//! Statistical Outlier Removal

use crate::column::Column;
use crate::error::FilterError;
use crate::statistics::ColumnStats;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

/// Which side of the mean a z-score rule trims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Only values above `mean + n_std * sd` are removed
    Upper,
    /// Values outside `mean ± n_std * sd` are removed
    Both,
}

impl FromStr for Bound {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upper" => Ok(Bound::Upper),
            "both" => Ok(Bound::Both),
            other => Err(FilterError::UnknownBound(other.to_string())),
        }
    }
}

/// Outlier rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OutlierMethod {
    /// Standard-deviation distance from the mean
    ZScore { n_std: f64, bound: Bound },
    /// Tukey fences: `[q1 - k * iqr, q3 + k * iqr]`
    Iqr { k: f64 },
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::ZScore {
            n_std: 3.0,
            bound: Bound::Upper,
        }
    }
}

/// Rows removed by one column pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRemoval {
    pub column: String,
    pub removed: usize,
    /// Inclusive bounds applied, `None` when there was too little data to filter
    pub bounds: Option<(f64, f64)>,
}

/// Result of a multi-column filter
#[derive(Debug, Clone)]
pub struct FilterOutcome<T> {
    pub kept: Vec<T>,
    pub removals: Vec<ColumnRemoval>,
}

impl<T> FilterOutcome<T> {
    /// Total rows removed across all columns
    pub fn removed_total(&self) -> usize {
        self.removals.iter().map(|r| r.removed).sum()
    }
}

/// Outlier filter over numeric columns
#[derive(Debug, Clone, Default)]
pub struct OutlierFilter {
    method: OutlierMethod,
}

impl OutlierFilter {
    /// Create a new filter, rejecting negative or non-finite multipliers
    pub fn new(method: OutlierMethod) -> Result<Self, FilterError> {
        let (name, value) = match method {
            OutlierMethod::ZScore { n_std, .. } => ("n_std", n_std),
            OutlierMethod::Iqr { k } => ("k", k),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(FilterError::InvalidMultiplier { name, value });
        }
        Ok(Self { method })
    }

    /// Configured rule
    pub fn method(&self) -> OutlierMethod {
        self.method
    }

    /// Inclusive keep-bounds for a column.
    ///
    /// `None` means keep every finite value: fewer than two finite values,
    /// no spread at all, or bounds that are not comparable.
    pub fn bounds(&self, values: &[f64]) -> Option<(f64, f64)> {
        let stats = ColumnStats::compute(values);
        if stats.count < 2 || stats.min == stats.max {
            return None;
        }

        let bounds = match self.method {
            OutlierMethod::ZScore { n_std, bound } => {
                let upper = stats.mean + n_std * stats.std_dev;
                let lower = match bound {
                    Bound::Upper => f64::NEG_INFINITY,
                    Bound::Both => stats.mean - n_std * stats.std_dev,
                };
                (lower, upper)
            }
            OutlierMethod::Iqr { k } => {
                let iqr = stats.iqr();
                (stats.q1 - k * iqr, stats.q3 + k * iqr)
            }
        };
        // NaN bounds would drop every row
        if bounds.0.is_nan() || bounds.1.is_nan() {
            return None;
        }
        Some(bounds)
    }

    /// Keep rows whose key is finite and within bounds, preserving order
    pub fn filter_by<T, F>(&self, rows: Vec<T>, key: F) -> Vec<T>
    where
        F: Fn(&T) -> f64,
    {
        self.filter_with_bounds(rows, &key).0
    }

    fn filter_with_bounds<T, F>(&self, rows: Vec<T>, key: &F) -> (Vec<T>, Option<(f64, f64)>)
    where
        F: Fn(&T) -> f64,
    {
        let values: Vec<f64> = rows.iter().map(key).collect();
        let bounds = self.bounds(&values);

        let kept = rows
            .into_iter()
            .zip(values)
            .filter(|(_, v)| {
                v.is_finite() && bounds.map_or(true, |(lo, hi)| *v >= lo && *v <= hi)
            })
            .map(|(row, _)| row)
            .collect();

        (kept, bounds)
    }

    /// Apply columns in order. Each pass sees only the survivors of the
    /// previous one, so statistics are recomputed per column.
    pub fn filter_columns<T>(&self, rows: Vec<T>, columns: &[&dyn Column<T>]) -> FilterOutcome<T> {
        let total = rows.len();
        let mut kept = rows;
        let mut removals = Vec::with_capacity(columns.len());

        for column in columns {
            let before = kept.len();
            let (next, bounds) = self.filter_with_bounds(kept, &|row: &T| column.value(row));
            let removed = before - next.len();

            debug!(
                "Column {:?}: bounds {:?}, removed {} of {}",
                column.name(),
                bounds,
                removed,
                before
            );

            removals.push(ColumnRemoval {
                column: column.name().to_string(),
                removed,
                bounds,
            });
            kept = next;
        }

        info!(
            "Outlier filter ({:?}) kept {}/{} rows",
            self.method,
            kept.len(),
            total
        );
        FilterOutcome { kept, removals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{GwpColumn, StrengthColumn};
    use proptest::prelude::*;
    use record_normalizer::ConcreteRecord;

    fn rec(id: usize, strength_psi: i64, gwp: f64) -> ConcreteRecord {
        ConcreteRecord {
            id: id.to_string(),
            strength_psi,
            gwp_kgco2e: gwp,
            plant: "P".to_string(),
        }
    }

    fn cluster_with_spike() -> Vec<f64> {
        let mut values: Vec<f64> = (0..20).map(|i| 300.0 + (i % 5) as f64).collect();
        values.push(5000.0);
        values
    }

    #[test]
    fn test_zscore_removes_high_spike() {
        let filter = OutlierFilter::default();
        let kept = filter.filter_by(cluster_with_spike(), |v| *v);
        assert_eq!(kept.len(), 20);
        assert!(kept.iter().all(|v| *v < 1000.0));
    }

    #[test]
    fn test_upper_bound_keeps_low_values() {
        let mut values = cluster_with_spike();
        values.pop();
        values.push(-5000.0);

        let upper = OutlierFilter::default();
        assert_eq!(upper.filter_by(values.clone(), |v| *v).len(), 21);

        let both = OutlierFilter::new(OutlierMethod::ZScore {
            n_std: 3.0,
            bound: Bound::Both,
        })
        .unwrap();
        assert_eq!(both.filter_by(values, |v| *v).len(), 20);
    }

    #[test]
    fn test_iqr_fences() {
        let filter = OutlierFilter::new(OutlierMethod::Iqr { k: 1.5 }).unwrap();
        let values = vec![1.0, 2.0, 3.0, 4.0, 100.0];
        // q1 = 2, q3 = 4, fences [-1, 7]
        assert_eq!(filter.bounds(&values), Some((-1.0, 7.0)));
        assert_eq!(filter.filter_by(values, |v| *v), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_small_inputs_kept() {
        let filter = OutlierFilter::default();
        assert!(filter.filter_by(Vec::<f64>::new(), |v| *v).is_empty());
        assert_eq!(filter.filter_by(vec![42.0], |v| *v), vec![42.0]);
        assert_eq!(filter.bounds(&[42.0]), None);
    }

    #[test]
    fn test_zero_spread_kept() {
        let filter = OutlierFilter::default();
        let values = vec![0.1; 7];
        assert_eq!(filter.filter_by(values, |v| *v).len(), 7);
    }

    #[test]
    fn test_non_finite_removed() {
        let filter = OutlierFilter::default();
        let kept = filter.filter_by(vec![1.0, f64::NAN, 2.0, f64::INFINITY], |v| *v);
        assert_eq!(kept, vec![1.0, 2.0]);
    }

    #[test]
    fn test_invalid_multiplier() {
        assert!(OutlierFilter::new(OutlierMethod::Iqr { k: -1.0 }).is_err());
        assert_eq!(
            OutlierFilter::new(OutlierMethod::ZScore {
                n_std: f64::NAN,
                bound: Bound::Upper
            })
            .unwrap_err()
            .to_string(),
            "Invalid n_std NaN: must be finite and >= 0"
        );
    }

    #[test]
    fn test_columns_applied_sequentially() {
        let mut rows: Vec<ConcreteRecord> = (0..20)
            .map(|i| rec(i, 4000 + (i as i64 % 3) * 500, 300.0 + (i % 4) as f64))
            .collect();
        rows.push(rec(20, 4000, 9000.0));
        rows.push(rec(21, 60000, 301.0));

        let filter = OutlierFilter::default();
        let outcome = filter.filter_columns(rows, &[&GwpColumn, &StrengthColumn]);

        assert_eq!(outcome.kept.len(), 20);
        assert_eq!(outcome.removals[0].column, "GWP [kgCO2e]");
        assert_eq!(outcome.removals[0].removed, 1);
        assert_eq!(outcome.removals[1].removed, 1);
        assert_eq!(outcome.removed_total(), 2);
        let ids: Vec<_> = outcome.kept.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, (0..20).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_method_serde_shape() {
        let method: OutlierMethod =
            serde_json::from_str(r#"{"method":"iqr","k":3.0}"#).unwrap();
        assert_eq!(method, OutlierMethod::Iqr { k: 3.0 });
        assert_eq!("both".parse::<Bound>().unwrap(), Bound::Both);
    }

    #[test]
    fn test_unknown_bound_error() {
        let err = "lower".parse::<Bound>().unwrap_err();
        assert_eq!(err, FilterError::UnknownBound("lower".to_string()));
        assert!(err.to_string().contains("bound"));
    }

    #[test]
    fn test_huge_values_do_not_empty_two_sided_filter() {
        let filter = OutlierFilter::new(OutlierMethod::ZScore {
            n_std: 3.0,
            bound: Bound::Both,
        })
        .unwrap();
        let values = vec![1e308, 1e308, 1e308, 1.0];
        let kept = filter.filter_by(values.clone(), |v| *v);
        assert_eq!(kept, values);
    }

    proptest! {
        #[test]
        fn kept_is_ordered_subset(values in prop::collection::vec(-1e6f64..1e6, 0..60)) {
            let filter = OutlierFilter::default();
            let kept = filter.filter_by(values.clone(), |v| *v);
            prop_assert!(kept.len() <= values.len());
            let mut it = values.iter();
            for k in &kept {
                prop_assert!(it.any(|v| v == k));
            }
        }

        #[test]
        fn zscore_never_removes_below_mean(values in prop::collection::vec(0.0f64..1e4, 2..60)) {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let kept = OutlierFilter::default().filter_by(values.clone(), |v| *v);
            let below = values.iter().filter(|v| **v <= mean).count();
            prop_assert!(kept.iter().filter(|v| **v <= mean).count() == below);
        }
    }
}
