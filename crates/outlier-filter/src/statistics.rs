//! Column Statistics Computation

use serde::{Deserialize, Serialize};

/// Summary statistics for one numeric column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Number of finite values
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Sample standard deviation (n - 1). Zero below two values.
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Maximum value
    pub max: f64,
}

impl ColumnStats {
    /// Compute statistics over the finite entries of `values`
    pub fn compute(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Self::default();
        }
        sorted.sort_by(f64::total_cmp);

        // Welford's running mean and M2, so large values do not overflow a sum
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for (i, &v) in sorted.iter().enumerate() {
            let delta = v - mean;
            mean += delta / (i + 1) as f64;
            m2 += delta * (v - mean);
        }

        let std_dev = if sorted.len() >= 2 {
            (m2 / (sorted.len() - 1) as f64).sqrt()
        } else {
            0.0
        };

        Self {
            count: sorted.len(),
            mean,
            std_dev,
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        }
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Quantile `q` in `[0, 1]` of ascending `sorted`, linear interpolation
/// between closest ranks. Returns NaN for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let stats = ColumnStats::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((stats.mean - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_sample_std_dev() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = ColumnStats::compute(&values);
        // Population std is 2.0; sample std is sqrt(32 / 7)
        assert!((stats.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_quartiles_interpolate() {
        let stats = ColumnStats::compute(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.iqr(), 1.5);
    }

    #[test]
    fn test_single_value() {
        let stats = ColumnStats::compute(&[7.0]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.median, 7.0);
    }

    #[test]
    fn test_non_finite_ignored() {
        let stats = ColumnStats::compute(&[1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
    }

    #[test]
    fn test_mean_of_huge_values_stays_finite() {
        let stats = ColumnStats::compute(&[1e308, 1e308, 1e308]);
        assert!(stats.mean.is_finite());
        assert!((stats.mean - 1e308).abs() / 1e308 < 1e-12);
    }

    #[test]
    fn test_empty_values() {
        let stats = ColumnStats::compute(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }
}
