//! Chart Summaries

use chrono::{DateTime, Utc};
use outlier_filter::{ColumnRemoval, ColumnStats};
use record_normalizer::ConcreteRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Five-number summary of GWP for one strength bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub strength_psi: i64,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Number of materials from one plant owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantCount {
    pub plant: String,
    pub count: usize,
}

/// Summary of a cleaned material set
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Materials left after normalization and outlier removal
    pub material_count: usize,
    /// Materials dropped during normalization
    pub skipped_count: usize,
    pub removed_outliers: Vec<ColumnRemoval>,
    pub gwp: ColumnStats,
    /// Sorted by strength
    pub boxes: Vec<BoxStats>,
    /// Sorted by count descending, then plant name
    pub plants: Vec<PlantCount>,
}

impl Report {
    /// Build a report stamped with the current time
    pub fn build(
        records: &[ConcreteRecord],
        skipped_count: usize,
        removed_outliers: Vec<ColumnRemoval>,
    ) -> Self {
        Self::build_at(records, skipped_count, removed_outliers, Utc::now())
    }

    /// Build a report stamped with `now`
    pub fn build_at(
        records: &[ConcreteRecord],
        skipped_count: usize,
        removed_outliers: Vec<ColumnRemoval>,
        now: DateTime<Utc>,
    ) -> Self {
        let gwp: Vec<f64> = records.iter().map(|r| r.gwp_kgco2e).collect();

        Self {
            generated_at: now,
            material_count: records.len(),
            skipped_count,
            removed_outliers,
            gwp: ColumnStats::compute(&gwp),
            boxes: box_stats(records),
            plants: plant_counts(records),
        }
    }

    /// Rows removed by the outlier filter
    pub fn removed_total(&self) -> usize {
        self.removed_outliers.iter().map(|r| r.removed).sum()
    }

    /// One-line description of the charted data
    pub fn caption(&self) -> String {
        format!(
            "The following chart includes data from {} concrete materials. \
             Extreme outliers may be removed from dataset",
            self.material_count
        )
    }
}

fn box_stats(records: &[ConcreteRecord]) -> Vec<BoxStats> {
    let mut buckets: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for r in records {
        buckets.entry(r.strength_psi).or_default().push(r.gwp_kgco2e);
    }

    buckets
        .into_iter()
        .map(|(strength_psi, values)| {
            let stats = ColumnStats::compute(&values);
            BoxStats {
                strength_psi,
                count: stats.count,
                min: stats.min,
                q1: stats.q1,
                median: stats.median,
                q3: stats.q3,
                max: stats.max,
            }
        })
        .collect()
}

fn plant_counts(records: &[ConcreteRecord]) -> Vec<PlantCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.plant.as_str()).or_insert(0) += 1;
    }

    let mut plants: Vec<PlantCount> = counts
        .into_iter()
        .map(|(plant, count)| PlantCount {
            plant: plant.to_string(),
            count,
        })
        .collect();
    plants.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.plant.cmp(&b.plant)));
    plants
}
