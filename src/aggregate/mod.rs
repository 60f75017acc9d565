// src/aggregate/mod.rs
//! Turns per-entity record sets into summaries and date-aligned series.
//! Records without a metric are dropped here, silently, but the counts
//! before and after are kept on each summary.

pub mod series;

use serde::Serialize;

use crate::extractors::{ExtractedRecord, SectionSource};

pub use series::{combine, entity_series, CombinedRow, CombinedSeries, EntitySeries, SeriesAxis, SeriesPoint, SeriesX};

/// Records recovered from one entity block, in line order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecordSet {
    pub index: usize,
    pub section_source: SectionSource,
    pub records: Vec<ExtractedRecord>,
}

impl EntityRecordSet {
    pub fn parsed_rows(&self) -> usize {
        self.records.len()
    }

    pub fn metric_rows(&self) -> usize {
        self.records.iter().filter(|r| r.metric.is_some()).count()
    }

    pub fn metric_values(&self) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.metric).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub index: usize,
    /// Every record the row extractor produced.
    pub parsed_rows: usize,
    /// Records with a metric; the statistics cover only these.
    pub metric_rows: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Some metric is strictly above the configured threshold.
    pub exceeds_threshold: bool,
    /// Every metric is exactly zero.
    pub all_zero: bool,
}

/// Statistics for one entity, or `None` when it has no metric values.
pub fn summarize(set: &EntityRecordSet, threshold: f64) -> Option<EntitySummary> {
    let mut values = set.metric_values();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };

    Some(EntitySummary {
        index: set.index,
        parsed_rows: set.parsed_rows(),
        metric_rows: n,
        mean,
        median,
        min: values[0],
        max: values[n - 1],
        exceeds_threshold: values.iter().any(|v| *v > threshold),
        all_zero: values.iter().all(|v| *v == 0.0),
    })
}

pub fn summarize_all(sets: &[EntityRecordSet], threshold: f64) -> Vec<EntitySummary> {
    sets.iter().filter_map(|set| summarize(set, threshold)).collect()
}

/// Everything handed to the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub summaries: Vec<EntitySummary>,
    pub entity_series: Vec<EntitySeries>,
    pub combined: CombinedSeries,
}

impl Analysis {
    pub fn has_data(&self) -> bool {
        !self.summaries.is_empty()
    }
}

pub fn analyze(sets: &[EntityRecordSet], threshold: f64) -> Analysis {
    Analysis {
        summaries: summarize_all(sets, threshold),
        entity_series: sets.iter().filter_map(entity_series).collect(),
        combined: combine(sets),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_threshold_flag() {
        let summary = summarize(&metrics(1, &[0.1, 0.6, 0.2]), 0.5).unwrap();
        assert!(summary.exceeds_threshold);
        assert!(!summary.all_zero);
        assert_eq!(summary.median, 0.2);
        assert_eq!(summary.min, 0.1);
        assert_eq!(summary.max, 0.6);
        assert!((summary.mean - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_flag() {
        let summary = summarize(&metrics(2, &[0.0, 0.0]), 0.5).unwrap();
        assert!(summary.all_zero);
        assert!(!summary.exceeds_threshold);
    }

    #[test]
    fn test_threshold_is_strict() {
        let summary = summarize(&metrics(1, &[0.5]), 0.5).unwrap();
        assert!(!summary.exceeds_threshold);
    }

    #[test]
    fn test_even_count_median() {
        let summary = summarize(&metrics(1, &[4.0, 1.0, 3.0, 2.0]), 10.0).unwrap();
        assert_eq!(summary.median, 2.5);
    }

    #[test]
    fn test_null_metrics_excluded_but_counted() {
        let set = set(
            3,
            vec![
                record(Some("2025-09-12"), None),
                record(Some("2025-09-13"), Some(0.2)),
                record(None, Some(0.4)),
            ],
        );
        let summary = summarize(&set, 0.5).unwrap();
        assert_eq!(summary.parsed_rows, 3);
        assert_eq!(summary.metric_rows, 2);
        assert!((summary.mean - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_entity_without_metrics_has_no_summary() {
        let sets = vec![
            set(1, vec![record(Some("2025-09-12"), None)]),
            set(2, vec![]),
            metrics(3, &[1.0]),
        ];
        let summaries = summarize_all(&sets, 0.5);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].index, 3);
    }

    #[test]
    fn test_analyze_empty_is_well_formed() {
        let analysis = analyze(&[], 0.5);
        assert!(!analysis.has_data());
        assert!(analysis.entity_series.is_empty());
        assert!(analysis.combined.is_empty());
    }
}
