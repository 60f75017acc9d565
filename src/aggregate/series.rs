// src/aggregate/series.rs
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::EntityRecordSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesAxis {
    Date,
    RowIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesX {
    Date(NaiveDate),
    Row(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: SeriesX,
    pub label: String,
    pub value: f64,
}

/// Chart data for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySeries {
    pub index: usize,
    pub axis: SeriesAxis,
    pub points: Vec<SeriesPoint>,
}

/// Date axis when any metric record carries a parsed date, otherwise line position.
/// `None` when the entity has no metric values at all.
pub fn entity_series(set: &EntityRecordSet) -> Option<EntitySeries> {
    let with_metric: Vec<_> = set
        .records
        .iter()
        .filter_map(|r| r.metric.map(|m| (r, m)))
        .collect();
    if with_metric.is_empty() {
        return None;
    }

    let mut dated: Vec<(NaiveDate, SeriesPoint)> = with_metric
        .iter()
        .filter_map(|(r, m)| {
            r.date.map(|d| (d, SeriesPoint { x: SeriesX::Date(d), label: r.date_text.clone(), value: *m }))
        })
        .collect();

    if !dated.is_empty() {
        // stable sort, same-day rows keep line order
        dated.sort_by_key(|(d, _)| *d);
        let points = dated.into_iter().map(|(_, p)| p).collect();
        return Some(EntitySeries { index: set.index, axis: SeriesAxis::Date, points });
    }

    let points = with_metric
        .iter()
        .enumerate()
        .map(|(i, (r, m))| SeriesPoint { x: SeriesX::Row(i), label: r.date_text.clone(), value: *m })
        .collect();
    Some(EntitySeries { index: set.index, axis: SeriesAxis::RowIndex, points })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRow {
    pub date: NaiveDate,
    /// One cell per column, `None` where that entity has nothing for the date.
    pub values: Vec<Option<f64>>,
}

/// Outer join of per-entity daily means on the date axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CombinedSeries {
    pub entities: Vec<usize>,
    pub columns: Vec<String>,
    pub rows: Vec<CombinedRow>,
}

impl CombinedSeries {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Value for an entity on a date, if both are present.
    pub fn value(&self, entity: usize, date: NaiveDate) -> Option<f64> {
        let col = self.entities.iter().position(|e| *e == entity)?;
        let row = self.rows.binary_search_by_key(&date, |r| r.date).ok()?;
        self.rows[row].values[col]
    }
}

pub fn column_label(index: usize) -> String {
    format!("IVT_app_{}", index)
}

/// Entities without a dated metric record are left out. Yearless phrase
/// dates and fallback labels never reach this table.
pub fn combine(sets: &[EntityRecordSet]) -> CombinedSeries {
    let mut entities = Vec::new();
    let mut daily_means: Vec<BTreeMap<NaiveDate, f64>> = Vec::new();

    for set in sets {
        let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for (date, metric) in set.records.iter().filter_map(|r| r.dated_metric()) {
            let entry = sums.entry(date).or_insert((0.0, 0));
            entry.0 += metric;
            entry.1 += 1;
        }
        if sums.is_empty() {
            tracing::debug!("App #{} has no dated metric rows, left out of combined series", set.index);
            continue;
        }
        entities.push(set.index);
        daily_means.push(sums.into_iter().map(|(d, (sum, n))| (d, sum / n as f64)).collect());
    }

    let dates: BTreeSet<NaiveDate> = daily_means.iter().flat_map(|m| m.keys().copied()).collect();
    let rows = dates
        .into_iter()
        .map(|date| CombinedRow {
            date,
            values: daily_means.iter().map(|m| m.get(&date).copied()).collect(),
        })
        .collect();

    CombinedSeries {
        columns: entities.iter().map(|i| column_label(*i)).collect(),
        entities,
        rows,
    }
}
