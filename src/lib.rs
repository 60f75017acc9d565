// src/lib.rs
//! Recovers per-app daily IVT rows from loosely structured report text and
//! summarizes them per app and on a shared date axis.

pub mod aggregate;
pub mod config;
pub mod extractors;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use aggregate::{Analysis, CombinedSeries, EntityRecordSet, EntitySummary};
pub use config::ExtractionConfig;
pub use pipeline::{Extraction, Pipeline};
pub use utils::AppError;
