// src/extractors/mod.rs
pub mod blocks;
pub mod normalize;
pub mod rows;
pub mod section;

// Re-export key extraction types for convenience
pub use blocks::{BlockSegmenter, EntityBlock};
pub use normalize::{parse_date, parse_numeric};
pub use rows::{extract_rows, ExtractedRecord, RowRule};
pub use section::{LocatedSection, SectionLocator, SectionSource};
