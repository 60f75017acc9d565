// src/report/mod.rs
pub mod observations;
pub mod writer;

pub use observations::{observation_lines, paginate, LINES_PER_PAGE};
pub use writer::ReportWriter;
