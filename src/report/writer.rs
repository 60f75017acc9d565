// src/report/writer.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::aggregate::Analysis;
use crate::report::observations::{paginate, LINES_PER_PAGE};
use crate::utils::error::StorageError;

pub const SUMMARIES_FILE: &str = "summaries.json";
pub const ENTITY_SERIES_FILE: &str = "entity_series.json";
pub const COMBINED_SERIES_FILE: &str = "combined_series.json";
pub const OBSERVATIONS_FILE: &str = "observations.txt";
pub const METADATA_FILE: &str = "report_meta.json";

// Form feed between observation pages.
const PAGE_BREAK: &str = "\n\u{c}\n";

/// Writes finished analysis artifacts for the rendering side to pick up.
pub struct ReportWriter {
    base_dir: PathBuf,
}

impl ReportWriter {
    /// Creates a new ReportWriter, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Saves summaries, both series and observation text split into pages.
    /// Same analysis, same bytes.
    pub fn save_analysis(&self, analysis: &Analysis, observations: &[String]) -> Result<Vec<PathBuf>, StorageError> {
        let mut written = vec![
            self.write_json(SUMMARIES_FILE, &analysis.summaries)?,
            self.write_json(ENTITY_SERIES_FILE, &analysis.entity_series)?,
            self.write_json(COMBINED_SERIES_FILE, &analysis.combined)?,
        ];

        let mut text = paginate(observations, LINES_PER_PAGE)
            .iter()
            .map(|page| page.join("\n"))
            .collect::<Vec<_>>()
            .join(PAGE_BREAK);
        text.push('\n');
        let path = self.base_dir.join(OBSERVATIONS_FILE);
        fs::write(&path, text).map_err(StorageError::IoError)?;
        tracing::info!("Saved observations to {}", path.display());
        written.push(path);

        Ok(written)
    }

    /// Saves run metadata in JSON format
    pub fn save_metadata(&self, source_name: &str, analysis: &Analysis) -> Result<PathBuf, StorageError> {
        let metadata = serde_json::json!({
            "source": source_name,
            "entities_with_metrics": analysis.summaries.len(),
            "entities_in_combined_series": analysis.combined.entities.len(),
            "combined_dates": analysis.combined.rows.len(),
            "generated_at": chrono::Utc::now().to_rfc3339(),
        });
        self.write_json(METADATA_FILE, &metadata)
    }

    fn write_json<T: Serialize + ?Sized>(&self, filename: &str, value: &T) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(filename);
        let body = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, body).map_err(StorageError::IoError)?;
        tracing::info!("Saved {} to {}", filename, file_path.display());
        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::pipeline::Pipeline;
    use crate::report::observation_lines;

    const DOC: &str = "Total Data\nDaily Data\n2025-09-12 0.1\n2025-09-13 0.7\nHourly Data\n";

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let writer = ReportWriter::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(writer.base_dir(), nested.as_path());
    }

    #[test]
    fn test_save_analysis_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        let pipeline = Pipeline::new(ExtractionConfig::default()).unwrap();

        let analysis = pipeline.run(DOC);
        let lines = observation_lines(&analysis.summaries, 0.5);
        let paths = writer.save_analysis(&analysis, &lines).unwrap();
        assert_eq!(paths.len(), 4);
        let first: Vec<String> = paths.iter().map(|p| fs::read_to_string(p).unwrap()).collect();

        let analysis = pipeline.run(DOC);
        writer.save_analysis(&analysis, &lines).unwrap();
        let second: Vec<String> = paths.iter().map(|p| fs::read_to_string(p).unwrap()).collect();
        assert_eq!(first, second);

        let summaries: serde_json::Value = serde_json::from_str(&first[0]).unwrap();
        assert_eq!(summaries[0]["index"], 1);
        assert_eq!(summaries[0]["exceeds_threshold"], true);

        let combined: serde_json::Value = serde_json::from_str(&first[2]).unwrap();
        assert_eq!(combined["columns"][0], "IVT_app_1");
        assert_eq!(combined["rows"][0]["date"], "2025-09-12");
        assert!(first[3].starts_with("Automated Observations & Summary\n"));
    }

    #[test]
    fn test_observations_are_paginated() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        let analysis = Pipeline::new(ExtractionConfig::default()).unwrap().run(DOC);
        let lines: Vec<String> = (0..100).map(|i| format!("line {}", i)).collect();

        writer.save_analysis(&analysis, &lines).unwrap();
        let text = fs::read_to_string(dir.path().join(OBSERVATIONS_FILE)).unwrap();
        let pages: Vec<&str> = text.split('\u{c}').collect();
        assert_eq!(pages.len(), 3);
        assert!(pages[0].starts_with("line 0\n"));
        assert!(pages[0].ends_with("line 44\n"));
        assert!(pages[1].starts_with("\nline 45\n"));
        assert!(text.ends_with("line 99\n"));
    }

    #[test]
    fn test_save_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        let analysis = Pipeline::new(ExtractionConfig::default()).unwrap().run(DOC);

        let path = writer.save_metadata("report.txt", &analysis).unwrap();
        let meta: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(meta["source"], "report.txt");
        assert_eq!(meta["entities_with_metrics"], 1);
        assert_eq!(meta["combined_dates"], 2);
        assert!(meta["generated_at"].is_string());
    }
}
