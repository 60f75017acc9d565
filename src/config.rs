// src/config.rs
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::AppError;

pub const DEFAULT_BLOCK_DELIMITER: &str = "Total Data";
pub const DEFAULT_SECTION_START: &str = "Daily Data";
pub const DEFAULT_SECTION_END: &str = "Hourly Data";
pub const DEFAULT_TRUNCATION_FALLBACK_LENGTH: usize = 5000;
pub const DEFAULT_LINE_TRUNCATION_LENGTH: usize = 40;
pub const DEFAULT_IVT_THRESHOLD: f64 = 0.5;

/// Options driving one extraction run.
///
/// Keys are camelCase in JSON; any key left out takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionConfig {
    /// Heading (on its own line) separating one entity from the next.
    pub block_delimiter: String,
    /// Phrase opening the section rows are read from.
    pub section_start: String,
    /// Phrase closing that section.
    pub section_end: String,
    /// Characters of block head to scan when the section markers are missing.
    pub truncation_fallback_length: usize,
    /// Characters kept for the label of a line with no date.
    pub line_truncation_length: usize,
    /// Metric values strictly above this set the "high value" flag.
    pub ivt_threshold: f64,
    /// Process blocks on the rayon pool. Results are identical either way.
    pub parallel: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            block_delimiter: DEFAULT_BLOCK_DELIMITER.to_string(),
            section_start: DEFAULT_SECTION_START.to_string(),
            section_end: DEFAULT_SECTION_END.to_string(),
            truncation_fallback_length: DEFAULT_TRUNCATION_FALLBACK_LENGTH,
            line_truncation_length: DEFAULT_LINE_TRUNCATION_LENGTH,
            ivt_threshold: DEFAULT_IVT_THRESHOLD,
            parallel: true,
        }
    }
}

impl ExtractionConfig {
    /// Loads a config from a JSON file. The result is not validated yet.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded extraction config from {}", path.display());
        Ok(config)
    }

    /// Rejects configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, phrase) in [
            ("blockDelimiter", &self.block_delimiter),
            ("sectionStart", &self.section_start),
            ("sectionEnd", &self.section_end),
        ] {
            if phrase.trim().is_empty() {
                return Err(AppError::Config(format!("{} must not be empty", name)));
            }
        }

        if self.line_truncation_length == 0 {
            return Err(AppError::Config("lineTruncationLength must be greater than zero".to_string()));
        }

        if !self.ivt_threshold.is_finite() {
            return Err(AppError::Config(format!("ivtThreshold must be finite, got {}", self.ivt_threshold)));
        }

        Ok(())
    }
}
