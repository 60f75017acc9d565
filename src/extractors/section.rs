// src/extractors/section.rs

// --- Imports ---
use crate::utils::error::AppError;
use regex::Regex;

// --- Data Structures ---

/// How the text handed to the row extractor was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionSource {
    /// Bounded by both start and end markers.
    Bounded,
    /// Start marker found, no end marker after it.
    Unbounded,
    /// Start marker missing or nothing between the markers; head of the block used instead.
    HeadFallback,
}

/// The part of a block that rows are read from, with its byte range in the block.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedSection<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub source: SectionSource,
}

// --- Locator ---

/// Finds the region between a start and an end marker inside one block.
#[derive(Debug, Clone)]
pub struct SectionLocator {
    start_re: Regex,
    end_re: Regex,
    fallback_length: usize,
}

impl SectionLocator {
    pub fn new(start_marker: &str, end_marker: &str, fallback_length: usize) -> Result<Self, AppError> {
        Ok(Self {
            start_re: marker_regex("section start", start_marker)?,
            end_re: marker_regex("section end", end_marker)?,
            fallback_length,
        })
    }

    /// Byte range strictly between the first start marker and the first end marker after it.
    /// No end marker means everything after the start. No start marker means `None`.
    pub fn find_bounds(&self, block: &str) -> Option<(usize, usize, SectionSource)> {
        let start = self.start_re.find(block)?.end();
        match self.end_re.find(&block[start..]) {
            Some(end) => Some((start, start + end.start(), SectionSource::Bounded)),
            None => Some((start, block.len(), SectionSource::Unbounded)),
        }
    }

    /// Section text, or an empty string when the start marker is absent.
    pub fn find_section<'a>(&self, block: &'a str) -> &'a str {
        match self.find_bounds(block) {
            Some((start, end, _)) => &block[start..end],
            None => "",
        }
    }

    /// Like `find_section`, but an empty result is replaced with the head of the block
    /// so lines can still be attempted.
    pub fn locate<'a>(&self, block: &'a str) -> LocatedSection<'a> {
        if let Some((start, end, source)) = self.find_bounds(block) {
            // Whitespace between the markers is still a section; it just has no rows.
            if start < end {
                return LocatedSection { text: &block[start..end], start, end, source };
            }
        }

        let end = head_boundary(block, self.fallback_length);
        tracing::debug!("Section markers not usable, falling back to first {} bytes of block", end);
        LocatedSection {
            text: &block[..end],
            start: 0,
            end,
            source: SectionSource::HeadFallback,
        }
    }
}

fn marker_regex(what: &str, marker: &str) -> Result<Regex, AppError> {
    let phrase = marker.trim();
    if phrase.is_empty() {
        return Err(AppError::Config(format!("The {} marker must not be empty", what)));
    }
    // Inner whitespace may be any run of spaces or line breaks.
    let pattern = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!("(?i){}", pattern))
        .map_err(|e| AppError::Config(format!("Invalid {} marker '{}': {}", what, phrase, e)))
}

/// Byte offset after the first `max_chars` characters.
fn head_boundary(text: &str, max_chars: usize) -> usize {
    text.char_indices().nth(max_chars).map(|(i, _)| i).unwrap_or(text.len())
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn locator(fallback: usize) -> SectionLocator {
        SectionLocator::new("Daily Data", "Hourly Data", fallback).unwrap()
    }

    #[test]
    fn test_bounded_section() {
        let block = "App A\nDaily Data\n2025-09-12 0.1\n2025-09-13 0.2\nHourly Data\n2025-09-12 01:00:00 9\n";
        let section = locator(100).find_section(block);
        assert!(section.contains("2025-09-12 0.1"));
        assert!(section.contains("2025-09-13 0.2"));
        assert!(!section.contains("Hourly"));
        assert!(!section.contains("01:00:00"));
    }

    #[test]
    fn test_markers_are_case_insensitive_and_span_lines() {
        let block = "daily\ndata\nrow 1\nHOURLY DATA\nrow 2";
        let section = locator(100).find_section(block);
        assert_eq!(section.trim(), "row 1");
    }

    #[test]
    fn test_missing_end_marker_takes_rest() {
        let block = "Daily Data\nrow 1\nrow 2";
        let located = locator(100).locate(block);
        assert_eq!(located.text, "\nrow 1\nrow 2");
        assert_eq!(located.source, SectionSource::Unbounded);
        assert_eq!(located.end, block.len());
    }

    #[test]
    fn test_end_before_start_is_ignored() {
        let block = "Hourly Data\nx\nDaily Data\nrow\nHourly Data\ny";
        assert_eq!(locator(100).find_section(block).trim(), "row");
    }

    #[test]
    fn test_missing_start_is_empty_and_falls_back_to_head() {
        let block = "no markers in this block at all";
        let locator = locator(10);
        assert_eq!(locator.find_section(block), "");

        let located = locator.locate(block);
        assert_eq!(located.text, "no markers");
        assert_eq!(located.source, SectionSource::HeadFallback);
    }

    #[test]
    fn test_blank_section_stays_bounded() {
        let block = "Daily Data\n\n   \n\nHourly Data\n2025-09-12 01:00:00 55 50 0.9\n";
        let located = locator(5000).locate(block);
        assert_eq!(located.source, SectionSource::Bounded);
        assert!(located.text.trim().is_empty());
        assert!(crate::extractors::extract_rows(located.text, 40).is_empty());
    }

    #[test]
    fn test_zero_length_section_falls_back_to_head() {
        let block = "Daily DataHourly Data\n2025-09-12 0.3";
        let located = locator(5000).locate(block);
        assert_eq!(located.text, block);
        assert_eq!(located.source, SectionSource::HeadFallback);
    }

    #[test]
    fn test_head_fallback_respects_char_boundaries() {
        let located = locator(2).locate("ééé");
        assert_eq!(located.text, "éé");
    }

    #[test]
    fn test_empty_marker_is_config_error() {
        assert!(matches!(SectionLocator::new("", "Hourly Data", 10), Err(AppError::Config(_))));
    }
}
