// src/extractors/blocks.rs
use regex::Regex;
use serde::Serialize;

use crate::utils::error::AppError;

/// Text belonging to one entity, numbered from 1 in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityBlock {
    pub index: usize,
    pub text: String,
}

/// Splits a document into entity blocks on a heading that sits alone on its line.
#[derive(Debug, Clone)]
pub struct BlockSegmenter {
    delimiter_re: Regex,
}

impl BlockSegmenter {
    pub fn new(delimiter: &str) -> Result<Self, AppError> {
        let phrase = delimiter.trim();
        if phrase.is_empty() {
            return Err(AppError::Config("Block delimiter must not be empty".to_string()));
        }

        // Whole line: optional padding, the phrase, optional padding, end of line.
        let pattern = format!(r"(?im)^[ \t]*{}[ \t\r]*$\n?", regex::escape(phrase));
        let delimiter_re = Regex::new(&pattern).map_err(|e| {
            AppError::Config(format!("Invalid block delimiter '{}': {}", phrase, e))
        })?;

        Ok(Self { delimiter_re })
    }

    /// The compiled delimiter pattern, for tools that need to find the same lines.
    pub fn pattern(&self) -> &str {
        self.delimiter_re.as_str()
    }

    /// Text before the first delimiter is treated as the document header and dropped.
    /// No delimiter at all yields the whole document as a single block,
    /// so only an empty string produces no blocks.
    pub fn split(&self, text: &str) -> Vec<EntityBlock> {
        if text.is_empty() {
            return Vec::new();
        }

        let bounds: Vec<(usize, usize)> = self
            .delimiter_re
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();

        if bounds.is_empty() {
            tracing::debug!("Block delimiter not found, using whole document as one block");
            return vec![EntityBlock { index: 1, text: text.to_string() }];
        }

        bounds
            .iter()
            .enumerate()
            .map(|(i, &(_, body_start))| {
                let body_end = bounds.get(i + 1).map(|&(next_start, _)| next_start).unwrap_or(text.len());
                EntityBlock {
                    index: i + 1,
                    text: text[body_start..body_end].to_string(),
                }
            })
            .collect()
    }
}
