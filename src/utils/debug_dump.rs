// src/utils/debug_dump.rs
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::extractors::EntityBlock;
use crate::extractors::SectionLocator;
use crate::utils::error::AppError;

/// Wraps each highlighted byte range in `[[kind>>` ... `<<kind]]` markers.
/// Overlapping ranges after the first are dropped.
pub fn annotate(text: &str, highlights: &[(usize, usize, &str)]) -> String {
    let mut sorted = highlights.to_vec();
    sorted.sort_by_key(|h| h.0);

    let mut out = String::with_capacity(text.len() + highlights.len() * 16);
    let mut last_pos = 0;
    for (start, end, kind) in sorted {
        if start < last_pos || end > text.len() {
            continue;
        }
        out.push_str(&text[last_pos..start]);
        out.push_str(&format!("[[{}>>", kind));
        out.push_str(&text[start..end]);
        out.push_str(&format!("<<{}]]", kind));
        last_pos = end;
    }
    out.push_str(&text[last_pos..]);
    out
}

/// Saves a copy of the document with every match of the given patterns marked.
pub fn create_annotated_document(text: &str, filename: &Path, patterns: &[(&str, &str)]) -> Result<(), AppError> {
    let mut highlights = Vec::new();
    for (pattern, kind) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;
        highlights.extend(re.find_iter(text).map(|m| (m.start(), m.end(), *kind)));
    }

    fs::write(filename, annotate(text, &highlights))?;
    tracing::info!("Saved annotated document to {}", filename.display());
    Ok(())
}

/// Writes one file per block with the text the row extractor will see marked.
pub fn save_block_sections(blocks: &[EntityBlock], locator: &SectionLocator, dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dir)?;
    for block in blocks {
        let section = locator.locate(&block.text);
        let kind = match section.source {
            crate::extractors::SectionSource::HeadFallback => "fallback",
            _ => "section",
        };
        let path = dir.join(format!("block_{:03}.txt", block.index));
        fs::write(&path, annotate(&block.text, &[(section.start, section.end, kind)]))?;
        tracing::debug!("Saved block #{} debug view to {}", block.index, path.display());
    }
    Ok(())
}
