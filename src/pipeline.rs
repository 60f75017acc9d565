// src/pipeline.rs
use rayon::prelude::*;

use crate::aggregate::{analyze, Analysis, EntityRecordSet};
use crate::config::ExtractionConfig;
use crate::extractors::{extract_rows, BlockSegmenter, EntityBlock, SectionLocator};
use crate::utils::AppError;

/// Blocks and the records recovered from each, index-aligned.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub blocks: Vec<EntityBlock>,
    pub record_sets: Vec<EntityRecordSet>,
}

/// Segment -> locate section -> extract rows, then aggregate.
/// Holds only compiled patterns and config, so runs don't affect each other.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ExtractionConfig,
    segmenter: BlockSegmenter,
    locator: SectionLocator,
}

impl Pipeline {
    pub fn new(config: ExtractionConfig) -> Result<Self, AppError> {
        config.validate()?;
        let segmenter = BlockSegmenter::new(&config.block_delimiter)?;
        let locator = SectionLocator::new(
            &config.section_start,
            &config.section_end,
            config.truncation_fallback_length,
        )?;
        Ok(Self { config, segmenter, locator })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &BlockSegmenter {
        &self.segmenter
    }

    pub fn locator(&self) -> &SectionLocator {
        &self.locator
    }

    pub fn process_block(&self, block: &EntityBlock) -> EntityRecordSet {
        let section = self.locator.locate(&block.text);
        EntityRecordSet {
            index: block.index,
            section_source: section.source,
            records: extract_rows(section.text, self.config.line_truncation_length),
        }
    }

    pub fn extract(&self, text: &str) -> Extraction {
        let blocks = self.segmenter.split(text);
        tracing::info!("Found {} app blocks (by '{}' split).", blocks.len(), self.config.block_delimiter);

        // par_iter().collect() keeps block order
        let record_sets: Vec<EntityRecordSet> = if self.config.parallel {
            blocks.par_iter().map(|b| self.process_block(b)).collect()
        } else {
            blocks.iter().map(|b| self.process_block(b)).collect()
        };

        for set in &record_sets {
            tracing::info!(
                "App #{} - parsed rows: {}  (rows with IVT: {}, section: {:?})",
                set.index,
                set.parsed_rows(),
                set.metric_rows(),
                set.section_source
            );
        }

        Extraction { blocks, record_sets }
    }

    pub fn analyze(&self, extraction: &Extraction) -> Analysis {
        analyze(&extraction.record_sets, self.config.ivt_threshold)
    }

    /// Full run over one document.
    pub fn run(&self, text: &str) -> Analysis {
        let extraction = self.extract(text);
        self.analyze(&extraction)
    }
}
