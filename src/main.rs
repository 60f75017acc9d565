// src/main.rs
use std::path::PathBuf;

use clap::Parser;
use ivt_extractor::report::{observation_lines, ReportWriter};
use ivt_extractor::utils::{self, debug_dump, AppError};
use ivt_extractor::{ExtractionConfig, Pipeline};

/// Command Line Interface for the IVT report extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Plain text already extracted from the source report
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for summaries, series and observations
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// JSON file with extraction options (camelCase keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Heading separating one app from the next
    #[arg(long)]
    delimiter: Option<String>,

    /// Phrase opening the daily section
    #[arg(long)]
    section_start: Option<String>,

    /// Phrase closing the daily section
    #[arg(long)]
    section_end: Option<String>,

    /// IVT values above this are flagged
    #[arg(long)]
    threshold: Option<f64>,

    /// Process blocks one at a time instead of on the thread pool
    #[arg(long)]
    sequential: bool,

    /// Debug mode - save annotated text files for tuning marker phrases
    #[arg(short, long)]
    debug: bool,

    /// Reduce verbosity
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn extraction_config(&self) -> Result<ExtractionConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => ExtractionConfig::from_json_file(path)?,
            None => ExtractionConfig::default(),
        };
        if let Some(d) = &self.delimiter {
            config.block_delimiter = d.clone();
        }
        if let Some(s) = &self.section_start {
            config.section_start = s.clone();
        }
        if let Some(e) = &self.section_end {
            config.section_end = e.clone();
        }
        if let Some(t) = self.threshold {
            config.ivt_threshold = t;
        }
        if self.sequential {
            config.parallel = false;
        }
        Ok(config)
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    utils::logging::setup_logging(args.quiet);
    tracing::debug!("Starting processing for args: {:?}", args);

    // Fails fast on a bad config, before the input is touched
    let pipeline = Pipeline::new(args.extraction_config()?)?;

    if !args.input.exists() {
        return Err(AppError::Config(format!("Input file not found: {}", args.input.display())));
    }
    let text = std::fs::read_to_string(&args.input)?;
    tracing::info!("Read {} bytes from {}", text.len(), args.input.display());

    let extraction = pipeline.extract(&text);

    if args.debug {
        let debug_dir = args.output_dir.join("debug");
        std::fs::create_dir_all(&debug_dir)?;
        let patterns = [(pipeline.segmenter().pattern(), "delimiter")];
        if let Err(e) = debug_dump::create_annotated_document(&text, &debug_dir.join("document_annotated.txt"), &patterns) {
            tracing::warn!("Failed to create annotated document: {}", e);
        }
        debug_dump::save_block_sections(&extraction.blocks, pipeline.locator(), &debug_dir)?;
    }

    let analysis = pipeline.analyze(&extraction);
    if !analysis.has_data() {
        tracing::warn!("No numeric IVT values were recovered from {}", args.input.display());
    }

    let lines = observation_lines(&analysis.summaries, pipeline.config().ivt_threshold);
    let writer = ReportWriter::new(&args.output_dir)?;
    writer.save_analysis(&analysis, &lines)?;

    let source_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    writer.save_metadata(&source_name, &analysis)?;

    tracing::info!(
        "Processing finished. Apps with IVT: {}, apps on combined date axis: {}",
        analysis.summaries.len(),
        analysis.combined.entities.len()
    );
    Ok(())
}
