//! Stage entry points.
//!
//! Each stage validates its configuration, runs, writes its CSV artifacts
//! and returns a summary. Any failure comes back as a `StageError` naming
//! the stage, so a caller can skip the run without losing the diagnostic.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ReconConfig;
use crate::document::DocumentText;
use crate::error::{ReconResult, Stage, StageError};
use crate::extract::{ExtractionOutcome, RecordExtractor, RECORDS_TABLE};
use crate::gazetteer::{Gazetteer, GAZETTEER_TABLE};
use crate::resolve::{AddressResolver, Resolution};
use crate::table::Table;

/// What the extraction stage did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    /// Whether any record was found.
    pub outcome: ExtractionOutcome,
    /// Number of records written.
    pub records: usize,
    /// Segments that contributed text.
    pub segments_read: usize,
    /// Segments skipped as unreadable.
    pub segments_skipped: usize,
    /// Records CSV, when one was written.
    pub output: Option<PathBuf>,
    /// When the stage finished.
    pub completed_at: DateTime<Utc>,
}

/// What the resolution stage did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionSummary {
    /// Rows in the linked table.
    pub rows: usize,
    /// Rows that received a canonical address.
    pub matched: usize,
    /// Rows left as "no match".
    pub unmatched: usize,
    /// Rows scoring below 100.
    pub low_confidence: usize,
    /// Linked table CSV.
    pub linked_output: PathBuf,
    /// Low-confidence subset CSV.
    pub low_confidence_output: PathBuf,
    /// When the stage finished.
    pub completed_at: DateTime<Utc>,
}

/// Extracts records from assembled text and writes the records CSV.
///
/// Finding no records is reported through the summary; no file is written.
pub fn run_extraction(
    config: &ReconConfig,
    document: &DocumentText,
    out_dir: impl AsRef<Path>,
) -> Result<ExtractionSummary, StageError> {
    extraction(config, document, out_dir.as_ref()).map_err(|e| StageError::new(Stage::Extraction, e))
}

/// Reads a page-text dump from disk, then runs `run_extraction`.
pub fn extract_file(
    config: &ReconConfig,
    source: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> Result<ExtractionSummary, StageError> {
    let document = DocumentText::read(source).map_err(|e| StageError::new(Stage::Extraction, e))?;
    run_extraction(config, &document, out_dir)
}

fn extraction(config: &ReconConfig, document: &DocumentText, out_dir: &Path) -> ReconResult<ExtractionSummary> {
    config.validate()?;
    let extractor = RecordExtractor::from_config(config)?;
    let report = extractor.extract_document(document);

    let output = match report.to_table() {
        Some(table) => {
            let path = out_dir.join(config.artifacts().records);
            table.write_csv(&path)?;
            info!(path = %path.display(), rows = table.len(), "wrote records");
            Some(path)
        }
        None => None,
    };

    Ok(ExtractionSummary {
        outcome: report.outcome(),
        records: report.records.len(),
        segments_read: report.segments_read,
        segments_skipped: report.segments_skipped,
        output,
        completed_at: Utc::now(),
    })
}

/// Links a records CSV to a gazetteer CSV and writes both output tables.
///
/// Both tables are loaded and their schemas checked before any matching.
pub fn run_resolution(
    config: &ReconConfig,
    records_csv: impl AsRef<Path>,
    gazetteer_csv: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> Result<ResolutionSummary, StageError> {
    resolution(config, records_csv.as_ref(), gazetteer_csv.as_ref(), out_dir.as_ref())
        .map_err(|e| StageError::new(Stage::Resolution, e))
}

fn resolution(
    config: &ReconConfig,
    records_csv: &Path,
    gazetteer_csv: &Path,
    out_dir: &Path,
) -> ReconResult<ResolutionSummary> {
    config.validate()?;
    let records = Table::read_csv(RECORDS_TABLE, records_csv)?;
    records.require_column(&config.address_column)?;
    let gazetteer = Gazetteer::from_table(
        Table::read_csv(GAZETTEER_TABLE, gazetteer_csv)?,
        &config.reference_address_column,
    )?;

    let resolution = resolve_records(config, &records, &gazetteer)?;

    let names = config.artifacts();
    let linked_output = out_dir.join(names.linked);
    resolution.linked.table().write_csv(&linked_output)?;
    info!(path = %linked_output.display(), rows = resolution.linked.len(), "wrote linked table");

    let low_confidence_output = out_dir.join(names.low_confidence);
    resolution.low_confidence.table().write_csv(&low_confidence_output)?;
    info!(
        path = %low_confidence_output.display(),
        rows = resolution.low_confidence.len(),
        "wrote low-confidence matches"
    );

    Ok(ResolutionSummary {
        rows: resolution.linked.len(),
        matched: resolution.matched,
        unmatched: resolution.unmatched(),
        low_confidence: resolution.low_confidence.len(),
        linked_output,
        low_confidence_output,
        completed_at: Utc::now(),
    })
}

/// Resolves an in-memory records table with the configured scorer and threshold.
pub fn resolve_records(config: &ReconConfig, records: &Table, gazetteer: &Gazetteer) -> ReconResult<Resolution> {
    config.validate()?;
    if gazetteer.is_empty() {
        warn!("gazetteer is empty; every address will be unmatched");
    }
    AddressResolver::from_config(config).link(
        records,
        &config.address_column,
        gazetteer,
        &config.collision_suffix,
    )
}
