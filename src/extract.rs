//! Record extraction from document text.
//!
//! A single compiled grammar is applied once, left to right, over the whole
//! concatenated text. Each match yields one record; text that does not fit
//! the grammar is ignored.

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ReconConfig;
use crate::document::DocumentText;
use crate::error::{ReconResult, SchemaError};
use crate::record::{ExtractedRecord, RECORD_COLUMNS};
use crate::table::Table;

/// Identifier, owner, address and dollar amount, separated by whitespace.
///
/// The owner and address groups are lazy so a match never runs on into the
/// next record's fields.
pub const DEFAULT_RECORD_GRAMMAR: &str =
    r"(\d{3}-\d{3}(?:-\d{3})?)\s+(.+?)\s+(\d{1,5}\s[\w\s\.\'\-]+?)\s+\$(\d{1,3}(?:,\d{3})*(?:\.\d{2}))";

/// Name given to the extracted-records table.
pub const RECORDS_TABLE: &str = "records";

/// Compiled record grammar.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    pattern: Regex,
}

impl RecordExtractor {
    /// Compiles a grammar. It must have one capture group per record field.
    pub fn new(grammar: &str) -> ReconResult<Self> {
        let pattern = Regex::new(grammar)?;
        // captures_len counts the implicit whole-match group.
        let groups = pattern.captures_len() - 1;
        if groups != RECORD_COLUMNS.len() {
            return Err(SchemaError::GrammarGroups {
                expected: RECORD_COLUMNS.len(),
                actual: groups,
            }
            .into());
        }
        Ok(Self { pattern })
    }

    /// Compiles the grammar named by the configuration.
    pub fn from_config(config: &ReconConfig) -> ReconResult<Self> {
        Self::new(&config.pattern_grammar)
    }

    /// Returns every record in `text`, in the order they were found.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<ExtractedRecord> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let field = |i: usize| caps.get(i).map(|m| m.as_str());
                Some(ExtractedRecord::new(field(1)?, field(2)?, field(3)?, field(4)?))
            })
            .collect()
    }

    /// Extracts records from an assembled document and reports what was read.
    #[must_use]
    pub fn extract_document(&self, document: &DocumentText) -> ExtractionReport {
        let records = self.extract(document.as_str());
        let report = ExtractionReport {
            records,
            segments_read: document.segments_read(),
            segments_skipped: document.segments_skipped(),
        };
        match report.outcome() {
            ExtractionOutcome::Records { count } => info!(
                records = count,
                segments_skipped = report.segments_skipped,
                "extracted records"
            ),
            ExtractionOutcome::NoRecordsFound => warn!(
                segments_read = report.segments_read,
                segments_skipped = report.segments_skipped,
                "no records found in document text"
            ),
        }
        report
    }
}

/// Whether extraction found anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// At least one record was recognized.
    Records {
        /// Number of records.
        count: usize,
    },
    /// The grammar matched nothing. Not an error; the caller decides.
    NoRecordsFound,
}

/// Records recognized in one document plus segment bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Records in discovery order.
    pub records: Vec<ExtractedRecord>,
    /// Segments that contributed text.
    pub segments_read: usize,
    /// Segments skipped as unreadable.
    pub segments_skipped: usize,
}

impl ExtractionReport {
    /// Returns the outcome of the run.
    #[must_use]
    pub fn outcome(&self) -> ExtractionOutcome {
        if self.records.is_empty() {
            ExtractionOutcome::NoRecordsFound
        } else {
            ExtractionOutcome::Records {
                count: self.records.len(),
            }
        }
    }

    /// Builds the four-column records table, or `None` when nothing was found.
    #[must_use]
    pub fn to_table(&self) -> Option<Table> {
        if self.records.is_empty() {
            return None;
        }
        Some(Table::from_records(RECORDS_TABLE, &self.records))
    }
}
