//! Error types for parcelink.
//!
//! All errors are strongly typed using thiserror, grouped by the
//! failure category they represent. Outcomes that are valid terminal
//! states (no records found, every address unmatched) are not errors;
//! they are reported through the stage summaries instead.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The source text could not be produced.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Source '{path}' is unavailable: {reason}")]
    SourceUnavailable {
        path: PathBuf,
        reason: String,
    },

    #[error("None of the {total} text segments could be read")]
    NoReadableSegments {
        total: usize,
    },
}

/// An input table does not have the shape the stage expects.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Table '{table}' has no column named '{column}'")]
    MissingColumn {
        table: String,
        column: String,
    },

    #[error("Reference address '{address}' appears {count} times; canonical addresses must be unique")]
    DuplicateReferenceAddress {
        address: String,
        count: usize,
    },

    #[error("Row {row} of table '{table}' has {actual} cells, expected {expected}")]
    RaggedRow {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Record grammar must have exactly {expected} capture groups, found {actual}")]
    GrammarGroups {
        expected: usize,
        actual: usize,
    },

    #[error("Cell '{value}' in column '{column}' (row {row}) is not a valid score")]
    InvalidScore {
        column: String,
        row: usize,
        value: String,
    },
}

/// Configuration values that fail validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Acceptance threshold {value} is out of range [0, 100]")]
    ThresholdOutOfRange {
        value: f64,
    },

    #[error("Field '{field}' cannot be empty")]
    EmptyField {
        field: String,
    },

    #[error("Worker count must be at least 1")]
    NoWorkers,
}

/// Top-level error type for parcelink.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl ReconError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the source input could not be produced.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// Returns true if an input table or grammar had the wrong shape.
    #[must_use]
    pub const fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Returns true if this is a configuration validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if the record grammar failed to compile.
    #[must_use]
    pub const fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for parcelink operations.
pub type ReconResult<T> = Result<T, ReconError>;

/// Pipeline stage that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Turning page text into records.
    Extraction,
    /// Linking record addresses to the gazetteer.
    Resolution,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraction => write!(f, "extraction"),
            Self::Resolution => write!(f, "resolution"),
        }
    }
}

/// A failure surfaced at a stage boundary.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    /// Stage that failed.
    pub stage: Stage,
    /// Underlying cause.
    #[source]
    pub source: ReconError,
}

impl StageError {
    /// Tags an error with the stage it came from.
    #[must_use]
    pub fn new(stage: Stage, source: impl Into<ReconError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_unavailable() {
        let err = InputError::SourceUnavailable {
            path: PathBuf::from("Sale-List-231.txt"),
            reason: "not found".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Sale-List-231.txt"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_schema_error_missing_column() {
        let err = SchemaError::MissingColumn {
            table: "records".to_string(),
            column: "Address".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("records"));
        assert!(msg.contains("'Address'"));
    }

    #[test]
    fn test_schema_error_duplicate_reference() {
        let err = SchemaError::DuplicateReferenceAddress {
            address: "1200 MARKET ST".to_string(),
            count: 3,
        };
        let msg = format!("{err}");
        assert!(msg.contains("1200 MARKET ST"));
        assert!(msg.contains("3 times"));
    }

    #[test]
    fn test_validation_error_threshold() {
        let err = ValidationError::ThresholdOutOfRange { value: 140.0 };
        assert!(format!("{err}").contains("140"));
    }

    #[test]
    fn test_recon_error_from_categories() {
        let err: ReconError = InputError::NoReadableSegments { total: 4 }.into();
        assert!(err.is_input());
        assert!(!err.is_schema());

        let err: ReconError = SchemaError::GrammarGroups { expected: 4, actual: 2 }.into();
        assert!(err.is_schema());

        let err: ReconError = ValidationError::NoWorkers.into();
        assert!(err.is_validation());
    }

    #[test]
    fn test_recon_error_from_regex() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: ReconError = regex_err.into();
        assert!(err.is_pattern());
        assert!(format!("{err}").starts_with("Pattern error"));
    }

    #[test]
    fn test_recon_error_internal() {
        let err = ReconError::internal("worker disconnected");
        assert!(err.is_internal());
        assert!(format!("{err}").contains("worker disconnected"));
    }

    #[test]
    fn test_stage_error_names_stage() {
        let err = StageError::new(
            Stage::Resolution,
            SchemaError::MissingColumn {
                table: "gazetteer".to_string(),
                column: "SITEADDR".to_string(),
            },
        );
        let msg = format!("{err}");
        assert!(msg.starts_with("resolution stage failed"));
        assert!(msg.contains("SITEADDR"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
