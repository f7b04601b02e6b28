//! Run configuration.
//!
//! Every stage entry point takes a `ReconConfig` explicitly; nothing in the
//! crate reads global state. Configurations can be built in code or loaded
//! from JSON, and are validated before any stage uses them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReconResult, ValidationError};
use crate::extract::DEFAULT_RECORD_GRAMMAR;
use crate::record::ADDRESS_COLUMN;
use crate::scoring::ScorerKind;

/// Default minimum score (0–100) for a match to be accepted.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 25.0;

/// Default canonical-address column of the parcel address layer.
pub const DEFAULT_REFERENCE_ADDRESS_COLUMN: &str = "SITEADDR";

/// Suffix appended to gazetteer columns that collide with linked columns.
pub const DEFAULT_COLLISION_SUFFIX: &str = "_ref";

/// Configuration shared by the extraction and resolution stages.
///
/// # Examples
///
/// ```
/// use parcelink::{ReconConfig, ScorerKind};
///
/// let config = ReconConfig::from_json_str(r#"{ "source_identifier": "232", "acceptance_threshold": 60 }"#)?;
/// assert_eq!(config.source_identifier, "232");
/// assert_eq!(config.scorer, ScorerKind::TokenSortRatio);
/// # Ok::<(), parcelink::ReconError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Identifier of the published document (the sale number).
    pub source_identifier: String,
    /// Regular expression with four capture groups, one per record field.
    pub pattern_grammar: String,
    /// Similarity scorer used by the resolver.
    pub scorer: ScorerKind,
    /// Minimum best score for a match to be accepted.
    pub acceptance_threshold: f64,
    /// Free-text address column of the record table.
    pub address_column: String,
    /// Canonical address column of the gazetteer.
    pub reference_address_column: String,
    /// Suffix for gazetteer columns whose names are already taken.
    pub collision_suffix: String,
    /// Number of resolver worker threads; 1 resolves sequentially.
    pub workers: usize,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            source_identifier: "231".to_string(),
            pattern_grammar: DEFAULT_RECORD_GRAMMAR.to_string(),
            scorer: ScorerKind::default(),
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            address_column: ADDRESS_COLUMN.to_string(),
            reference_address_column: DEFAULT_REFERENCE_ADDRESS_COLUMN.to_string(),
            collision_suffix: DEFAULT_COLLISION_SUFFIX.to_string(),
            workers: 1,
        }
    }
}

impl ReconConfig {
    /// Creates the default configuration for a given sale number.
    #[must_use]
    pub fn for_source(source_identifier: impl Into<String>) -> Self {
        Self {
            source_identifier: source_identifier.into(),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> ReconResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ReconResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Checks value ranges and required names.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=100.0).contains(&self.acceptance_threshold) {
            return Err(ValidationError::ThresholdOutOfRange {
                value: self.acceptance_threshold,
            });
        }
        for (field, value) in [
            ("source_identifier", &self.source_identifier),
            ("pattern_grammar", &self.pattern_grammar),
            ("address_column", &self.address_column),
            ("reference_address_column", &self.reference_address_column),
            ("collision_suffix", &self.collision_suffix),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    field: field.to_string(),
                });
            }
        }
        if self.workers == 0 {
            return Err(ValidationError::NoWorkers);
        }
        Ok(())
    }

    /// File names of the artifacts produced for this source.
    #[must_use]
    pub fn artifacts(&self) -> ArtifactNames {
        ArtifactNames::for_source(&self.source_identifier)
    }
}

/// File names derived from the source identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    /// Name of the published document this run is about.
    pub source_document: String,
    /// Extracted records table.
    pub records: String,
    /// Full linked table.
    pub linked: String,
    /// Rows flagged for manual review.
    pub low_confidence: String,
}

impl ArtifactNames {
    /// Derives artifact names for a sale number.
    #[must_use]
    pub fn for_source(id: &str) -> Self {
        Self {
            source_document: format!("Sale-List-{id}.pdf"),
            records: format!("property_tax_sale_{id}.csv"),
            linked: format!("matched_addresses_{id}.csv"),
            low_confidence: format!("imperfect_matches_{id}.csv"),
        }
    }
}
