//! # parcelink - land-tax sale records linked to parcel addresses
//!
//! parcelink turns the page text of a published land-tax sale list into
//! structured records and links each record's free-text street address to
//! the closest canonical address in a parcel gazetteer.
//!
//! ## Stages
//!
//! - **Extraction**: a single compiled grammar recognizes
//!   `identifier owner address $amount` runs in the concatenated page text.
//! - **Resolution**: every address is scored against every gazetteer entry
//!   (token-sort ratio by default); the best candidate at or above the
//!   acceptance threshold is accepted, and rows scoring below 100 are
//!   collected for manual review.
//!
//! ## Usage
//!
//! ```rust
//! use parcelink::{AddressResolver, DocumentText, Gazetteer, RecordExtractor, ReconConfig};
//!
//! let config = ReconConfig::default();
//! let extractor = RecordExtractor::from_config(&config)?;
//! let report = extractor.extract_document(&DocumentText::new(
//!     "123-456-789 JOHN DOE 456 Main St. $1,234.56",
//! ));
//! let records = report.to_table().expect("one record");
//!
//! let gazetteer = Gazetteer::from_addresses("SITEADDR", ["456 Main St.", "12 Elm St"])?;
//! let resolution = AddressResolver::from_config(&config)
//!     .link(&records, &config.address_column, &gazetteer, &config.collision_suffix)?;
//! assert_eq!(resolution.matched, 1);
//! assert!(resolution.low_confidence.is_empty());
//! # Ok::<(), parcelink::ReconError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod gazetteer;
pub mod pipeline;
pub mod record;
pub mod resolve;
pub mod scoring;
pub mod table;

// Re-export primary types at crate root for convenience
pub use config::{ArtifactNames, ReconConfig, DEFAULT_ACCEPTANCE_THRESHOLD};
pub use document::DocumentText;
pub use error::{
    InputError, ReconError, ReconResult, SchemaError, Stage, StageError, ValidationError,
};
pub use extract::{ExtractionOutcome, ExtractionReport, RecordExtractor, DEFAULT_RECORD_GRAMMAR};
pub use gazetteer::{Gazetteer, ReferenceAddress};
pub use pipeline::{
    extract_file, resolve_records, run_extraction, run_resolution, ExtractionSummary,
    ResolutionSummary,
};
pub use record::{ExtractedRecord, RECORD_COLUMNS};
pub use resolve::{AddressResolver, LinkedTable, MatchResult, Resolution, NO_CANDIDATE_SCORE};
pub use scoring::{ratio, token_sort_ratio, Scorer, ScorerKind, PERFECT_SCORE};
pub use table::Table;
