//! Page-concatenated document text.
//!
//! The document itself is decoded by an external tool; this module only
//! assembles the text of its pages (segments) in order, skipping any page
//! whose text could not be recovered.

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::InputError;

/// Page separator emitted by common PDF-to-text converters.
pub const PAGE_SEPARATOR: u8 = 0x0c;

/// Concatenated text of every readable segment, in segment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText {
    text: String,
    segments_read: usize,
    segments_skipped: usize,
}

impl DocumentText {
    /// Wraps text that is already assembled as a single segment.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            segments_read: 1,
            segments_skipped: 0,
        }
    }

    /// Concatenates segments, skipping those that failed to decode.
    ///
    /// Fails only when there was at least one segment and none was readable.
    pub fn from_segments<I, E>(segments: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = Result<String, E>>,
        E: fmt::Display,
    {
        let mut doc = Self::default();
        for (idx, segment) in segments.into_iter().enumerate() {
            match segment {
                Ok(text) => {
                    doc.text.push_str(&text);
                    doc.segments_read += 1;
                }
                Err(err) => {
                    warn!(segment = idx + 1, error = %err, "skipping unreadable segment");
                    doc.segments_skipped += 1;
                }
            }
        }

        if doc.segments_read == 0 && doc.segments_skipped > 0 {
            return Err(InputError::NoReadableSegments {
                total: doc.segments_skipped,
            });
        }
        debug!(
            read = doc.segments_read,
            skipped = doc.segments_skipped,
            chars = doc.text.len(),
            "assembled document text"
        );
        Ok(doc)
    }

    /// Splits a page-text dump on form feeds and decodes each page as UTF-8.
    ///
    /// A trailing separator does not start an extra page.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InputError> {
        let body = bytes.strip_suffix(&[PAGE_SEPARATOR]).unwrap_or(bytes);
        if body.is_empty() {
            return Ok(Self::default());
        }
        Self::from_segments(
            body.split(|b| *b == PAGE_SEPARATOR)
                .map(|page| String::from_utf8(page.to_vec())),
        )
    }

    /// Reads a page-text dump from disk.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| InputError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// The concatenated text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of segments whose text was used.
    #[must_use]
    pub const fn segments_read(&self) -> usize {
        self.segments_read
    }

    /// Number of segments skipped because they could not be decoded.
    #[must_use]
    pub const fn segments_skipped(&self) -> usize {
        self.segments_skipped
    }
}

impl AsRef<str> for DocumentText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
