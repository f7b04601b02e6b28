//! Extracted sale records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column holding the land-tax identifier.
pub const LAND_TAX_COLUMN: &str = "Land Tax #";
/// Column holding the owner name.
pub const OWNER_COLUMN: &str = "Owner";
/// Column holding the free-text street address.
pub const ADDRESS_COLUMN: &str = "Address";
/// Column holding the amount owed, without the currency symbol.
pub const TOTAL_OWED_COLUMN: &str = "Total Owed";

/// Columns of the extracted-records table, in order.
pub const RECORD_COLUMNS: [&str; 4] = [LAND_TAX_COLUMN, OWNER_COLUMN, ADDRESS_COLUMN, TOTAL_OWED_COLUMN];

/// One land-tax sale entry recognized in the document text.
///
/// All four fields are always present. Records are never modified after
/// extraction, so only read accessors are exposed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedRecord {
    #[serde(rename = "Land Tax #")]
    land_tax_id: String,
    #[serde(rename = "Owner")]
    owner: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Total Owed")]
    total_owed: String,
}

impl ExtractedRecord {
    /// Creates a record from its four fields.
    #[must_use]
    pub fn new(
        land_tax_id: impl Into<String>,
        owner: impl Into<String>,
        address: impl Into<String>,
        total_owed: impl Into<String>,
    ) -> Self {
        Self {
            land_tax_id: land_tax_id.into(),
            owner: owner.into(),
            address: address.into(),
            total_owed: total_owed.into(),
        }
    }

    /// Identifier such as `123-456` or `123-456-789`.
    #[must_use]
    pub fn land_tax_id(&self) -> &str {
        &self.land_tax_id
    }

    /// Owner name as printed.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Street address as printed.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Amount owed, e.g. `1,234.56`.
    #[must_use]
    pub fn total_owed(&self) -> &str {
        &self.total_owed
    }

    /// Field values in `RECORD_COLUMNS` order.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.land_tax_id.clone(),
            self.owner.clone(),
            self.address.clone(),
            self.total_owed.clone(),
        ]
    }
}

impl fmt::Display for ExtractedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ${}",
            self.land_tax_id, self.owner, self.address, self.total_owed
        )
    }
}
