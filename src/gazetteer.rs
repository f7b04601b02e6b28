//! Reference address gazetteer.
//!
//! The gazetteer is the read-only set of canonical parcel addresses that
//! free-text addresses are matched against. Each entry carries the full row
//! of the source layer as an opaque attribute bag.

use std::collections::HashMap;

use tracing::info;

use crate::error::SchemaError;
use crate::table::Table;

/// Name given to gazetteer tables in diagnostics.
pub const GAZETTEER_TABLE: &str = "gazetteer";

/// One canonical address and its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceAddress {
    address: String,
    attributes: Vec<String>,
}

impl ReferenceAddress {
    /// Canonical address string.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// All attribute values, aligned with `Gazetteer::columns`.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

/// Canonical addresses with unique address strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gazetteer {
    address_column: String,
    columns: Vec<String>,
    entries: Vec<ReferenceAddress>,
    by_address: HashMap<String, usize>,
}

impl Gazetteer {
    /// Builds a gazetteer from a table, keyed by `address_column`.
    ///
    /// Every column of the table, the address column included, becomes part
    /// of each entry's attributes. Duplicate canonical addresses are rejected
    /// so that joining attributes can never fan out.
    pub fn from_table(table: Table, address_column: &str) -> Result<Self, SchemaError> {
        let idx = table.require_column(address_column)?;
        let columns = table.headers().to_vec();

        let mut entries = Vec::with_capacity(table.len());
        let mut by_address = HashMap::with_capacity(table.len());
        for row in table.rows() {
            let address = row[idx].clone();
            if by_address.insert(address.clone(), entries.len()).is_some() {
                let count = table.rows().iter().filter(|r| r[idx] == address).count();
                return Err(SchemaError::DuplicateReferenceAddress { address, count });
            }
            entries.push(ReferenceAddress {
                address,
                attributes: row.clone(),
            });
        }

        info!(
            entries = entries.len(),
            columns = columns.len(),
            address_column,
            "loaded gazetteer"
        );
        Ok(Self {
            address_column: address_column.to_string(),
            columns,
            entries,
            by_address,
        })
    }

    /// Builds an attribute-free gazetteer from bare address strings.
    pub fn from_addresses<I, S>(address_column: &str, addresses: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Table::new(GAZETTEER_TABLE, [address_column]);
        for address in addresses {
            table.push_row(vec![address.into()])?;
        }
        Self::from_table(table, address_column)
    }

    /// Column holding the canonical address.
    #[must_use]
    pub fn address_column(&self) -> &str {
        &self.address_column
    }

    /// Attribute column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Entries in source order.
    #[must_use]
    pub fn entries(&self) -> &[ReferenceAddress] {
        &self.entries
    }

    /// Looks up an entry by its exact canonical address.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<&ReferenceAddress> {
        self.by_address.get(address).map(|&i| &self.entries[i])
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcels() -> Table {
        let mut t = Table::new(GAZETTEER_TABLE, ["HANDLE", "SITEADDR", "ZIP"]);
        t.push_row(vec!["1001".into(), "4120 LEE AVE".into(), "63115".into()]).unwrap();
        t.push_row(vec!["1002".into(), "33 N GRAND BLVD".into(), "63103".into()]).unwrap();
        t
    }

    #[test]
    fn test_from_table_keeps_attributes() {
        let g = Gazetteer::from_table(parcels(), "SITEADDR").unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.columns(), ["HANDLE", "SITEADDR", "ZIP"]);
        let entry = g.get("33 N GRAND BLVD").unwrap();
        assert_eq!(entry.attributes(), ["1002", "33 N GRAND BLVD", "63103"]);
    }

    #[test]
    fn test_missing_address_column() {
        let err = Gazetteer::from_table(parcels(), "ADDR").unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn { ref column, .. } if column == "ADDR"));
    }

    #[test]
    fn test_duplicate_address_rejected() {
        let mut t = parcels();
        t.push_row(vec!["1003".into(), "4120 LEE AVE".into(), "63115".into()]).unwrap();
        let err = Gazetteer::from_table(t, "SITEADDR").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateReferenceAddress { ref address, count: 2 } if address == "4120 LEE AVE"
        ));
    }

    #[test]
    fn test_empty_gazetteer_allowed() {
        let g = Gazetteer::from_addresses("SITEADDR", Vec::<String>::new()).unwrap();
        assert!(g.is_empty());
        assert!(g.get("anything").is_none());
    }
}
