//! Flat string tables and their CSV form.
//!
//! Every table the crate reads or writes is a header row plus rows of
//! string cells. Rows always have exactly one cell per header.

use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{ReconResult, SchemaError};
use crate::record::{ExtractedRecord, RECORD_COLUMNS};

/// A named table of string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds the four-column records table.
    #[must_use]
    pub fn from_records(name: impl Into<String>, records: &[ExtractedRecord]) -> Self {
        let mut table = Self::new(name, RECORD_COLUMNS);
        table.rows = records.iter().map(ExtractedRecord::to_row).collect();
        table
    }

    /// Appends a row. The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), SchemaError> {
        if row.len() != self.headers.len() {
            return Err(SchemaError::RaggedRow {
                table: self.name.clone(),
                row: self.rows.len() + 1,
                expected: self.headers.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Table name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Position of a column, or a schema error naming the table.
    pub fn require_column(&self, column: &str) -> Result<usize, SchemaError> {
        self.column_index(column).ok_or_else(|| SchemaError::MissingColumn {
            table: self.name.clone(),
            column: column.to_string(),
        })
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, column: &str) -> Result<impl Iterator<Item = &str> + '_, SchemaError> {
        let idx = self.require_column(column)?;
        Ok(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Returns a table with the same columns holding only the selected rows.
    #[must_use]
    pub fn select_rows(&self, keep: impl Fn(usize) -> bool) -> Self {
        Self {
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(i, _)| keep(*i))
                .map(|(_, row)| row.clone())
                .collect(),
        }
    }

    /// Reads a CSV with a header row.
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> ReconResult<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut table = Self::new(name, reader.headers()?.iter());
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect())?;
        }
        debug!(table = %table.name, rows = table.len(), columns = table.headers.len(), "read table");
        Ok(table)
    }

    /// Reads a CSV file with a header row.
    pub fn read_csv(name: impl Into<String>, path: impl AsRef<Path>) -> ReconResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(name, file)
    }

    /// Writes the table as CSV with a header row.
    pub fn to_csv_writer<W: Write>(&self, writer: W) -> ReconResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the table to a CSV file, replacing any existing file.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> ReconResult<()> {
        let file = std::fs::File::create(path)?;
        self.to_csv_writer(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new("sample", ["Address", "Score"]);
        t.push_row(vec!["1 A St".into(), "100".into()]).unwrap();
        t.push_row(vec!["2 B St".into(), "87".into()]).unwrap();
        t
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut t = sample();
        let err = t.push_row(vec!["only one".into()]).unwrap_err();
        assert!(matches!(err, SchemaError::RaggedRow { row: 3, expected: 2, actual: 1, .. }));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_missing_column_names_table() {
        let err = sample().require_column("SITEADDR").unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn { ref table, .. } if table == "sample"));
    }

    #[test]
    fn test_column_values() {
        let t = sample();
        let values: Vec<&str> = t.column("Score").unwrap().collect();
        assert_eq!(values, vec!["100", "87"]);
    }

    #[test]
    fn test_select_rows_keeps_order() {
        let t = sample().select_rows(|i| i == 1);
        assert_eq!(t.rows(), &[vec!["2 B St".to_string(), "87".to_string()]]);
        assert_eq!(t.headers(), sample().headers());
    }

    #[test]
    fn test_csv_quotes_commas() {
        let mut t = Table::new("records", RECORD_COLUMNS);
        t.push_row(vec![
            "123-456".into(),
            "SMITH, JOHN".into(),
            "1 A St".into(),
            "1,234.56".into(),
        ])
        .unwrap();
        let mut out = Vec::new();
        t.to_csv_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Land Tax #,Owner,Address,Total Owed\n123-456,\"SMITH, JOHN\",1 A St,\"1,234.56\"\n"
        );

        let back = Table::from_csv_reader("records", text.as_bytes()).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_csv_ragged_input_is_schema_error() {
        let err = Table::from_csv_reader("gazetteer", "A,B\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(err.is_schema());
    }
}
