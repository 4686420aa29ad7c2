use crate::error::{MigrateError, Result};
use std::path::Path;

/// In-memory tabular record set: one header row plus string cells. An empty
/// cell means a missing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a delimited file. Malformed input (unreadable, empty, no header
    /// row) is fatal before any row processing.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MigrateError::Input(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_csv_str(&content)
    }

    pub fn from_csv_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(MigrateError::Input("input file is empty".to_string()));
        }

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(MigrateError::Input(
                "input file has no header row".to_string(),
            ));
        }

        // Ragged rows are padded or truncated to the header width.
        let width = headers.len();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path.as_ref())?;
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| MigrateError::Input(format!("Failed to flush csv writer: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| MigrateError::Input(format!("Cleaned output is not UTF-8: {}", e)))
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv_str() {
        let table = Table::from_csv_str("a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_ragged_rows_padded_to_header_width() {
        let table = Table::from_csv_str("a,b,c\n1,2\n1,2,3,4\n").unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_file_is_fatal() {
        assert!(Table::from_csv_str("").is_err());
        assert!(Table::from_csv_str("   \n  ").is_err());
    }

    #[test]
    fn test_blank_header_row_is_fatal() {
        assert!(Table::from_csv_str(",,\n1,2,3\n").is_err());
    }

    #[test]
    fn test_csv_round_trip() {
        let table = Table::from_csv_str("a,b\nx y,2\n").unwrap();
        let out = table.to_csv_string().unwrap();
        assert_eq!(Table::from_csv_str(&out).unwrap(), table);
    }
}
