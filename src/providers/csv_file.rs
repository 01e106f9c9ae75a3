use crate::core::error::{Error, Result};
use crate::core::source::{RawRow, RowSource};
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads rows from a CSV export of a holdings spreadsheet.
///
/// Every record is returned as-is: no header detection, and rows may have
/// differing lengths.
pub struct CsvFileProvider {
    path: PathBuf,
}

impl CsvFileProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvFileProvider {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RowSource for CsvFileProvider {
    fn rows(&self) -> Result<Vec<RawRow>> {
        let io_error = |source: std::io::Error| Error::Io {
            path: self.path.clone(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| io_error(e.into()))?;

        // The reader drops empty lines; they are restored as empty rows so row
        // numbers keep matching the spreadsheet.
        let mut rows: Vec<RawRow> = Vec::new();
        let mut next_line: u64 = 1;
        for record in reader.records() {
            let record = record.map_err(|e| io_error(e.into()))?;
            if let Some(position) = record.position() {
                while next_line < position.line() {
                    rows.push(Vec::new());
                    next_line += 1;
                }
            }
            let embedded_newlines: u64 = record
                .iter()
                .map(|field| field.matches('\n').count() as u64)
                .sum();
            next_line += 1 + embedded_newlines;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!("Read {} row(s) from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}
