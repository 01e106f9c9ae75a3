//! Tabular row source abstraction

use super::error::Result;

/// One row of cells as read from a tabular export, untyped.
pub type RawRow = Vec<String>;

/// Supplies every row of a tabular export, top to bottom, including any
/// preamble above the data.
pub trait RowSource {
    fn rows(&self) -> Result<Vec<RawRow>>;
}

impl RowSource for Vec<RawRow> {
    fn rows(&self) -> Result<Vec<RawRow>> {
        Ok(self.clone())
    }
}
