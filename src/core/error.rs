//! Error taxonomy for the holdings engine.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed user input or tabular data. Always aborts the current
/// operation without side effects.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    #[error("Invalid period '{0}'. Use 'Month YYYY' format (e.g., 'January 2024')")]
    Period(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {field}: '{value}'")]
    Number { field: &'static str, value: String },

    #[error("Row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<FormatError>,
    },

    #[error("No holdings found in import source")]
    NoData,

    #[error("Fund identifier must not be empty")]
    EmptyIdentifier,
}

/// A fund that matched an ambiguous identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub isin: String,
    pub name: String,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.isin)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Holdings store at {} is corrupt: {reason}", .path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("No fund matching '{identifier}' in {start} or {end}")]
    NotFound {
        identifier: String,
        start: String,
        end: String,
    },

    #[error("'{identifier}' matches multiple funds: {}", format_candidates(.candidates))]
    AmbiguousMatch {
        identifier: String,
        candidates: Vec<Candidate>,
    },

    #[error("End period {end} is before start period {start}")]
    InvalidRange { start: String, end: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_candidates(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
