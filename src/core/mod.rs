//! Core holdings model, import and comparison logic

pub mod compare;
pub mod config;
pub mod error;
pub mod import;
pub mod log;
pub mod period;
pub mod record;
pub mod source;

// Re-export main types for cleaner imports
pub use compare::{DeltaReport, FundStatus, MetricDelta};
pub use error::{Error, FormatError};
pub use import::{ImportLayout, ImportSummary};
pub use period::PeriodKey;
pub use record::FundRecord;
pub use source::{RawRow, RowSource};
