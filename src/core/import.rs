//! Turns raw spreadsheet rows into a validated monthly snapshot.
use super::error::{FormatError, Result};
use super::period::PeriodKey;
use super::record::{FundRecord, RawFields};
use super::source::{RawRow, RowSource};
use crate::store::{HoldingsStore, IntegrityWarning};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Where the holdings table sits inside the exported sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportLayout {
    /// 1-based row of the first holding; everything above is preamble.
    pub data_start_row: usize,
    /// 0-based column of the Name cell. ISIN, Industry, Quantity, Market
    /// Value and % NAV follow in the next five columns.
    pub first_column: usize,
}

impl Default for ImportLayout {
    fn default() -> Self {
        ImportLayout {
            data_start_row: 7,
            first_column: 2,
        }
    }
}

impl ImportLayout {
    fn fields<'a>(&self, row: &'a RawRow) -> RawFields<'a> {
        let cell = |offset: usize| {
            row.get(self.first_column + offset)
                .map(String::as_str)
                .unwrap_or("")
        };
        RawFields {
            name: cell(0),
            isin: cell(1),
            industry: cell(2),
            quantity: cell(3),
            market_value: cell(4),
            percent_nav: cell(5),
        }
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub period: PeriodKey,
    pub records: usize,
    pub replaced: bool,
    pub warnings: Vec<IntegrityWarning>,
}

/// Validates the holdings table in `rows`.
///
/// Scanning starts at the layout's data row and stops at the first row whose
/// six holding cells are all blank. Any invalid row fails the whole batch,
/// naming its 1-based row number.
pub fn parse_rows(
    rows: &[RawRow],
    layout: &ImportLayout,
    update_callback: &dyn Fn(),
) -> std::result::Result<Vec<FundRecord>, FormatError> {
    let start = layout.data_start_row.saturating_sub(1);
    let mut records = Vec::new();

    for (index, row) in rows.iter().enumerate().skip(start) {
        let fields = layout.fields(row);
        if fields.is_blank() {
            debug!("Blank row {} ends the holdings table", index + 1);
            break;
        }

        let record = FundRecord::from_raw(&fields).map_err(|e| FormatError::Row {
            row: index + 1,
            source: Box::new(e),
        })?;
        records.push(record);
        update_callback();
    }

    if records.is_empty() {
        return Err(FormatError::NoData);
    }
    Ok(records)
}

/// Imports `rows` into `store` under `period`, replacing whatever the period
/// held before, and saves the store.
///
/// On any failure the store is left exactly as it was.
pub fn import_rows(
    store: &mut HoldingsStore,
    rows: &[RawRow],
    period: &str,
    layout: &ImportLayout,
    update_callback: &dyn Fn(),
) -> Result<ImportSummary> {
    let period: PeriodKey = period.parse()?;
    let records = parse_rows(rows, layout, update_callback)?;
    let count = records.len();

    let (previous, warnings) = store.upsert_period(period, records);
    let replaced = previous.is_some();
    if let Err(e) = store.save() {
        store.restore_period(period, previous);
        return Err(e);
    }

    let stored = store.get_period(&period).len();
    info!("Imported {count} row(s) as {stored} holding(s) for {period}");
    Ok(ImportSummary {
        period,
        records: stored,
        replaced,
        warnings,
    })
}

/// Reads all rows from `source` and imports them, see [`import_rows`].
pub fn import_from_source(
    store: &mut HoldingsStore,
    source: &dyn RowSource,
    period: &str,
    layout: &ImportLayout,
    update_callback: &dyn Fn(),
) -> Result<ImportSummary> {
    // Fail on a bad period before touching the source
    period.parse::<PeriodKey>()?;
    let rows = source.rows()?;
    import_rows(store, &rows, period, layout, update_callback)
}
