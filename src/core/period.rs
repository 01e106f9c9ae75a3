//! Month-year keys under which a holdings snapshot is stored.

use super::error::FormatError;
use chrono::Month;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

/// A calendar month bucket, written as `"January 2024"`.
///
/// Month names are the full English names and are case-sensitive; the year
/// must be exactly four digits. Keys order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey {
    year: u16,
    month: Month,
}

impl PeriodKey {
    pub fn new(year: u16, month: Month) -> Self {
        PeriodKey { year, month }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    fn month_index(&self) -> u32 {
        self.month.number_from_month()
    }
}

fn parse_month(name: &str) -> Option<Month> {
    (1..=12u8)
        .filter_map(|n| Month::try_from(n).ok())
        .find(|m| m.name() == name)
}

impl FromStr for PeriodKey {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::Period(s.to_string());
        let (month, year) = s.trim().split_once(' ').ok_or_else(invalid)?;

        let month = parse_month(month).ok_or_else(invalid)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;

        Ok(PeriodKey { year, month })
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:04}", self.month.name(), self.year)
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month_index()).cmp(&(other.year, other.month_index()))
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}
