//! Canonical holding record for one fund in one period.

use super::error::FormatError;
use serde::{Deserialize, Serialize};

/// One fund's position in a monthly portfolio disclosure.
///
/// Records are only created through [`FundRecord::new`] or
/// [`FundRecord::from_raw`], both of which trim text and reject empty
/// names, empty ISINs and non-finite numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FundRecord {
    pub name: String,
    pub isin: String,
    pub industry: String,
    pub quantity: f64,
    pub market_value: f64,
    pub percent_nav: f64,
}

/// The six positional cells of a holdings row, as read from the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFields<'a> {
    pub name: &'a str,
    pub isin: &'a str,
    pub industry: &'a str,
    pub quantity: &'a str,
    pub market_value: &'a str,
    pub percent_nav: &'a str,
}

impl RawFields<'_> {
    pub fn is_blank(&self) -> bool {
        [
            self.name,
            self.isin,
            self.industry,
            self.quantity,
            self.market_value,
            self.percent_nav,
        ]
        .iter()
        .all(|cell| cell.trim().is_empty())
    }
}

impl FundRecord {
    pub fn new(
        name: &str,
        isin: &str,
        industry: &str,
        quantity: f64,
        market_value: f64,
        percent_nav: f64,
    ) -> Result<Self, FormatError> {
        let record = FundRecord {
            name: name.trim().to_string(),
            isin: isin.trim().to_string(),
            industry: industry.trim().to_string(),
            quantity,
            market_value,
            percent_nav,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn from_raw(fields: &RawFields<'_>) -> Result<Self, FormatError> {
        Self::new(
            fields.name,
            fields.isin,
            fields.industry,
            parse_number("quantity", fields.quantity)?,
            parse_number("market_value", fields.market_value)?,
            parse_number("percent_nav", fields.percent_nav)?,
        )
    }

    /// Checks the invariants every stored record must hold.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.name.trim().is_empty() {
            return Err(FormatError::MissingField("name"));
        }
        if self.isin.trim().is_empty() {
            return Err(FormatError::MissingField("isin"));
        }
        for (field, value) in [
            ("quantity", self.quantity),
            ("market_value", self.market_value),
            ("percent_nav", self.percent_nav),
        ] {
            if !value.is_finite() {
                return Err(FormatError::Number {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Two records describe the same fund when their ISINs match.
    pub fn same_fund(&self, other: &FundRecord) -> bool {
        self.isin == other.isin
    }
}

/// Parses a numeric cell, allowing `,` digit grouping.
fn parse_number(field: &'static str, raw: &str) -> Result<f64, FormatError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(FormatError::MissingField(field));
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormatError::Number {
            field,
            value: raw.trim().to_string(),
        }),
    }
}
