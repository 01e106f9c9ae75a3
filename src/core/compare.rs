//! Period-over-period comparison of a single fund's holding.
//!
//! A fund is located by ISIN or by a case-insensitive fragment of its name,
//! looked up independently in both periods, and classified as existing, newly
//! added or dropped. Missing sides count as a zero position.
use super::error::{Candidate, Error, FormatError, Result};
use super::period::PeriodKey;
use super::record::FundRecord;
use crate::store::{HoldingsStore, PeriodHoldings};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FundStatus {
    /// Held in both periods
    Existing,
    /// Held only in the end period
    NewAddition,
    /// Held only in the start period
    Dropped,
}

impl Display for FundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FundStatus::Existing => "Existing",
                FundStatus::NewAddition => "New Addition",
                FundStatus::Dropped => "Dropped",
            }
        )
    }
}

/// Start/end values of one metric and how they moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDelta {
    pub start: f64,
    pub end: f64,
    pub change: f64,
    /// Relative change in percent; `None` when the start value is zero.
    pub percent_change: Option<f64>,
}

impl MetricDelta {
    pub fn between(start: f64, end: f64) -> Self {
        let change = end - start;
        let percent_change = if start != 0.0 {
            Some(change / start * 100.0)
        } else {
            None
        };
        MetricDelta {
            start,
            end,
            change,
            percent_change,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaReport {
    pub name: String,
    pub isin: String,
    pub industry: String,
    pub start_period: PeriodKey,
    pub end_period: PeriodKey,
    pub status: FundStatus,
    pub quantity: MetricDelta,
    pub market_value: MetricDelta,
    pub percent_nav: MetricDelta,
}

impl DeltaReport {
    fn from_records(
        start_period: PeriodKey,
        end_period: PeriodKey,
        identity: &FundRecord,
        status: FundStatus,
        start: (f64, f64, f64),
        end: (f64, f64, f64),
    ) -> Self {
        DeltaReport {
            name: identity.name.clone(),
            isin: identity.isin.clone(),
            industry: identity.industry.clone(),
            start_period,
            end_period,
            status,
            quantity: MetricDelta::between(start.0, end.0),
            market_value: MetricDelta::between(start.1, end.1),
            percent_nav: MetricDelta::between(start.2, end.2),
        }
    }

    /// Metrics in display order, with their labels.
    pub fn metrics(&self) -> [(&'static str, &MetricDelta); 3] {
        [
            ("Quantity", &self.quantity),
            ("Market Value", &self.market_value),
            ("% to NAV", &self.percent_nav),
        ]
    }
}

fn metrics_of(record: &FundRecord) -> (f64, f64, f64) {
    (record.quantity, record.market_value, record.percent_nav)
}

/// Compares the holding of the fund matching `identifier` between
/// `start_period` and `end_period`.
///
/// Errors: malformed periods or an empty identifier are format errors; an
/// end period before the start period is an invalid range; an identifier
/// matching no fund or several funds is reported as such.
pub fn compare(
    store: &HoldingsStore,
    identifier: &str,
    start_period: &str,
    end_period: &str,
) -> Result<DeltaReport> {
    let start: PeriodKey = start_period.parse()?;
    let end: PeriodKey = end_period.parse()?;
    if end < start {
        return Err(Error::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(FormatError::EmptyIdentifier.into());
    }

    let start_holdings = store.get_period(&start);
    let end_holdings = store.get_period(&end);
    let not_found = || Error::NotFound {
        identifier: identifier.to_string(),
        start: start.to_string(),
        end: end.to_string(),
    };

    let isin = resolve_isin(identifier, start_holdings, end_holdings)?.ok_or_else(not_found)?;
    debug!("Resolved '{identifier}' to {isin}");

    let report = match (start_holdings.get(&isin), end_holdings.get(&isin)) {
        (Some(from), Some(to)) => DeltaReport::from_records(
            start,
            end,
            to,
            FundStatus::Existing,
            metrics_of(from),
            metrics_of(to),
        ),
        (None, Some(to)) => DeltaReport::from_records(
            start,
            end,
            to,
            FundStatus::NewAddition,
            (0.0, 0.0, 0.0),
            metrics_of(to),
        ),
        (Some(from), None) => DeltaReport::from_records(
            start,
            end,
            from,
            FundStatus::Dropped,
            metrics_of(from),
            (0.0, 0.0, 0.0),
        ),
        // Resolution only yields ISINs seen in one of the periods
        (None, None) => return Err(not_found()),
    };
    Ok(report)
}

/// Finds the single ISIN `identifier` refers to across both periods.
///
/// A record matches when its ISIN equals the identifier or its name contains
/// it case-insensitively. All matches count towards ambiguity.
fn resolve_isin(
    identifier: &str,
    start: &PeriodHoldings,
    end: &PeriodHoldings,
) -> Result<Option<String>> {
    let needle = identifier.to_lowercase();
    let mut matches: BTreeMap<&str, &str> = BTreeMap::new();
    for record in end
        .values()
        .chain(start.values())
        .filter(|r| r.isin == identifier || r.name.to_lowercase().contains(&needle))
    {
        // End period names come first and take precedence
        matches
            .entry(record.isin.as_str())
            .or_insert(record.name.as_str());
    }

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.into_keys().next().map(str::to_string)),
        _ => Err(Error::AmbiguousMatch {
            identifier: identifier.to_string(),
            candidates: matches
                .into_iter()
                .map(|(isin, name)| Candidate {
                    isin: isin.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, isin: &str, quantity: f64, market_value: f64, percent_nav: f64) -> FundRecord {
        FundRecord::new(name, isin, "Banks", quantity, market_value, percent_nav).unwrap()
    }

    fn store_with(periods: Vec<(&str, Vec<FundRecord>)>) -> HoldingsStore {
        let mut store = HoldingsStore::empty("unused.json");
        for (period, records) in periods {
            store.upsert_period(period.parse().unwrap(), records);
        }
        store
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn test_existing_fund_delta() {
        let store = store_with(vec![
            ("January 2024", vec![record("HDFC Bank Ltd", "INE040A01034", 100.0, 5000.0, 2.0)]),
            ("February 2024", vec![record("HDFC Bank Ltd", "INE040A01034", 150.0, 7500.0, 2.5)]),
        ]);

        let report = compare(&store, "hdfc bank", "January 2024", "February 2024").unwrap();
        assert_eq!(report.status, FundStatus::Existing);
        assert_eq!(report.isin, "INE040A01034");

        assert_close(report.quantity.change, 50.0);
        assert_close(report.quantity.percent_change.unwrap(), 50.0);
        assert_close(report.market_value.change, 2500.0);
        assert_close(report.market_value.percent_change.unwrap(), 50.0);
        assert_close(report.percent_nav.change, 0.5);
        assert_close(report.percent_nav.percent_change.unwrap(), 25.0);
    }

    #[test]
    fn test_new_addition() {
        let store = store_with(vec![
            ("January 2024", vec![record("Infosys Ltd", "INE009A01021", 10.0, 10.0, 1.0)]),
            (
                "March 2024",
                vec![
                    record("Infosys Ltd", "INE009A01021", 10.0, 10.0, 1.0),
                    record("HDFC Bank Ltd", "INE040A01034", 200.0, 9000.0, 3.0),
                ],
            ),
        ]);

        let report = compare(&store, "INE040A01034", "January 2024", "March 2024").unwrap();
        assert_eq!(report.status, FundStatus::NewAddition);
        assert_eq!(report.quantity.start, 0.0);
        assert_eq!(report.quantity.change, 200.0);
        assert_eq!(report.quantity.percent_change, None);
        assert_eq!(report.market_value.change, 9000.0);
    }

    #[test]
    fn test_dropped_fund() {
        let store = store_with(vec![
            ("January 2024", vec![record("HDFC Bank Ltd", "INE040A01034", 100.0, 5000.0, 0.0)]),
            ("February 2024", vec![record("Infosys Ltd", "INE009A01021", 10.0, 10.0, 1.0)]),
        ]);

        let report = compare(&store, "HDFC", "January 2024", "February 2024").unwrap();
        assert_eq!(report.status, FundStatus::Dropped);
        assert_eq!(report.name, "HDFC Bank Ltd");
        assert_eq!(report.quantity.end, 0.0);
        assert_eq!(report.quantity.change, -100.0);
        assert_eq!(report.quantity.percent_change, Some(-100.0));
        assert_eq!(report.market_value.change, -5000.0);
        // Zero start has no relative change
        assert_eq!(report.percent_nav.percent_change, None);
    }

    #[test]
    fn test_ambiguous_identifier() {
        let store = store_with(vec![
            (
                "January 2024",
                vec![
                    record("HDFC Bank Ltd", "INE040A01034", 1.0, 1.0, 1.0),
                    record("HDFC Life Insurance", "INE795G01014", 1.0, 1.0, 1.0),
                ],
            ),
            ("February 2024", vec![record("HDFC Bank Ltd", "INE040A01034", 1.0, 1.0, 1.0)]),
        ]);

        let err = compare(&store, "HDFC", "January 2024", "February 2024").unwrap_err();
        match err {
            Error::AmbiguousMatch {
                identifier,
                candidates,
            } => {
                assert_eq!(identifier, "HDFC");
                let isins: Vec<_> = candidates.iter().map(|c| c.isin.as_str()).collect();
                assert_eq!(isins, vec!["INE040A01034", "INE795G01014"]);
            }
            other => panic!("expected ambiguous match, got {other:?}"),
        }
    }

    #[test]
    fn test_same_isin_under_changed_name_is_one_fund() {
        let store = store_with(vec![
            ("January 2024", vec![record("HDFC Bank", "INE040A01034", 1.0, 1.0, 1.0)]),
            ("February 2024", vec![record("HDFC Bank Ltd", "INE040A01034", 2.0, 1.0, 1.0)]),
        ]);

        let report = compare(&store, "HDFC", "January 2024", "February 2024").unwrap();
        assert_eq!(report.name, "HDFC Bank Ltd");
        assert_eq!(report.quantity.change, 1.0);
    }

    #[test]
    fn test_isin_and_name_matches_are_ambiguous_together() {
        let store = store_with(vec![(
            "January 2024",
            vec![
                record("Fund INE040A01034 tracker", "INE000000001", 1.0, 1.0, 1.0),
                record("HDFC Bank Ltd", "INE040A01034", 1.0, 1.0, 1.0),
            ],
        )]);

        let err = compare(&store, "INE040A01034", "January 2024", "January 2024").unwrap_err();
        match err {
            Error::AmbiguousMatch { candidates, .. } => {
                let isins: Vec<_> = candidates.iter().map(|c| c.isin.as_str()).collect();
                assert_eq!(isins, vec!["INE000000001", "INE040A01034"]);
            }
            other => panic!("expected ambiguous match, got {other:?}"),
        }
    }

    #[test]
    fn test_isin_match_is_exact() {
        let store = store_with(vec![(
            "January 2024",
            vec![record("HDFC Bank Ltd", "INE040A01034", 1.0, 1.0, 1.0)],
        )]);

        let report = compare(&store, "INE040A01034", "January 2024", "January 2024").unwrap();
        assert_eq!(report.status, FundStatus::Existing);
        assert_eq!(report.quantity.percent_change, Some(0.0));

        let err = compare(&store, "ine040a01034", "January 2024", "January 2024").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_not_found() {
        let store = store_with(vec![(
            "January 2024",
            vec![record("HDFC Bank Ltd", "INE040A01034", 1.0, 1.0, 1.0)],
        )]);

        let err = compare(&store, "Reliance", "January 2024", "February 2024").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));

        // Periods that were never imported are empty, not an error of their own
        let err = compare(&store, "HDFC", "March 2024", "April 2024").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_reversed_range() {
        let store = store_with(vec![]);
        let err = compare(&store, "HDFC", "March 2024", "January 2024").unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn test_invalid_inputs() {
        let store = store_with(vec![]);
        let err = compare(&store, "HDFC", "Jan 2024", "March 2024").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::Period(_))));

        let err = compare(&store, "  ", "January 2024", "March 2024").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::EmptyIdentifier)));
    }

    #[test]
    fn test_report_json_shape() {
        let store = store_with(vec![(
            "March 2024",
            vec![record("HDFC Bank Ltd", "INE040A01034", 200.0, 1.0, 1.0)],
        )]);
        let report = compare(&store, "HDFC", "January 2024", "March 2024").unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "new_addition");
        assert_eq!(json["start_period"], "January 2024");
        assert_eq!(json["quantity"]["change"], 200.0);
        assert!(json["quantity"]["percent_change"].is_null());
    }
}
