pub mod disk;

use crate::core::error::{Error, FormatError, Result};
use crate::core::period::PeriodKey;
use crate::core::record::FundRecord;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Holdings of one period, keyed by ISIN.
pub type PeriodHoldings = BTreeMap<String, FundRecord>;

static EMPTY_PERIOD: PeriodHoldings = BTreeMap::new();

/// Reported when an import batch carries the same ISIN more than once. The
/// last occurrence is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityWarning {
    pub isin: String,
    pub occurrences: usize,
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ISIN {} appears {} times, keeping the last row",
            self.isin, self.occurrences
        )
    }
}

/// Month-keyed holdings backed by a JSON document.
///
/// The store is the only writer of its document. Mutations happen in memory
/// and are written out by [`HoldingsStore::save`].
#[derive(Debug)]
pub struct HoldingsStore {
    path: PathBuf,
    periods: BTreeMap<PeriodKey, PeriodHoldings>,
}

impl HoldingsStore {
    /// Creates an empty store that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            periods: BTreeMap::new(),
        }
    }

    /// Loads the document at `path`. A missing document yields an empty
    /// store; a malformed one is reported and left untouched on disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let Some(content) = disk::read_document(&path)? else {
            info!("No holdings at {}, starting empty", path.display());
            return Ok(Self::empty(path));
        };

        let periods = parse_document(&content).map_err(|reason| Error::CorruptStore {
            path: path.clone(),
            reason,
        })?;
        debug!(
            "Loaded {} period(s) from {}",
            periods.len(),
            path.display()
        );
        Ok(Self { path, periods })
    }

    pub fn save(&self) -> Result<()> {
        let document = serde_json::to_vec_pretty(&self.periods).map_err(|e| Error::Io {
            path: self.path.clone(),
            source: e.into(),
        })?;
        disk::write_atomic(&self.path, &document)?;
        info!(
            "Saved {} period(s) to {}",
            self.periods.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces everything stored under `period` with `records`.
    ///
    /// Returns the previous holdings of the period, if any, together with a
    /// warning for each ISIN that occurred more than once in `records`.
    pub fn upsert_period(
        &mut self,
        period: PeriodKey,
        records: Vec<FundRecord>,
    ) -> (Option<PeriodHoldings>, Vec<IntegrityWarning>) {
        let mut occurrences: BTreeMap<String, usize> = BTreeMap::new();
        let mut holdings = PeriodHoldings::new();
        for record in records {
            *occurrences.entry(record.isin.clone()).or_insert(0) += 1;
            holdings.insert(record.isin.clone(), record);
        }

        let warnings: Vec<IntegrityWarning> = occurrences
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(isin, occurrences)| IntegrityWarning { isin, occurrences })
            .collect();
        for warning in &warnings {
            warn!(period = %period, "{warning}");
        }

        debug!("Storing {} holding(s) for {period}", holdings.len());
        (self.periods.insert(period, holdings), warnings)
    }

    /// Puts back holdings returned by [`HoldingsStore::upsert_period`].
    pub fn restore_period(&mut self, period: PeriodKey, previous: Option<PeriodHoldings>) {
        match previous {
            Some(holdings) => {
                self.periods.insert(period, holdings);
            }
            None => {
                self.periods.remove(&period);
            }
        }
    }

    /// Holdings for `period`; empty if the period was never imported.
    pub fn get_period(&self, period: &PeriodKey) -> &PeriodHoldings {
        self.periods.get(period).unwrap_or(&EMPTY_PERIOD)
    }

    pub fn contains_period(&self, period: &PeriodKey) -> bool {
        self.periods.contains_key(period)
    }

    /// Imported periods, oldest first.
    pub fn periods(&self) -> impl Iterator<Item = &PeriodKey> {
        self.periods.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// JSON object entries in document order. Unlike a map, nothing is merged
/// when a key repeats.
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

fn parse_document(content: &[u8]) -> std::result::Result<BTreeMap<PeriodKey, PeriodHoldings>, String> {
    let Entries(entries): Entries<Entries<FundRecord>> =
        serde_json::from_slice(content).map_err(|e| e.to_string())?;

    let mut periods = BTreeMap::new();
    for (key, entries) in entries {
        let period: PeriodKey = key.parse().map_err(|e: FormatError| e.to_string())?;
        // Only canonical spellings are accepted
        if period.to_string() != key {
            return Err(format!("period key '{key}' is not written as '{period}'"));
        }
        if periods.contains_key(&period) {
            return Err(format!("period '{period}' appears more than once"));
        }

        let mut holdings = PeriodHoldings::new();
        for (isin, record) in entries.0 {
            if isin != record.isin {
                return Err(format!(
                    "{period}: entry '{isin}' holds record for ISIN '{}'",
                    record.isin
                ));
            }
            record
                .validate()
                .map_err(|e| format!("{period}: entry '{isin}': {e}"))?;
            if holdings.insert(isin.clone(), record).is_some() {
                return Err(format!("{period}: entry '{isin}' appears more than once"));
            }
        }
        periods.insert(period, holdings);
    }
    Ok(periods)
}
