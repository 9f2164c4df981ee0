//! Exchange-rate resolution
//!
//! Rates to USD are keyed by (date, currency). When no entry exists for the
//! exact request date the nearest prior date wins; with no prior date the
//! lookup reports not-found. Both backing sources (uploaded rate workbook,
//! warehouse query) produce the same [`RateTable`].

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A rate observed on a specific date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRate {
    /// Units of the source currency per USD
    pub rate: f64,
    /// Date the rate was observed on; earlier than the request date when
    /// the prior-date fallback applied
    pub date: NaiveDate,
}

impl ResolvedRate {
    /// Whether this resolution fell back to an earlier date
    pub fn is_fallback(&self, requested: NaiveDate) -> bool {
        self.date < requested
    }
}

/// Source of exchange rates to USD
pub trait RateSource {
    /// Resolve the rate for a currency on a date, or report not-found
    fn rate_on(&self, currency: &str, date: NaiveDate) -> Option<ResolvedRate>;
}

/// Rates for all currencies on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub date: NaiveDate,
    /// Currency code -> units per USD
    pub rates: HashMap<String, f64>,
}

/// Date-sorted table of exchange rates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    entries: Vec<RateEntry>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from unsorted entries; later duplicates of a date win
    pub fn from_entries(mut entries: Vec<RateEntry>) -> Self {
        entries.sort_by_key(|e| e.date);
        let mut table = RateTable::new();
        for entry in entries {
            match table.entries.last_mut() {
                Some(last) if last.date == entry.date => last.rates.extend(entry.rates),
                _ => table.entries.push(entry),
            }
        }
        table
    }

    /// Insert one (date, currency) rate, keeping the table sorted
    pub fn insert(&mut self, date: NaiveDate, currency: &str, rate: f64) {
        let code = currency.trim().to_uppercase();
        let idx = self.entries.partition_point(|e| e.date < date);
        match self.entries.get_mut(idx) {
            Some(entry) if entry.date == date => {
                entry.rates.insert(code, rate);
            }
            _ => self.entries.insert(
                idx,
                RateEntry {
                    date,
                    rates: HashMap::from([(code, rate)]),
                },
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in ascending date order
    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    /// All currency codes appearing anywhere in the table, sorted
    pub fn currencies(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .flat_map(|e| e.rates.keys().cloned())
            .collect()
    }
}

impl RateSource for RateTable {
    fn rate_on(&self, currency: &str, date: NaiveDate) -> Option<ResolvedRate> {
        let code = currency.trim().to_uppercase();
        let upper = self.entries.partition_point(|e| e.date <= date);
        // Exact date first, then walk back to the nearest prior entry
        // that carries this currency.
        self.entries[..upper].iter().rev().find_map(|entry| {
            entry.rates.get(&code).map(|rate| ResolvedRate {
                rate: *rate,
                date: entry.date,
            })
        })
    }
}
