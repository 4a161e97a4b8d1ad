//! Per-region statistics keyed by (year, indicator).

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::Serialize;

/// Indicator name of the placeholder entry written when statistics are not
/// requested.
pub const PLACEHOLDER_INDICATOR: &str = "to be filled";

/// Year of the placeholder entry.
pub const PLACEHOLDER_YEAR: i32 = 0;

/// A statistic value; the backend's value-type tag selects the variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(i64),
    Float(f64),
}

/// Key of one statistic: the year first, so entries group by year.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatisticKey {
    pub year: i32,
    pub indicator: String,
}

impl StatisticKey {
    pub fn new(year: i32, indicator: impl Into<String>) -> Self {
        Self {
            year,
            indicator: indicator.into(),
        }
    }
}

/// Value and optional note of one statistic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticEntry {
    /// `None` for placeholders and for rows whose selected value is null.
    pub value: Option<StatValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// All statistics of one region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    entries: BTreeMap<StatisticKey, StatisticEntry>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics holding only the deferred-computation placeholder.
    pub fn placeholder() -> Self {
        let mut stats = Self::new();
        stats.entries.insert(
            StatisticKey::new(PLACEHOLDER_YEAR, PLACEHOLDER_INDICATOR),
            StatisticEntry::default(),
        );
        stats
    }

    /// Merge one value into the map.
    ///
    /// A later value for the same key replaces the earlier one. Empty or
    /// missing notes are dropped and never clear a note already stored.
    pub fn insert(&mut self, key: StatisticKey, value: Option<StatValue>, note: Option<&str>) {
        let entry = self.entries.entry(key).or_default();
        entry.value = value;
        if let Some(note) = note.filter(|n| !n.is_empty()) {
            entry.note = Some(note.to_string());
        }
    }

    pub fn get(&self, year: i32, indicator: &str) -> Option<&StatisticEntry> {
        self.entries.get(&StatisticKey::new(year, indicator))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, StatisticKey, StatisticEntry> {
        self.entries.iter()
    }

    /// Entries grouped as year → indicator → entry.
    pub fn by_year(&self) -> BTreeMap<i32, BTreeMap<&str, &StatisticEntry>> {
        let mut grouped: BTreeMap<i32, BTreeMap<&str, &StatisticEntry>> = BTreeMap::new();
        for (key, entry) in &self.entries {
            grouped
                .entry(key.year)
                .or_default()
                .insert(key.indicator.as_str(), entry);
        }
        grouped
    }
}

impl<'a> IntoIterator for &'a Statistics {
    type Item = (&'a StatisticKey, &'a StatisticEntry);
    type IntoIter = btree_map::Iter<'a, StatisticKey, StatisticEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
