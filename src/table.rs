//! Key → [`Aggregate`] tables.
//!
//! The same type serves as a worker's per-chunk partial table and as the
//! merger's global table. A table is always exclusively owned: workers build
//! one per chunk and hand it off by value, the merger folds them into its own.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTable {
    entries: HashMap<String, Aggregate>,
}

impl AggregateTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(key, tenths)` observations.
    pub fn from_records<K, I>(records: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, i64)>,
    {
        let mut table = Self::new();
        for (key, tenths) in records {
            table.observe(key.as_ref(), tenths);
        }
        table
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of observations across all keys.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.entries.values().map(|a| a.count).sum()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Aggregate> {
        self.entries.get(key)
    }

    /// Record one observation, creating the key's aggregate on first sight.
    ///
    /// The key is only copied into an owned `String` the first time it is seen.
    #[inline]
    pub fn observe(&mut self, key: &str, tenths: i64) {
        if let Some(agg) = self.entries.get_mut(key) {
            agg.observe(tenths);
        } else {
            self.entries.insert(key.to_owned(), Aggregate::of(tenths));
        }
    }

    /// Fold `other` into `self`. Commutative and associative; merging an empty
    /// table leaves `self` unchanged.
    pub fn merge(&mut self, other: Self) {
        if self.entries.is_empty() {
            self.entries = other.entries;
            return;
        }
        for (key, agg) in other.entries {
            self.entries
                .entry(key)
                .and_modify(|mine| mine.merge(agg))
                .or_insert(agg);
        }
    }

    /// Entries sorted by ordinal (byte-wise) key order.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, &Aggregate)> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        out.sort_unstable_by(|a, b| a.0.cmp(b.0));
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Aggregate)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: AsRef<str>> Extend<(K, i64)> for AggregateTable {
    fn extend<I: IntoIterator<Item = (K, i64)>>(&mut self, iter: I) {
        for (key, tenths) in iter {
            self.observe(key.as_ref(), tenths);
        }
    }
}
