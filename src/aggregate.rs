//! Per-key accumulator.

use serde::{Deserialize, Serialize};

use crate::combine::{CombineFn, MinMaxMean, Stats};

/// Running min/max/total/count for one key, all values in tenths.
///
/// The mean is derived at report time; keeping the exact `total` lets two
/// aggregates be merged without losing precision. `total` is an `i128`: any
/// count of `i64` values sums without overflow in practice. Tables only ever hold
/// aggregates with `count >= 1`, so `min <= max` holds for every stored entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub min: i64,
    pub max: i64,
    pub total: i128,
    pub count: u64,
}

impl Aggregate {
    /// Aggregate holding a single observation.
    #[must_use]
    pub fn of(tenths: i64) -> Self {
        let mut acc = MinMaxMean.create();
        MinMaxMean.add_input(&mut acc, tenths);
        acc
    }

    #[inline]
    pub fn observe(&mut self, tenths: i64) {
        MinMaxMean.add_input(self, tenths);
    }

    #[inline]
    pub fn merge(&mut self, other: Self) {
        MinMaxMean.merge(self, other);
    }

    #[must_use]
    pub fn stats(self) -> Stats {
        MinMaxMean.finish(self)
    }
}
