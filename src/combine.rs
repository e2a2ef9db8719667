//! Combiner abstraction and the per-key min/max/mean combiner.
//!
//! A [`CombineFn`] describes a commutative, associative reduction in four
//! steps: `create` an empty accumulator, `add_input` single values into it,
//! `merge` two accumulators, and `finish` into an output. Workers only call
//! `create`/`add_input`; the merger only calls `merge`; the report only calls
//! `finish`. Because `merge` is order-independent, chunks may be processed
//! and merged in any order without changing the result.

use crate::aggregate::Aggregate;
use crate::fixed::mean_tenths;

pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, v: V);
    fn merge(&self, acc: &mut A, other: A);
    fn finish(&self, acc: A) -> O;
}

/// Final per-key statistics, all in tenths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub min: i64,
    pub max: i64,
    pub mean: i64,
}

/* ===================== MinMaxMean ===================== */

/// Minimum, maximum and mean of scaled-integer values.
///
/// - Input: one value in tenths
/// - Accumulator: [`Aggregate`] (`min`, `max`, exact `total`, `count`)
/// - Output: [`Stats`], mean rounded half away from zero
///
/// `create` returns sentinel bounds (`i64::MAX` / `i64::MIN`) that the first
/// input always overwrites.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinMaxMean;

impl CombineFn<i64, Aggregate, Stats> for MinMaxMean {
    fn create(&self) -> Aggregate {
        Aggregate {
            min: i64::MAX,
            max: i64::MIN,
            total: 0,
            count: 0,
        }
    }

    fn add_input(&self, acc: &mut Aggregate, v: i64) {
        acc.min = acc.min.min(v);
        acc.max = acc.max.max(v);
        acc.total += i128::from(v);
        acc.count += 1;
    }

    fn merge(&self, acc: &mut Aggregate, other: Aggregate) {
        acc.min = acc.min.min(other.min);
        acc.max = acc.max.max(other.max);
        acc.total += other.total;
        acc.count += other.count;
    }

    /// # Panics
    /// Debug builds assert the accumulator saw at least one value; tables
    /// never hold an empty aggregate.
    fn finish(&self, acc: Aggregate) -> Stats {
        Stats {
            min: acc.min,
            max: acc.max,
            mean: mean_tenths(acc.total, acc.count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(values: &[i64]) -> Aggregate {
        let mut acc = MinMaxMean.create();
        for &v in values {
            MinMaxMean.add_input(&mut acc, v);
        }
        acc
    }

    #[test]
    fn first_input_replaces_sentinels() {
        let acc = fold(&[-104]);
        assert_eq!(acc.min, -104);
        assert_eq!(acc.max, -104);
        assert_eq!(acc.total, -104);
        assert_eq!(acc.count, 1);
    }

    #[test]
    fn merge_matches_single_fold() {
        let values = [-104, 964, -113, 12, 0, 7];
        let whole = fold(&values);

        let mut left = fold(&values[..2]);
        MinMaxMean.merge(&mut left, fold(&values[2..]));
        assert_eq!(left, whole);

        let mut right = fold(&values[4..]);
        MinMaxMean.merge(&mut right, fold(&values[..4]));
        assert_eq!(right, whole);
    }

    #[test]
    fn merging_fresh_accumulator_is_identity() {
        let mut acc = fold(&[5, 15]);
        let before = acc;
        MinMaxMean.merge(&mut acc, MinMaxMean.create());
        assert_eq!(acc, before);
    }

    #[test]
    fn totals_past_i64_stay_exact() {
        let big = 9_000_000_000_000_000_000;
        let acc = fold(&[big, big, big]);
        assert_eq!(acc.total, 3 * i128::from(big));

        let mut merged = fold(&[i64::MAX]);
        MinMaxMean.merge(&mut merged, fold(&[i64::MAX]));
        let stats = MinMaxMean.finish(merged);
        assert_eq!((stats.min, stats.max, stats.mean), (i64::MAX, i64::MAX, i64::MAX));
    }

    #[test]
    fn finish_rounds_mean() {
        let stats = MinMaxMean.finish(fold(&[-104, 964, -113]));
        assert_eq!(
            stats,
            Stats {
                min: -113,
                max: 964,
                mean: 249
            }
        );
    }
}
