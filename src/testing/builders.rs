//! Deterministic measurement input generators.

use std::fmt::Write as _;

use crate::fixed::Tenths;

#[derive(Clone, Copy, Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    const fn next_u64(&mut self) -> u64 {
        let mut z = {
            self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            self.state
        };
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform-ish value in `lo..=hi`.
    fn next_in(&mut self, lo: i64, hi: i64) -> i64 {
        let span = hi.abs_diff(lo) + 1;
        // `span` is at most 2^64 - 1 here because the builder clamps ranges.
        lo.wrapping_add_unsigned(self.next_u64() % span)
    }
}

/// Fluent builder for `<key>;<value>` input.
///
/// The same settings always produce the same text.
///
/// # Example
///
/// ```
/// use ironbrc::testing::MeasurementBuilder;
///
/// let input = MeasurementBuilder::new()
///     .keys(3)
///     .records(10)
///     .range(-50, 50)
///     .build();
///
/// assert_eq!(input.lines().count(), 10);
/// assert!(input.ends_with('\n'));
/// ```
#[derive(Clone, Debug)]
pub struct MeasurementBuilder {
    keys: Vec<String>,
    records: usize,
    seed: u64,
    min_tenths: i64,
    max_tenths: i64,
    trailing_newline: bool,
}

impl Default for MeasurementBuilder {
    fn default() -> Self {
        Self {
            keys: generated_keys(10),
            records: 100,
            seed: 0x1B8C,
            min_tenths: -999,
            max_tenths: 999,
            trailing_newline: true,
        }
    }
}

impl MeasurementBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `n` generated key names (`station-000`, `station-001`, ...).
    #[must_use]
    pub fn keys(mut self, n: usize) -> Self {
        self.keys = generated_keys(n.max(1));
        self
    }

    /// Use the given key names.
    ///
    /// # Panics
    /// Panics if `names` is empty.
    #[must_use]
    pub fn key_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.keys = names.into_iter().map(Into::into).collect();
        assert!(!self.keys.is_empty(), "MeasurementBuilder needs at least one key");
        self
    }

    #[must_use]
    pub const fn records(mut self, n: usize) -> Self {
        self.records = n;
        self
    }

    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Inclusive value range in tenths (e.g. `-999, 999` for -99.9..=99.9).
    #[must_use]
    pub fn range(mut self, min_tenths: i64, max_tenths: i64) -> Self {
        let (lo, hi) = if min_tenths <= max_tenths {
            (min_tenths, max_tenths)
        } else {
            (max_tenths, min_tenths)
        };
        // Keep the span representable in a u64.
        self.min_tenths = lo.max(i64::MIN / 2);
        self.max_tenths = hi.min(i64::MAX / 2);
        self
    }

    /// Leave the final record unterminated.
    #[must_use]
    pub const fn without_trailing_newline(mut self) -> Self {
        self.trailing_newline = false;
        self
    }

    /// Generate `(key, tenths)` pairs without rendering them.
    #[must_use]
    pub fn build_records(&self) -> Vec<(String, i64)> {
        let mut rng = SplitMix64::new(self.seed);
        (0..self.records)
            .map(|_| {
                let k = (rng.next_u64() % self.keys.len() as u64) as usize;
                let v = rng.next_in(self.min_tenths, self.max_tenths);
                (self.keys[k].clone(), v)
            })
            .collect()
    }

    /// Render the input text.
    #[must_use]
    pub fn build(&self) -> String {
        let mut out = String::with_capacity(self.records * 16);
        for (key, tenths) in self.build_records() {
            let _ = writeln!(out, "{key};{}", Tenths(tenths));
        }
        if !self.trailing_newline {
            out.pop();
        }
        out
    }
}

fn generated_keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("station-{i:03}")).collect()
}
