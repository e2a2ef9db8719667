//! Reference implementation and report assertions.

use std::collections::BTreeMap;

use crate::fixed::{mean_tenths, parse_tenths, Tenths};

/// Compute the report with a deliberately simple single-threaded pass.
///
/// Uses `str::lines`, `split_once` and an ordered map; it shares nothing with
/// the chunked pipeline except value parsing and number formatting, which
/// makes it a useful oracle.
///
/// # Panics
/// Panics on malformed input; only use it with generated or fixture data.
#[must_use]
pub fn naive_report(input: &str) -> String {
    let mut acc: BTreeMap<&str, (i64, i64, i128, u64)> = BTreeMap::new();
    for line in input.lines().filter(|l| !l.is_empty()) {
        let (key, value) = line.split_once(';').expect("record without ';'");
        let v = parse_tenths(value.as_bytes()).expect("malformed value");
        let e = acc.entry(key).or_insert((v, v, 0, 0));
        e.0 = e.0.min(v);
        e.1 = e.1.max(v);
        e.2 += i128::from(v);
        e.3 += 1;
    }
    let body: Vec<String> = acc
        .into_iter()
        .map(|(k, (min, max, total, count))| {
            format!(
                "{k}={}/{}/{}",
                Tenths(min),
                Tenths(max),
                Tenths(mean_tenths(total, count))
            )
        })
        .collect();
    format!("{{{}}}", body.join(", "))
}

/// Split a report into its `key=min/max/mean` entries.
#[must_use]
pub fn report_entries(report: &str) -> Vec<&str> {
    let inner = report
        .strip_prefix('{')
        .and_then(|r| r.strip_suffix('}'))
        .unwrap_or(report);
    if inner.is_empty() {
        Vec::new()
    } else {
        inner.split(", ").collect()
    }
}

/// Assert two reports are identical, pointing at the first differing entry.
///
/// # Panics
/// Panics if the reports differ.
pub fn assert_reports_equal(actual: &str, expected: &str) {
    if actual == expected {
        return;
    }
    let a = report_entries(actual);
    let e = report_entries(expected);
    for (i, (x, y)) in a.iter().zip(e.iter()).enumerate() {
        assert_eq!(
            x, y,
            "Report mismatch at entry {i}:\n  Expected: {y}\n  Actual: {x}"
        );
    }
    panic!(
        "Report length mismatch:\n  Expected {} entries\n  Actual {} entries\n  Expected: {expected}\n  Actual: {actual}",
        e.len(),
        a.len()
    );
}
