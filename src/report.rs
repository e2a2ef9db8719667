//! Rendering the final `{key=min/max/mean, ...}` summary.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};

use crate::fixed::Tenths;
use crate::table::AggregateTable;

/// Render `table` as `{k1=min/max/mean, k2=...}` with keys in ordinal order.
///
/// Every number has exactly one fractional digit; an empty table renders as
/// `{}`.
///
/// ```
/// use ironbrc::{render, AggregateTable};
///
/// let t = AggregateTable::from_records([("Paris", 215)]);
/// assert_eq!(render(&t), "{Paris=21.5/21.5/21.5}");
/// assert_eq!(render(&AggregateTable::new()), "{}");
/// ```
#[must_use]
pub fn render(table: &AggregateTable) -> String {
    // ~24 bytes per entry covers a short key plus three values.
    let mut out = String::with_capacity(2 + table.len() * 24);
    out.push('{');
    for (i, (key, agg)) in table.sorted().into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let stats = agg.stats();
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{key}={}/{}/{}",
            Tenths(stats.min),
            Tenths(stats.max),
            Tenths(stats.mean)
        );
    }
    out.push('}');
    out
}

/// Render `table` and write it to `sink` in one write, without a trailing
/// newline. Returns the number of bytes written.
///
/// # Errors
/// Returns an error if the sink rejects the write or the flush.
pub fn write_report<W: Write>(table: &AggregateTable, mut sink: W) -> Result<usize> {
    let report = render(table);
    sink.write_all(report.as_bytes()).context("write report")?;
    sink.flush().context("flush report")?;
    Ok(report.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_scenario_one() {
        let t = AggregateTable::from_records([
            ("Kabala", -104),
            ("Khrustalnyi", -66),
            ("Kabala", 964),
            ("Kabala", -113),
        ]);
        assert_eq!(
            render(&t),
            "{Kabala=-11.3/96.4/24.9, Khrustalnyi=-6.6/-6.6/-6.6}"
        );
    }

    #[test]
    fn small_negative_mean_renders_as_zero() {
        let t = AggregateTable::from_records([("k", -1), ("k", 0), ("k", 0)]);
        assert_eq!(render(&t), "{k=-0.1/0.0/0.0}");
    }

    #[test]
    fn write_report_has_no_trailing_newline() {
        let t = AggregateTable::from_records([("A", 50), ("B", 50)]);
        let mut sink = Vec::new();
        let n = write_report(&t, &mut sink).unwrap();
        assert_eq!(sink, b"{A=5.0/5.0/5.0, B=5.0/5.0/5.0}");
        assert_eq!(n, sink.len());
    }
}
