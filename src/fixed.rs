//! Fixed-point decimals scaled to tenths.
//!
//! Every measurement carries exactly one fractional digit, so values are kept
//! as `i64` tenths from parse to report. Sums over millions of records stay
//! exact and the result does not depend on the order in which partial sums
//! are combined.

use std::fmt;

use crate::error::ValueError;

/// Parse `[-+]?[0-9]+\.[0-9]` into tenths, e.g. `b"-12.3"` → `-123`.
///
/// The integer part may be any width; only the single fractional digit is
/// fixed.
///
/// # Errors
/// Returns a [`ValueError`] describing the first problem found. Nothing is
/// guessed or truncated.
pub fn parse_tenths(bytes: &[u8]) -> Result<i64, ValueError> {
    let (negative, digits) = match bytes.split_first() {
        None => return Err(ValueError::Empty),
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        Some(_) => (false, bytes),
    };

    let point = digits
        .iter()
        .position(|&b| b == b'.')
        .ok_or(ValueError::MissingPoint)?;
    let (int_part, frac_part) = (&digits[..point], &digits[point + 1..]);
    if int_part.is_empty() {
        return Err(ValueError::MissingIntegerDigits);
    }
    if frac_part.len() != 1 {
        return Err(ValueError::FractionDigits(frac_part.len()));
    }

    let mut tenths: i64 = 0;
    for &b in int_part.iter().chain(frac_part) {
        if !b.is_ascii_digit() {
            return Err(ValueError::UnexpectedByte(b));
        }
        tenths = tenths
            .checked_mul(10)
            .and_then(|t| t.checked_add(i64::from(b - b'0')))
            .ok_or(ValueError::Overflow)?;
    }

    Ok(if negative { -tenths } else { tenths })
}

/// `total / count` in tenths, rounded half away from zero.
///
/// `total` is the exact `i128` sum of `count` values that each fit in an
/// `i64`, so the result always fits in an `i64`. `count` must be non-zero.
#[must_use]
pub fn mean_tenths(total: i128, count: u64) -> i64 {
    debug_assert!(count > 0, "mean of an empty aggregate");
    let count = i128::from(count);
    let mut quotient = total / count;
    let remainder = total % count;
    if 2 * remainder.abs() >= count {
        quotient += total.signum();
    }
    i64::try_from(quotient).unwrap_or(if quotient < 0 { i64::MIN } else { i64::MAX })
}

/// Display adaptor rendering tenths with exactly one fractional digit.
///
/// ```
/// use ironbrc::fixed::Tenths;
///
/// assert_eq!(Tenths(-113).to_string(), "-11.3");
/// assert_eq!(Tenths(5).to_string(), "0.5");
/// assert_eq!(Tenths(0).to_string(), "0.0");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tenths(pub i64);

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "{}.{}", magnitude / 10, magnitude % 10)
    }
}
