//! Parser for duration literals such as `300ms`, `1h2m3s` or `1.5h`.
//!
//! A literal is an optional sign followed by one or more decimal numbers,
//! each with an optional fraction and a mandatory unit. Recognised units are
//! `ns`, `us` (also `µs` and `μs`), `ms`, `s`, `m` and `h`. The bare literal
//! `0` needs no unit. Negative durations cannot be represented and are
//! rejected unless they are zero.

use std::time::Duration;

use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Largest accepted duration, matching a signed 64-bit nanosecond count.
const MAX_NANOS: u128 = i64::MAX as u128;

/// Fraction digits beyond this many cannot change a nanosecond count.
const MAX_FRACTION_DIGITS: usize = 18;

/// Reasons a duration literal is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DurationError {
    /// The literal is malformed.
    #[error("invalid duration {0:?}")]
    Invalid(String),
    /// A number is not followed by a unit.
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    /// The unit is not recognised.
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// Offending unit.
        unit: String,
        /// Whole literal.
        input: String,
    },
    /// The literal is negative and non-zero.
    #[error("negative duration {0:?}")]
    Negative(String),
    /// The literal exceeds the representable range.
    #[error("duration {0:?} out of range")]
    Overflow(String),
}

/// Parse a duration literal.
///
/// # Errors
///
/// Returns a [`DurationError`] describing why `input` is not a valid,
/// non-negative duration.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use onion::parse_duration;
///
/// assert_eq!(parse_duration("1h2m3s"), Ok(Duration::from_secs(3723)));
/// assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
/// assert!(parse_duration("10").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid(input.to_owned());
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    if body == "0" {
        return Ok(Duration::ZERO);
    }
    if body.is_empty() {
        return Err(invalid());
    }

    let mut rest = body;
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_number) = match after_whole.strip_prefix('.') {
            Some(tail) => split_digits(tail),
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let unit_end = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, tail) = after_number.split_at(unit_end);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_owned()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_owned(),
            input: input.to_owned(),
        })?;
        let component = component_nanos(whole, fraction, scale)
            .ok_or_else(|| DurationError::Overflow(input.to_owned()))?;
        total = total
            .checked_add(component)
            .filter(|sum| *sum <= MAX_NANOS)
            .ok_or_else(|| DurationError::Overflow(input.to_owned()))?;
        rest = tail;
    }

    if negative && total != 0 {
        return Err(DurationError::Negative(input.to_owned()));
    }
    let nanos = u64::try_from(total).map_err(|_| DurationError::Overflow(input.to_owned()))?;
    Ok(Duration::from_nanos(nanos))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

fn component_nanos(whole: &str, fraction: &str, scale: u128) -> Option<u128> {
    let whole_nanos = digits_value(whole)?.checked_mul(scale)?;
    let kept = fraction.get(..MAX_FRACTION_DIGITS).unwrap_or(fraction);
    if kept.is_empty() {
        return Some(whole_nanos);
    }
    let numerator = digits_value(kept)?;
    let denominator = 10_u128.checked_pow(u32::try_from(kept.len()).ok()?)?;
    let fraction_nanos = numerator.checked_mul(scale)?.checked_div(denominator)?;
    whole_nanos.checked_add(fraction_nanos)
}

fn digits_value(digits: &str) -> Option<u128> {
    digits.bytes().try_fold(0_u128, |acc, digit| {
        acc.checked_mul(10)?.checked_add(u128::from(digit - b'0'))
    })
}
