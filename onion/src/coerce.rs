//! Conversions from stored values to the types requested by accessors.
//!
//! Every function returns `None` when the value cannot be represented in the
//! requested type; callers substitute their default. Strings are parsed
//! because sources such as the environment only ever yield text.

use std::time::Duration;

use serde_json::{Number, Value};

use crate::parse_duration;

/// Signed 64-bit integer from an integer, a float (truncated toward zero) or
/// a base-10 string.
#[must_use]
pub fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => number_to_i64(n),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Signed 32-bit integer with the rules of [`to_i64`]; out-of-range values
/// are rejected.
#[must_use]
pub fn to_i32(value: &Value) -> Option<i32> {
    to_i64(value).and_then(|n| i32::try_from(n).ok())
}

/// 64-bit float from any number or a decimal string.
#[must_use]
pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// 32-bit float with the rules of [`to_f64`].
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "narrowing to f32 is the requested conversion"
)]
pub fn to_f32(value: &Value) -> Option<f32> {
    to_f64(value).map(|f| f as f32)
}

/// Boolean from a bool or one of the literals `1 t T TRUE true True` and
/// `0 f F FALSE false False`.
#[must_use]
pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse_bool(s),
        _ => None,
    }
}

/// Borrow a native string; no other kind is converted.
#[must_use]
pub const fn to_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Duration from a non-negative nanosecond count or a duration literal.
#[must_use]
pub fn to_duration(value: &Value) -> Option<Duration> {
    match value {
        Value::Number(n) => number_to_nanos(n).map(Duration::from_nanos),
        Value::String(s) => parse_duration(s).ok(),
        _ => None,
    }
}

/// List of strings from a sequence of strings, or from a non-empty string
/// split on commas.
///
/// A sequence containing anything but strings yields `None`, as does every
/// other kind of value.
#[must_use]
pub fn to_string_slice(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| to_str(item).map(str::to_owned))
            .collect(),
        Value::String(s) if !s.is_empty() => Some(s.split(',').map(str::to_owned).collect()),
        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "floats are truncated toward zero after the range check"
)]
fn number_to_i64(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        return None;
    }
    let f = n.as_f64()?.trunc();
    (f.is_finite() && f >= -(2_f64.powi(63)) && f < 2_f64.powi(63)).then_some(f as i64)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "floats are truncated toward zero after the range check"
)]
fn number_to_nanos(n: &Number) -> Option<u64> {
    if let Some(u) = n.as_u64() {
        return Some(u);
    }
    if n.is_i64() {
        return None;
    }
    let f = n.as_f64()?.trunc();
    (f.is_finite() && f >= 0.0 && f < 2_f64.powi(64)).then_some(f as u64)
}
