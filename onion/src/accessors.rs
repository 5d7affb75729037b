//! Typed accessors on [`Onion`].
//!
//! Each accessor looks the key up with [`Onion::get`] and converts the hit
//! with the matching function from [`crate::coerce`]. A missing key or a
//! value that does not convert yields the default; the zero-default forms
//! use the type's zero value.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::Onion;
use crate::coerce;

impl Onion {
    /// `i32` at `key`, or `default`. Values outside the `i32` range fall back
    /// to `default`.
    #[must_use]
    pub fn get_int_default(&self, key: &str, default: i32) -> i32 {
        self.get(key)
            .and_then(|v| coerce::to_i32(&v))
            .unwrap_or(default)
    }

    /// `i32` at `key`, or `0`.
    #[must_use]
    pub fn get_int(&self, key: &str) -> i32 {
        self.get_int_default(key, 0)
    }

    /// `i64` at `key`, or `default`.
    #[must_use]
    pub fn get_int64_default(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| coerce::to_i64(&v))
            .unwrap_or(default)
    }

    /// `i64` at `key`, or `0`.
    #[must_use]
    pub fn get_int64(&self, key: &str) -> i64 {
        self.get_int64_default(key, 0)
    }

    /// `f32` at `key`, or `default`.
    #[must_use]
    pub fn get_float32_default(&self, key: &str, default: f32) -> f32 {
        self.get(key)
            .and_then(|v| coerce::to_f32(&v))
            .unwrap_or(default)
    }

    /// `f32` at `key`, or `0.0`.
    #[must_use]
    pub fn get_float32(&self, key: &str) -> f32 {
        self.get_float32_default(key, 0.0)
    }

    /// `f64` at `key`, or `default`.
    #[must_use]
    pub fn get_float64_default(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(|v| coerce::to_f64(&v))
            .unwrap_or(default)
    }

    /// `f64` at `key`, or `0.0`.
    #[must_use]
    pub fn get_float64(&self, key: &str) -> f64 {
        self.get_float64_default(key, 0.0)
    }

    /// `bool` at `key`, or `default`.
    #[must_use]
    pub fn get_bool_default(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|v| coerce::to_bool(&v))
            .unwrap_or(default)
    }

    /// `bool` at `key`, or `false`.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        self.get_bool_default(key, false)
    }

    /// String at `key`, or `default`. Only native strings are returned;
    /// numbers and booleans are not stringified.
    #[must_use]
    pub fn get_string_default(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(|v| coerce::to_str(&v).map(str::to_owned))
            .unwrap_or_else(|| default.to_owned())
    }

    /// String at `key`, or the empty string.
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.get_string_default(key, "")
    }

    /// Duration at `key`, or `default`.
    ///
    /// Integers and floats are read as nanoseconds; strings use the literal
    /// grammar of [`crate::parse_duration`].
    #[must_use]
    pub fn get_duration_default(&self, key: &str, default: Duration) -> Duration {
        self.get(key)
            .and_then(|v| coerce::to_duration(&v))
            .unwrap_or(default)
    }

    /// Duration at `key`, or zero.
    #[must_use]
    pub fn get_duration(&self, key: &str) -> Duration {
        self.get_duration_default(key, Duration::ZERO)
    }

    /// List of strings at `key`.
    ///
    /// A sequence must hold only strings; a plain non-empty string is split on
    /// commas. Anything else, including a missing key, is `None`.
    #[must_use]
    pub fn get_string_slice(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).and_then(|v| coerce::to_string_slice(&v))
    }

    /// Deserialise the value at `key` into `T`.
    ///
    /// Only the first layer holding `key` is consulted, as with every other
    /// accessor; no coercion is applied. `None` when the key is missing or
    /// the value does not fit `T`.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| serde_json::from_value(v).ok())
    }
}
