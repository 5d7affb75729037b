//! Value model shared by every layer.
//!
//! Leaves are [`serde_json::Value`]s and every nested block is a
//! [`ConfigMap`]. Decoders normalise whatever their format produces into this
//! single representation, so nothing downstream needs to care which format a
//! mapping came from.

use serde_json::{Map, Value};

/// String-keyed mapping stored by eager layers.
pub type ConfigMap = Map<String, Value>;

/// Human-readable name of a value's kind, used in error messages.
#[must_use]
pub const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Unwrap a decoded document into its top-level mapping.
///
/// Returns the kind of the value on failure so callers can report it.
pub(crate) fn into_map(value: Value) -> Result<ConfigMap, &'static str> {
    match value {
        Value::Object(map) => Ok(map),
        // An empty document is treated as an empty mapping.
        Value::Null => Ok(ConfigMap::new()),
        other => Err(kind_name(&other)),
    }
}

/// Build a nested mapping holding `value` at `path`.
///
/// `nest(&["db", "host"], v)` yields `{"db": {"host": v}}`. An empty path
/// yields an empty mapping.
#[must_use]
pub fn nest(path: &[&str], value: Value) -> ConfigMap {
    let Some((last, parents)) = path.split_last() else {
        return ConfigMap::new();
    };
    let mut map = ConfigMap::new();
    map.insert((*last).to_owned(), value);
    for segment in parents.iter().rev() {
        let mut outer = ConfigMap::new();
        outer.insert((*segment).to_owned(), Value::Object(map));
        map = outer;
    }
    map
}

/// Split every key of flat `data` on `separator` and merge the results into
/// one nested mapping, in key order.
///
/// When a key is both a leaf and a prefix of another key, the one merged
/// later wins.
pub(crate) fn nest_keys(data: ConfigMap, separator: &str) -> ConfigMap {
    if separator.is_empty() {
        return data;
    }
    let mut nested = Value::Object(ConfigMap::new());
    for (key, value) in data {
        let path: Vec<&str> = key.split(separator).collect();
        crate::merge_value(&mut nested, Value::Object(nest(&path, value)));
    }
    match nested {
        Value::Object(map) => map,
        _ => ConfigMap::new(),
    }
}
