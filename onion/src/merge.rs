//! Deep merge of layer snapshots.
//!
//! Used to flatten [`crate::Onion::layers_data`] into one document for export
//! and by anything else that needs the combined view rather than a single
//! lookup.

use serde_json::{Map, Value};

use crate::ConfigMap;

/// Merge `maps` in order, later entries taking precedence.
///
/// Mappings found at the same key in several inputs are merged recursively.
/// Any other value (scalar or sequence) replaces what earlier inputs held at
/// that key, and a mapping arriving over a scalar (or the reverse) replaces
/// it outright.
///
/// # Examples
///
/// ```rust
/// use onion::merge_maps;
/// use serde_json::json;
///
/// let a = json!({"x": {"y": 1}, "keep": true});
/// let b = json!({"x": {"z": 2}});
/// let merged = merge_maps([a.as_object().unwrap(), b.as_object().unwrap()]);
/// assert_eq!(
///     serde_json::Value::Object(merged),
///     json!({"x": {"y": 1, "z": 2}, "keep": true})
/// );
/// ```
#[must_use]
pub fn merge_maps<'a, I>(maps: I) -> ConfigMap
where
    I: IntoIterator<Item = &'a ConfigMap>,
{
    let mut acc = Value::Object(Map::new());
    for map in maps {
        merge_object(&mut acc, map.clone());
    }
    match acc {
        Value::Object(map) => map,
        _ => ConfigMap::new(),
    }
}

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - When merging an object into a non-object target, target is initialised
///   to `{}` first, so the object wins outright.
/// - Objects are merged recursively (keys are added or overwritten, and nested
///   objects are overlaid).
/// - Arrays and scalars replace `target` wholesale (no deep merge for arrays).
///
/// # Examples
///
/// ```rust
/// use onion::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3}));
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
///
/// merge_value(&mut acc, json!({"b": [1, 2, 3]}));
/// assert_eq!(acc["b"], json!([1, 2, 3]));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => merge_object(target, map),
        _ => *target = layer,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}
