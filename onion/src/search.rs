//! Path-based lookup over nested configuration maps.

use serde_json::Value;

use crate::ConfigMap;

/// Return the value stored at `path` inside `map`.
///
/// Each segment must match a key exactly. The final segment may hold any kind
/// of value; every earlier segment must hold a mapping, otherwise the lookup
/// misses. An empty path never matches.
///
/// # Examples
///
/// ```rust
/// use onion::search;
/// use serde_json::json;
///
/// let data = json!({"db": {"host": "localhost"}});
/// let map = data.as_object().expect("object");
/// assert_eq!(search(map, &["db", "host"]), Some(&json!("localhost")));
/// assert_eq!(search(map, &["db", "host", "name"]), None);
/// assert_eq!(search(map, &[]), None);
/// ```
#[must_use]
pub fn search<'a>(map: &'a ConfigMap, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let value = map.get(*first)?;
    if rest.is_empty() {
        return Some(value);
    }
    match value {
        Value::Object(child) => search(child, rest),
        _ => None,
    }
}
