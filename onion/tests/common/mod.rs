//! Helpers shared by the integration tests.

use anyhow::{Result, anyhow};
use onion::{AnyLayer, ConfigMap, MapLayer};
use serde_json::Value;

/// Build an eager in-memory layer from a `json!` object literal.
pub fn layer(name: &str, value: Value) -> Result<AnyLayer> {
    let layer = MapLayer::from_value(name, value)?;
    Ok(AnyLayer::eager(layer))
}

/// Unwrap a `json!` object literal into a [`ConfigMap`].
pub fn map(value: Value) -> Result<ConfigMap> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected an object, got {other}")),
    }
}
