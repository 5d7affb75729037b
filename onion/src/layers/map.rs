//! Static in-memory layer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::value::{into_map, nest_keys};
use crate::{ConfigMap, Layer, OnionError, OnionResult};

/// A layer holding a fixed mapping. It never reloads.
#[derive(Debug, Clone)]
pub struct MapLayer {
    name: String,
    data: ConfigMap,
}

impl MapLayer {
    /// Wrap `data` as it is.
    #[must_use]
    pub fn new(name: impl Into<String>, data: ConfigMap) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Wrap a value whose root must be a mapping (or null, meaning empty).
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::NotAMapping`] for any other root.
    pub fn from_value(name: impl Into<String>, value: Value) -> OnionResult<Self> {
        let data = into_map(value).map_err(|found| {
            Arc::new(OnionError::NotAMapping {
                format: "value".to_owned(),
                found,
            })
        })?;
        Ok(Self::new(name, data))
    }

    /// Snapshot a serialisable value, typically a struct of built-in
    /// settings, as a layer.
    ///
    /// Field names follow the value's `Serialize` implementation, so serde
    /// attributes such as `rename` and `skip` apply.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::Load`] when serialisation fails and
    /// [`OnionError::NotAMapping`] when the value is not serialised as a
    /// mapping.
    pub fn from_serialize<T>(name: impl Into<String>, value: &T) -> OnionResult<Self>
    where
        T: Serialize + ?Sized,
    {
        let name = name.into();
        let value = serde_json::to_value(value).map_err(|err| OnionError::load(&name, err))?;
        Self::from_value(name, value)
    }

    /// Wrap flat `data`, splitting every key on `separator` into nested
    /// mappings.
    ///
    /// `{"db_host": "h"}` with separator `_` becomes `{"db": {"host": "h"}}`.
    /// An empty separator leaves keys untouched. When a key is both a leaf
    /// and a prefix of another key, the one sorting later wins.
    #[must_use]
    pub fn with_separator(name: impl Into<String>, data: ConfigMap, separator: &str) -> Self {
        Self::new(name, nest_keys(data, separator))
    }

    /// The wrapped mapping.
    #[must_use]
    pub const fn data(&self) -> &ConfigMap {
        &self.data
    }
}

#[async_trait]
impl Layer for MapLayer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> OnionResult<ConfigMap> {
        Ok(self.data.clone())
    }
}
