//! Layer of programmatic defaults.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::layer::{LayerPublisher, LayerUpdates};
use crate::registry::DEFAULT_DELIMITER;
use crate::{ConfigMap, Layer, OnionError, OnionResult};

/// Defaults set key by key.
///
/// Register it first so every other layer overrides it. Defaults set after
/// registration are published to the registry like any other reload.
///
/// ```rust
/// use onion::{AnyLayer, DefaultLayer, Onion};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> onion::OnionResult<()> {
/// let defaults = Arc::new(DefaultLayer::new());
/// defaults.set_default("db.pool.size", 8.into())?;
/// let onion = Onion::with_layers([AnyLayer::Eager(defaults.clone())]).await?;
/// assert_eq!(onion.get_int("db.pool.size"), 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DefaultLayer {
    delimiter: RwLock<String>,
    publisher: LayerPublisher,
}

impl DefaultLayer {
    /// An empty defaults layer using `.` as its key delimiter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delimiter: RwLock::new(DEFAULT_DELIMITER.to_owned()),
            publisher: LayerPublisher::new(ConfigMap::new()),
        }
    }

    /// Store `value` at `key`, creating intermediate mappings as needed.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::KeyConflict`] when a parent segment already holds
    /// a non-mapping value; the layer is left unchanged.
    pub fn set_default(&self, key: &str, value: Value) -> OnionResult<()> {
        let delimiter = self.get_delimiter();
        let path: Vec<&str> = key.split(delimiter.as_str()).collect();
        self.publisher
            .update(|data| set_path(data, &path, value).map_err(|segment| conflict(key, segment)))
    }

    /// Delimiter used to split keys passed to [`DefaultLayer::set_default`].
    #[must_use]
    pub fn get_delimiter(&self) -> String {
        self.delimiter.read().clone()
    }

    /// Replace the delimiter. An empty string restores `.`.
    pub fn set_delimiter(&self, delimiter: &str) {
        let delimiter = if delimiter.is_empty() {
            DEFAULT_DELIMITER
        } else {
            delimiter
        };
        delimiter.clone_into(&mut self.delimiter.write());
    }
}

impl Default for DefaultLayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Layer for DefaultLayer {
    fn name(&self) -> &str {
        "defaults"
    }

    async fn load(&self) -> OnionResult<ConfigMap> {
        Ok(self.publisher.current())
    }

    fn watch(&self) -> Option<LayerUpdates> {
        Some(self.publisher.subscribe())
    }
}

fn conflict(key: &str, segment: &str) -> Arc<OnionError> {
    Arc::new(OnionError::KeyConflict {
        key: key.to_owned(),
        segment: segment.to_owned(),
    })
}

/// Insert `value` at `path`, returning the offending segment when a parent
/// is not a mapping.
fn set_path<'p>(scope: &mut ConfigMap, path: &[&'p str], value: Value) -> Result<(), &'p str> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(());
    };
    if rest.is_empty() {
        scope.insert((*first).to_owned(), value);
        return Ok(());
    }
    let child = scope
        .entry(*first)
        .or_insert_with(|| Value::Object(ConfigMap::new()));
    match child {
        Value::Object(inner) => set_path(inner, rest, value),
        _ => Err(*first),
    }
}
