//! Whitelisted environment variables as a layer.

use async_trait::async_trait;
use figment::providers::Env;
use serde_json::Value;

use super::MapLayer;
use crate::{ConfigMap, Layer, OnionResult};

/// Snapshot of selected environment variables.
///
/// Only the listed variables are read, once, at construction. Names are
/// matched exactly, lower-cased to form keys, and split on `separator` into
/// nested mappings. Variables that are unset or empty are skipped. Values are
/// always strings; the typed accessors parse them on demand.
///
/// With separator `_`, `APP_PORT=80` becomes `{"app": {"port": "80"}}`.
#[derive(Debug, Clone)]
pub struct EnvLayer {
    inner: MapLayer,
}

impl EnvLayer {
    /// Read the variables named in `whitelist`.
    #[must_use]
    pub fn new(separator: &str, whitelist: &[&str]) -> Self {
        let names: Vec<String> = whitelist.iter().map(|name| (*name).to_owned()).collect();
        let provider = Env::raw().filter(move |key| names.iter().any(|name| name == key.as_str()));
        let data: ConfigMap = provider
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str().to_ascii_lowercase(), Value::String(value)))
            .collect();
        Self {
            inner: MapLayer::with_separator("environment", data, separator),
        }
    }

    /// The captured variables as nested mappings.
    #[must_use]
    pub const fn data(&self) -> &ConfigMap {
        self.inner.data()
    }
}

#[async_trait]
impl Layer for EnvLayer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn load(&self) -> OnionResult<ConfigMap> {
        self.inner.load().await
    }
}
