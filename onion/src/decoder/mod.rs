//! Decoders turning byte streams into [`ConfigMap`]s.
//!
//! A [`DecoderRegistry`] maps lower-cased format names (usually file
//! extensions) to decoders. Every decoder normalises its output into the
//! single [`ConfigMap`] representation so lookups never care which format a
//! layer came from.

mod json;
mod properties;
#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "yaml")]
mod yaml;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use crate::{ConfigMap, OnionError, OnionResult};

pub use json::JsonDecoder;
pub use properties::PropertiesDecoder;
#[cfg(feature = "toml")]
pub use self::toml::TomlDecoder;
#[cfg(feature = "yaml")]
pub use self::yaml::YamlDecoder;

/// Converts a stream into a configuration mapping.
pub trait Decoder: Send + Sync {
    /// Decode the whole of `input`.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::Decode`] for malformed input and
    /// [`OnionError::NotAMapping`] when the document root is not a mapping.
    fn decode(&self, input: &mut dyn Read) -> OnionResult<ConfigMap>;
}

/// Format name to decoder table.
///
/// `DecoderRegistry::default()` knows `json`, `properties`/`props`,
/// `toml`/`tml` (feature `toml`)
/// and `yaml`/`yml` (feature `yaml`). Start from [`DecoderRegistry::empty`]
/// to opt out of those.
#[derive(Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn Decoder>>,
}

impl DecoderRegistry {
    /// A registry without any decoder.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register `decoder` under each of `formats`.
    ///
    /// Format names are case-insensitive. Nothing is registered when any of
    /// the names is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::DuplicateDecoder`] naming the first format that
    /// already has a decoder.
    pub fn register<D>(&mut self, decoder: D, formats: &[&str]) -> OnionResult<()>
    where
        D: Decoder + 'static,
    {
        let mut names: Vec<String> = Vec::with_capacity(formats.len());
        for format in formats {
            let name = format.to_ascii_lowercase();
            if self.decoders.contains_key(&name) || names.contains(&name) {
                return Err(Arc::new(OnionError::DuplicateDecoder(name)));
            }
            names.push(name);
        }
        let decoder: Arc<dyn Decoder> = Arc::new(decoder);
        for name in names {
            self.decoders.insert(name, Arc::clone(&decoder));
        }
        Ok(())
    }

    /// The decoder registered for `format`.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::UnknownFormat`] when no decoder handles `format`.
    pub fn get(&self, format: &str) -> OnionResult<Arc<dyn Decoder>> {
        self.decoders
            .get(&format.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| Arc::new(OnionError::UnknownFormat(format.to_owned())))
    }

    /// Decode `input` with the decoder registered for `format`.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::UnknownFormat`] or whatever the decoder reports.
    pub fn decode(&self, format: &str, input: &mut dyn Read) -> OnionResult<ConfigMap> {
        self.get(format)?.decode(input)
    }

    /// Registered format names, sorted.
    #[must_use]
    pub fn formats(&self) -> Vec<&str> {
        let mut formats: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        formats.sort_unstable();
        formats
    }

    fn insert_builtin(&mut self, decoder: Arc<dyn Decoder>, formats: &[&str]) {
        for format in formats {
            if let Entry::Vacant(slot) = self.decoders.entry((*format).to_owned()) {
                slot.insert(Arc::clone(&decoder));
            }
        }
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.insert_builtin(Arc::new(JsonDecoder), &["json"]);
        registry.insert_builtin(Arc::new(PropertiesDecoder), &["properties", "props"]);
        #[cfg(feature = "toml")]
        registry.insert_builtin(Arc::new(TomlDecoder), &["toml", "tml"]);
        #[cfg(feature = "yaml")]
        registry.insert_builtin(Arc::new(YamlDecoder), &["yaml", "yml"]);
        registry
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

/// Read the whole stream as UTF-8 text, attributing failures to `format`.
fn read_text(format: &str, input: &mut dyn Read) -> OnionResult<String> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .map_err(|err| OnionError::decode(format, err))?;
    Ok(text)
}

/// Require a mapping at the document root.
fn root_mapping(format: &str, value: serde_json::Value) -> OnionResult<ConfigMap> {
    crate::value::into_map(value).map_err(|found| {
        Arc::new(OnionError::NotAMapping {
            format: format.to_owned(),
            found,
        })
    })
}

#[cfg(test)]
mod tests;
