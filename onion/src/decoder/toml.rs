//! TOML decoding through `figment`.

use std::io::Read;

use figment::Figment;
use figment::providers::{Format, Toml};

use super::{Decoder, read_text, root_mapping};
use crate::{ConfigMap, OnionError, OnionResult};

/// Decodes a TOML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlDecoder;

impl Decoder for TomlDecoder {
    fn decode(&self, input: &mut dyn Read) -> OnionResult<ConfigMap> {
        let text = read_text("toml", input)?;
        let value: serde_json::Value = Figment::from(Toml::string(&text))
            .extract()
            .map_err(|err| OnionError::decode("toml", err))?;
        root_mapping("toml", value)
    }
}
