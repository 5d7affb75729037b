//! JSON decoding through `serde_json`.

use std::io::Read;

use super::{Decoder, root_mapping};
use crate::{ConfigMap, OnionError, OnionResult};

/// Decodes a JSON document whose root is an object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode(&self, input: &mut dyn Read) -> OnionResult<ConfigMap> {
        let value: serde_json::Value =
            serde_json::from_reader(input).map_err(|err| OnionError::decode("json", err))?;
        root_mapping("json", value)
    }
}
