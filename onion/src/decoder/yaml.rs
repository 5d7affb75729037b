//! YAML decoding backed by `serde-saphyr`, exposed to `figment` as a
//! provider.

use std::collections::BTreeMap;
use std::io::Read;

use figment::error::Kind;
use figment::value::{Dict, Value as FigmentValue};
use figment::{Figment, Metadata, Profile, Provider};
use serde_saphyr::Options;

use super::{Decoder, read_text, root_mapping};
use crate::{ConfigMap, OnionError, OnionResult};

/// Decodes a YAML document whose root is a mapping.
///
/// Booleans are strict: only `true` and `false` are booleans, so values such
/// as `yes` or `on` stay strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn decode(&self, input: &mut dyn Read) -> OnionResult<ConfigMap> {
        let text = read_text("yaml", input)?;
        let value: serde_json::Value = Figment::from(SaphyrYaml(text))
            .extract()
            .map_err(|err| OnionError::decode("yaml", err))?;
        root_mapping("yaml", value)
    }
}

/// In-memory YAML document as a figment provider.
struct SaphyrYaml(String);

impl SaphyrYaml {
    fn parse(&self) -> Result<FigmentValue, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options(
            &self.0,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::named("Saphyr YAML")
    }

    fn data(&self) -> Result<BTreeMap<Profile, Dict>, figment::Error> {
        let value = match self.parse() {
            // Empty and comment-only documents.
            Ok(FigmentValue::Empty(tag, _)) => FigmentValue::Dict(tag, Dict::new()),
            Ok(value) => value,
            Err(err) => {
                return Err(figment::Error::from(Kind::Message(format!(
                    "invalid YAML: {err}"
                ))));
            }
        };
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}
