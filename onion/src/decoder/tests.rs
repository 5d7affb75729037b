//! Decoder registry and built-in decoder behaviour.

use std::io::{Cursor, Read};
use std::sync::Arc;

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde_json::json;

use super::{Decoder, DecoderRegistry, JsonDecoder};
use crate::test_support::map;
use crate::{ConfigMap, OnionError, OnionResult};

struct Fixed;

impl Decoder for Fixed {
    fn decode(&self, _input: &mut dyn Read) -> OnionResult<ConfigMap> {
        Ok(map(json!({"fixed": true})))
    }
}

fn decode(format: &str, text: &str) -> OnionResult<ConfigMap> {
    DecoderRegistry::default().decode(format, &mut Cursor::new(text.as_bytes().to_vec()))
}

#[rstest]
fn json_keeps_nested_structure() -> Result<()> {
    let decoded = decode("json", r#"{"a": {"b": {"c": 1}}, "list": [1, "x"]}"#)?;
    ensure!(decoded == map(json!({"a": {"b": {"c": 1}}, "list": [1, "x"]})));
    Ok(())
}

#[cfg(feature = "toml")]
#[rstest]
fn toml_tables_become_mappings() -> Result<()> {
    let text = "port = 8080\nratio = 0.5\n[server]\nhost = \"h\"\n[server.tls]\nenabled = true\n";
    let decoded = decode("toml", text)?;
    ensure!(
        decoded
            == map(json!({
                "port": 8080,
                "ratio": 0.5,
                "server": {"host": "h", "tls": {"enabled": true}}
            }))
    );
    ensure!(decode("TML", "x = 1")? == map(json!({"x": 1})));
    Ok(())
}

#[cfg(feature = "toml")]
#[rstest]
fn malformed_toml_is_a_decode_error() -> Result<()> {
    let Err(err) = decode("toml", "port = ") else {
        return Err(anyhow!("malformed TOML decoded"));
    };
    ensure!(matches!(&*err, OnionError::Decode { format, .. } if format == "toml"));
    ensure!(err.to_string().contains("line 1"), "{err}");
    Ok(())
}

#[cfg(feature = "yaml")]
#[rstest]
fn yaml_mappings_are_normalised() -> Result<()> {
    let decoded = decode("yml", "a:\n  b:\n    c: 1\nflag: yes\non: true\n")?;
    ensure!(decoded == map(json!({"a": {"b": {"c": 1}}, "flag": "yes", "on": true})));
    Ok(())
}

#[rstest]
#[case::long_name("properties")]
#[case::short_name("PROPS")]
fn properties_are_built_in(#[case] format: &str) -> Result<()> {
    let decoded = decode(format, "---\nstr=string_data\nbool=true\ninteger=10\n")?;
    ensure!(
        decoded
            == map(json!({"---": "", "str": "string_data", "bool": "true", "integer": "10"}))
    );
    Ok(())
}

#[rstest]
fn json_null_decodes_to_an_empty_map() -> Result<()> {
    ensure!(decode("json", "null")?.is_empty());
    Ok(())
}

#[cfg(feature = "toml")]
#[rstest]
fn blank_toml_decodes_to_an_empty_map() -> Result<()> {
    ensure!(decode("toml", "")?.is_empty());
    Ok(())
}

#[cfg(feature = "yaml")]
#[rstest]
#[case::blank("")]
#[case::comment_only("# only a comment\n")]
fn empty_yaml_decodes_to_an_empty_map(#[case] text: &str) -> Result<()> {
    ensure!(decode("yaml", text)?.is_empty(), "{text:?}");
    Ok(())
}

#[cfg(feature = "yaml")]
#[rstest]
fn yaml_scalar_roots_are_rejected() {
    assert!(decode("yaml", "just text\n").is_err());
}

#[rstest]
#[case::array("[1, 2]", "sequence")]
#[case::scalar("7", "number")]
fn json_root_must_be_a_mapping(#[case] text: &str, #[case] kind: &str) {
    let outcome = decode("json", text);
    assert!(matches!(
        outcome.err().as_deref(),
        Some(OnionError::NotAMapping { found, .. }) if *found == kind
    ));
}

#[rstest]
fn unknown_formats_are_reported() {
    let outcome = decode("ini", "a=1");
    assert!(matches!(outcome.err().as_deref(), Some(OnionError::UnknownFormat(f)) if f == "ini"));
}

#[rstest]
fn duplicate_registration_is_rejected() -> Result<()> {
    let mut registry = DecoderRegistry::default();
    let Err(err) = registry.register(Fixed, &["custom", "JSON"]) else {
        return Err(anyhow!("duplicate format accepted"));
    };
    ensure!(matches!(&*err, OnionError::DuplicateDecoder(f) if f == "json"));
    ensure!(registry.get("custom").is_err(), "partial registration leaked");
    ensure!(
        err.to_string() == "decoder for format 'json' is already registered: you can have only one"
    );
    Ok(())
}

#[rstest]
fn repeated_names_in_one_call_are_rejected() {
    let mut registry = DecoderRegistry::empty();
    assert!(registry.register(Fixed, &["a", "A"]).is_err());
    assert!(registry.formats().is_empty());
}

#[rstest]
fn formats_are_case_insensitive() -> Result<()> {
    let mut registry = DecoderRegistry::empty();
    registry.register(Fixed, &["Custom"])?;
    registry.register(JsonDecoder, &["json"])?;
    ensure!(registry.formats() == vec!["custom", "json"]);
    let decoder: Arc<dyn Decoder> = registry.get("CUSTOM")?;
    ensure!(decoder.decode(&mut Cursor::new(Vec::new()))? == map(json!({"fixed": true})));
    Ok(())
}
