//! Nested lookups resolve the same way whichever decoder produced the map.

mod common;

use std::path::Path;

use anyhow::Result;
use onion::{AnyLayer, DecoderRegistry, FileLayer, Onion};
use rstest::{fixture, rstest};
use serde_json::json;
use test_helpers::files::ConfigDir;

#[fixture]
fn dir() -> ConfigDir {
    match ConfigDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("temporary directory: {err}"),
    }
}

async fn onion_for(path: &Path) -> Result<Onion> {
    let layer = FileLayer::open(path, None, &DecoderRegistry::default())?;
    Ok(Onion::with_layers([AnyLayer::eager(layer)]).await?)
}

async fn assert_nested(dir: &ConfigDir, file: &str, contents: &str) -> Result<()> {
    let path = dir.write(file, contents)?;
    let onion = onion_for(&path).await?;

    assert_eq!(onion.get("a.b.c"), Some(json!(42)));
    assert_eq!(onion.get_int("a.b.c"), 42);
    assert_eq!(onion.get_string("a.b.d"), "x");
    assert_eq!(onion.get("a.b"), Some(json!({"c": 42, "d": "x"})));
    assert_eq!(onion.get("a.b.c.deeper"), None);
    assert_eq!(onion.get("list"), Some(json!([1, 2])));
    Ok(())
}

#[rstest]
#[case::json("cfg.json", r#"{"a": {"b": {"c": 42, "d": "x"}}, "list": [1, 2]}"#)]
#[case::toml("cfg.toml", "list = [1, 2]\n[a.b]\nc = 42\nd = \"x\"\n")]
#[tokio::test]
async fn nested_keys_resolve_across_decoders(
    dir: ConfigDir,
    #[case] file: &str,
    #[case] contents: &str,
) -> Result<()> {
    assert_nested(&dir, file, contents).await
}

#[cfg(feature = "yaml")]
#[rstest]
#[tokio::test]
async fn nested_keys_resolve_in_yaml(dir: ConfigDir) -> Result<()> {
    assert_nested(&dir, "cfg.yaml", "a:\n  b:\n    c: 42\n    d: x\nlist: [1, 2]\n").await
}

#[rstest]
#[tokio::test]
async fn later_file_overrides_earlier_one(dir: ConfigDir) -> Result<()> {
    let base = dir.write("base.json", r#"{"server": {"host": "a", "port": 80}}"#)?;
    let local = dir.write("local.toml", "[server]\nport = 8080\n")?;
    let decoders = DecoderRegistry::default();
    let layers = [&base, &local]
        .into_iter()
        .map(|path| FileLayer::open(path, None, &decoders).map(AnyLayer::eager))
        .collect::<Result<Vec<_>, _>>()?;
    let onion = Onion::with_layers(layers).await?;

    assert_eq!(onion.get_int("server.port"), 8080);
    // Lookups do not merge: the later layer's mapping shadows the earlier one.
    assert_eq!(onion.get("server"), Some(json!({"port": 8080})));
    assert_eq!(
        onion::export::merged(&onion),
        common::map(json!({"server": {"host": "a", "port": 8080}}))?
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn discovery_skips_broken_candidates(dir: ConfigDir) -> Result<()> {
    dir.write("app.json", "{ not json")?;
    dir.write("app.toml", "mode = \"toml\"\n")?;
    dir.write("other.json", r#"{"mode": "other"}"#)?;

    let layer = FileLayer::discover(dir.path(), "app", None, &DecoderRegistry::default())?;
    assert!(layer.path().ends_with("app.toml"));

    let onion = Onion::with_layers([AnyLayer::eager(layer), common::layer("none", json!({}))?])
        .await?;
    assert_eq!(onion.get_string("mode"), "toml");
    Ok(())
}
