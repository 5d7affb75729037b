//! Rendering the combined view of all layers.

use std::io::Write;

use crate::{ConfigMap, Onion, OnionResult, OnionResultExt, merge_maps};

/// Deep-merge every layer snapshot, later layers winning.
///
/// Lazy layers cannot be enumerated and contribute nothing.
#[must_use]
pub fn merged(onion: &Onion) -> ConfigMap {
    let layers = onion.layers_data();
    merge_maps(layers.iter().map(|layer| &**layer))
}

/// Write the merged view to `writer` as pretty-printed JSON followed by a
/// newline.
///
/// # Errors
///
/// Returns [`crate::OnionError::Export`] when serialisation or writing fails.
pub fn write_json<W: Write>(onion: &Onion, mut writer: W) -> OnionResult<()> {
    serde_json::to_writer_pretty(&mut writer, &merged(onion)).into_onion()?;
    writer
        .write_all(b"\n")
        .map_err(serde_json::Error::io)
        .into_onion()
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{merged, write_json};
    use crate::test_support::map;
    use crate::{AnyLayer, MapLayer, Onion, merge_maps};

    #[rstest]
    #[tokio::test]
    async fn export_equals_merge_of_snapshots() -> Result<()> {
        let onion = Onion::with_layers([
            AnyLayer::eager(MapLayer::new("a", map(json!({"db": {"host": "a", "port": 1}})))),
            AnyLayer::eager(MapLayer::new("b", map(json!({"db": {"host": "b"}, "debug": true})))),
        ])
        .await?;
        let snapshots = onion.layers_data();
        let expected = merge_maps(snapshots.iter().map(|layer| &**layer));
        ensure!(merged(&onion) == expected);
        ensure!(
            Value::Object(expected) == json!({"db": {"host": "b", "port": 1}, "debug": true})
        );

        let mut out = Vec::new();
        write_json(&onion, &mut out)?;
        let parsed: Value = serde_json::from_slice(&out)?;
        ensure!(parsed == Value::Object(merged(&onion)));
        ensure!(out.ends_with(b"}\n"));
        Ok(())
    }
}
