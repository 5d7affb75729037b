//! Composition of real layers and reload propagation end to end.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use onion::{
    AnyLayer, DecoderRegistry, DefaultLayer, FileLayer, Onion, PrefixedEnvLayer, RefWatch,
    ReloadFailure, merge_maps,
};
use rstest::rstest;
use serde_json::json;
use serial_test::serial;
use test_helpers::{env, files::ConfigDir};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(5);

#[rstest]
#[serial]
#[tokio::test]
async fn defaults_file_and_environment_compose() -> Result<()> {
    let dir = ConfigDir::new()?;
    let path = dir.write("svc.toml", "[db]\nhost = \"file-host\"\nport = 5432\n")?;
    let _user = env::set_var("ONIONIT_DB_USER", "env-user");
    let _host = env::remove_var("ONIONIT_DB_HOST");

    let defaults = Arc::new(DefaultLayer::new());
    defaults.set_default("db.host", json!("localhost"))?;
    defaults.set_default("db.user", json!("nobody"))?;
    defaults.set_default("db.pool", json!(4))?;
    let file = FileLayer::open(&path, None, &DecoderRegistry::default())?;

    let onion = Onion::with_layers([
        AnyLayer::Eager(defaults),
        AnyLayer::eager(file),
        AnyLayer::lazy(PrefixedEnvLayer::new("onionit")),
    ])
    .await?;

    assert_eq!(onion.get_string("db.host"), "file-host");
    assert_eq!(onion.get_string("db.user"), "env-user");
    assert_eq!(onion.get_int("db.pool"), 4);
    assert_eq!(onion.get_int("db.port"), 5432);
    assert_eq!(onion.layer_count(), 3);

    let layers = onion.layers_data();
    assert_eq!(
        onion::export::merged(&onion),
        merge_maps(layers.iter().map(|layer| &**layer))
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn refreshed_file_fires_signal_and_updates_watched_values() -> Result<()> {
    let dir = ConfigDir::new()?;
    let path = dir.write("app.json", r#"{"port": 8080, "name": "first"}"#)?;
    let file = Arc::new(FileLayer::open(&path, None, &DecoderRegistry::default())?);
    let onion = Onion::with_layers([AnyLayer::Eager(file.clone())]).await?;

    let refs = Arc::new(RefWatch::new());
    let port = refs.register("port", 0_i32);
    let cancel = CancellationToken::new();
    let mut refreshed = refs.watch(&onion, cancel.clone());
    assert_eq!(port.get(), 8080);

    let signal = onion.reload_watch();
    dir.write("app.json", r#"{"port": 9090, "name": "second"}"#)?;
    file.refresh()?;

    assert!(timeout(WAIT, signal.fired()).await?);
    assert_eq!(onion.get_string("name"), "second");
    timeout(WAIT, refreshed.changed()).await??;
    assert_eq!(port.get(), 9090);

    cancel.cancel();
    Ok(())
}

#[rstest]
#[tokio::test]
async fn broken_refresh_keeps_previous_snapshot() -> Result<()> {
    let dir = ConfigDir::new()?;
    let path = dir.write("app.json", r#"{"level": "info"}"#)?;
    let file = Arc::new(FileLayer::open(&path, None, &DecoderRegistry::default())?);
    let (tx, mut failures) = tokio::sync::mpsc::unbounded_channel();
    let onion = Onion::builder()
        .reload_failure_reporter(Arc::new(move |failure: &ReloadFailure| {
            tx.send(failure.clone()).ok();
        }))
        .build();
    onion.add_layers([AnyLayer::Eager(file.clone())]).await?;

    let signal = onion.reload_watch();
    dir.write("app.json", "{ broken")?;
    assert!(file.refresh().is_err());

    let failure = timeout(WAIT, failures.recv())
        .await?
        .ok_or_else(|| anyhow!("reporter channel closed"))?;
    assert_eq!(failure.layer, path.display().to_string());
    assert!(!signal.has_fired());
    assert_eq!(onion.get_string("level"), "info");
    Ok(())
}

#[rstest]
#[tokio::test]
async fn polling_picks_up_file_changes() -> Result<()> {
    let dir = ConfigDir::new()?;
    let path = dir.write("poll.json", r#"{"v": 1}"#)?;
    let file = Arc::new(FileLayer::open(&path, None, &DecoderRegistry::default())?);
    let cancel = CancellationToken::new();
    let onion = Onion::with_cancellation(&cancel);
    onion.add_layers([AnyLayer::Eager(file.clone())]).await?;
    let poller = file.spawn_polling(Duration::from_millis(20), cancel.clone());

    // Let the poller record its baseline fingerprint first.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let first = onion.reload_watch();
    // A different length guarantees a new fingerprint even on coarse clocks.
    dir.write("poll.json", r#"{"v": 22}"#)?;
    timeout(WAIT, async {
        loop {
            let signal = onion.reload_watch();
            if onion.get_int("v") == 22 {
                break;
            }
            signal.fired().await;
        }
    })
    .await?;
    assert!(first.has_fired());

    cancel.cancel();
    timeout(WAIT, poller).await??;
    Ok(())
}
