//! Library side of `onion-dump`: builds a registry from command-line
//! arguments and prints its merged view or a single value.

pub mod cli;
pub mod error;

use std::io::Write;

use onion::{AnyLayer, DecoderRegistry, EnvLayer, FileLayer, Onion, export};
use serde_json::Value;
use tracing::debug;

use crate::cli::Args;
use crate::error::DumpError;

/// Build the registry described by `args`.
///
/// # Errors
///
/// Returns [`DumpError::Config`] when a file cannot be discovered, opened or
/// decoded.
pub async fn compose(args: &Args) -> Result<Onion, DumpError> {
    let decoders = DecoderRegistry::default();
    let mut layers = Vec::new();

    if let (Some(folder), Some(name)) = (&args.folder, &args.name) {
        let found = FileLayer::discover(folder, name, None, &decoders)?;
        debug!(path = %found.path().display(), "discovered configuration file");
        layers.push(AnyLayer::eager(found));
    }
    for path in &args.file {
        layers.push(AnyLayer::eager(FileLayer::open(path, None, &decoders)?));
    }
    if !args.env.is_empty() {
        let whitelist: Vec<&str> = args.env.iter().map(String::as_str).collect();
        layers.push(AnyLayer::eager(EnvLayer::new(&args.env_separator, &whitelist)));
    }

    let onion = Onion::with_layers(layers).await?;
    onion.set_delimiter(&args.delimiter);
    debug!(layers = onion.layer_count(), "composed configuration");
    Ok(onion)
}

/// Compose the registry and write the requested output to `out`.
///
/// Strings selected with `--key` are printed bare; every other value is
/// printed as pretty JSON.
///
/// # Errors
///
/// Returns a [`DumpError`] when composition fails, the key is absent, or the
/// output cannot be written.
pub async fn run<W: Write>(args: &Args, mut out: W) -> Result<(), DumpError> {
    let onion = compose(args).await?;
    let Some(key) = &args.key else {
        export::write_json(&onion, out)?;
        return Ok(());
    };
    match onion.get(key) {
        None => return Err(DumpError::KeyNotFound(key.clone())),
        Some(Value::String(text)) => writeln!(out, "{text}")?,
        Some(value) => {
            serde_json::to_writer_pretty(&mut out, &value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
