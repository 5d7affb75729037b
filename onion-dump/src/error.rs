//! Error types for `onion-dump`.

use std::sync::Arc;

use onion::OnionError;
use thiserror::Error;

/// Errors surfaced while composing or printing the configuration.
#[derive(Debug, Error)]
pub enum DumpError {
    /// A layer could not be built or loaded.
    #[error("configuration error: {0}")]
    Config(#[from] Arc<OnionError>),

    /// `--key` named a key no layer provides.
    #[error("key '{0}' not found")]
    KeyNotFound(String),

    /// The selected value could not be serialised.
    #[error("failed to render value: {0}")]
    Render(#[from] serde_json::Error),

    /// Writing to the output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
