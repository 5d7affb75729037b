//! Primary error enum for layer loading, decoding and export.

use std::error::Error;
use std::path::PathBuf;

use thiserror::Error;

use super::aggregate::AggregatedErrors;

/// Boxed source error carried by several variants.
pub type BoxedSource = Box<dyn Error + Send + Sync>;

/// Errors that can occur while composing configuration layers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OnionError {
    /// A layer failed to produce its initial snapshot.
    #[error("failed to load layer '{layer}': {source}")]
    Load {
        /// Name reported by the failing layer.
        layer: String,
        /// Underlying failure.
        #[source]
        source: BoxedSource,
    },

    /// A layer published a replacement snapshot that could not be produced.
    #[error("failed to reload layer '{layer}': {source}")]
    Reload {
        /// Name reported by the failing layer.
        layer: String,
        /// Underlying failure.
        #[source]
        source: BoxedSource,
    },

    /// No decoder is registered for the requested format.
    #[error("format '{0}' has no registered decoder")]
    UnknownFormat(String),

    /// A decoder was registered twice for the same format.
    #[error("decoder for format '{0}' is already registered: you can have only one")]
    DuplicateDecoder(String),

    /// Payload could not be decoded by the selected decoder.
    #[error("failed to decode '{format}' payload: {source}")]
    Decode {
        /// Format identifier used to pick the decoder.
        format: String,
        /// Underlying parse failure.
        #[source]
        source: BoxedSource,
    },

    /// Decoded payload is valid but its top level is not a mapping.
    #[error("decoded '{format}' payload is a {found}, expected a mapping")]
    NotAMapping {
        /// Format identifier used to pick the decoder.
        format: String,
        /// Kind of value found at the top level.
        found: &'static str,
    },

    /// Cipher rejected the payload.
    #[error("failed to decrypt configuration payload: {0}")]
    Decrypt(#[source] BoxedSource),

    /// Error originating from a configuration file.
    #[error("configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying error reported while reading the file.
        #[source]
        source: BoxedSource,
    },

    /// Folder discovery found no loadable configuration file.
    #[error("no supported '{name}' configuration file in '{folder}'")]
    NoConfigFound {
        /// Folder that was scanned.
        folder: PathBuf,
        /// Configuration name without extension.
        name: String,
    },

    /// A nested default cannot be stored because an intermediate key holds a
    /// non-mapping value.
    #[error("cannot set '{key}': segment '{segment}' is not a mapping")]
    KeyConflict {
        /// Full key passed by the caller.
        key: String,
        /// Segment that already holds a scalar.
        segment: String,
    },

    /// Merged configuration could not be serialised.
    #[error("failed to export configuration: {0}")]
    Export(#[source] serde_json::Error),

    /// Multiple errors occurred during a single operation.
    #[error("multiple configuration errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
