//! Constructors shared by the registry and the concrete layers.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use super::{AggregatedErrors, OnionError};

impl OnionError {
    /// Collapse a list of failures into one error.
    ///
    /// Returns `None` for an empty list, the error itself when exactly one
    /// uniquely owned error is supplied, and [`Self::Aggregate`] otherwise.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Arc<Self>>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.len() <= 1 {
            return arcs.pop();
        }
        Some(Arc::new(Self::Aggregate(Box::new(AggregatedErrors::new(
            arcs,
        )))))
    }

    /// Wrap an initial-load failure for `layer`.
    #[must_use]
    pub fn load(layer: &str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Arc<Self> {
        Arc::new(Self::Load {
            layer: layer.to_owned(),
            source: source.into(),
        })
    }

    /// Wrap a background reload failure for `layer`.
    #[must_use]
    pub fn reload(layer: &str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Arc<Self> {
        Arc::new(Self::Reload {
            layer: layer.to_owned(),
            source: source.into(),
        })
    }

    /// Wrap a decoder failure for `format`.
    #[must_use]
    pub fn decode(format: &str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Arc<Self> {
        Arc::new(Self::Decode {
            format: format.to_owned(),
            source: source.into(),
        })
    }

    /// Construct an [`OnionError::File`] for a configuration path.
    #[must_use]
    pub fn file(path: &Path, source: impl Into<Box<dyn Error + Send + Sync>>) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }
}
