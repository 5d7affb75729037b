//! Contracts implemented by configuration sources.
//!
//! Two kinds of source exist. An eager [`Layer`] hands the registry a full
//! [`ConfigMap`] snapshot and may announce replacement snapshots later through
//! a [`LayerUpdates`] channel. A [`LazyLayer`] never materialises a snapshot
//! and answers individual path queries instead, which suits sources that are
//! too large or too dynamic to copy.

mod publisher;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::{ConfigMap, OnionResult};

pub use publisher::LayerPublisher;

/// One message on a layer's update channel: either a replacement snapshot or
/// the reason a replacement could not be produced.
pub type LayerUpdate = OnionResult<ConfigMap>;

/// Receiving side of a layer's update channel.
///
/// The registry waits for changes on this receiver. Dropping every sender
/// closes the channel, which the registry treats as "stop watching".
pub type LayerUpdates = watch::Receiver<LayerUpdate>;

/// A configuration source that produces full snapshots.
#[async_trait]
pub trait Layer: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Produce the initial snapshot. May perform slow I/O.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::OnionError`] when the source cannot be read; the
    /// registry then refuses to register the layer.
    async fn load(&self) -> OnionResult<ConfigMap>;

    /// Subscribe to future replacement snapshots.
    ///
    /// Returns `None` for sources that never change. The registry subscribes
    /// before calling [`Layer::load`] so no update published in between is
    /// lost. Values already current at subscription time are not replayed.
    fn watch(&self) -> Option<LayerUpdates> {
        None
    }
}

/// A configuration source that resolves paths on demand.
pub trait LazyLayer: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Resolve `path` (already split by the registry delimiter).
    fn get(&self, path: &[&str]) -> Option<Value>;
}

/// A layer of either kind, as accepted by [`crate::Onion::add_layers`].
#[derive(Clone)]
pub enum AnyLayer {
    /// Snapshot-producing layer.
    Eager(Arc<dyn Layer>),
    /// Per-path resolving layer.
    Lazy(Arc<dyn LazyLayer>),
}

impl AnyLayer {
    /// Wrap an eager layer.
    pub fn eager<L: Layer + 'static>(layer: L) -> Self {
        Self::Eager(Arc::new(layer))
    }

    /// Wrap a lazy layer.
    pub fn lazy<L: LazyLayer + 'static>(layer: L) -> Self {
        Self::Lazy(Arc::new(layer))
    }

    /// Name reported by the wrapped layer.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Eager(layer) => layer.name(),
            Self::Lazy(layer) => layer.name(),
        }
    }
}

impl fmt::Debug for AnyLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eager(layer) => f.debug_tuple("Eager").field(&layer.name()).finish(),
            Self::Lazy(layer) => f.debug_tuple("Lazy").field(&layer.name()).finish(),
        }
    }
}

impl From<Arc<dyn Layer>> for AnyLayer {
    fn from(layer: Arc<dyn Layer>) -> Self {
        Self::Eager(layer)
    }
}

impl From<Arc<dyn LazyLayer>> for AnyLayer {
    fn from(layer: Arc<dyn LazyLayer>) -> Self {
        Self::Lazy(layer)
    }
}
