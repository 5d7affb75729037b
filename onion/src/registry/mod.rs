//! The layer registry.
//!
//! [`Onion`] owns the ordered list of layers, their latest snapshots, the key
//! delimiter and the reload signal. Readers clone an `Arc` of the layer list
//! under a short read lock and search it without holding the lock, so a slow
//! lazy layer never stalls writers and a writer never stalls readers for
//! longer than a pointer swap.

mod listener;
mod signal;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::layer::{AnyLayer, LayerUpdates, LazyLayer};
use crate::{ConfigMap, Layer, OnionError, OnionResult, search};

pub use listener::{ReloadFailure, ReloadFailureReporter};
pub use signal::ReloadSignal;

/// Delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = ".";

/// Layered configuration registry.
///
/// Cloning an `Onion` yields another handle to the same registry. Background
/// listeners stop when the cancellation token supplied at construction is
/// cancelled or when the last handle is dropped.
///
/// # Examples
///
/// ```rust
/// use onion::{AnyLayer, MapLayer, Onion};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> onion::OnionResult<()> {
/// let onion = Onion::new();
/// onion
///     .add_layers([
///         AnyLayer::eager(MapLayer::from_value("defaults", json!({"port": "8080"}))?),
///         AnyLayer::eager(MapLayer::from_value("overrides", json!({"port": 8443}))?),
///     ])
///     .await?;
/// assert_eq!(onion.get_int_default("port", 0), 8443);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Onion {
    shared: Arc<Shared>,
}

struct Shared {
    state: RwLock<State>,
    reload: watch::Sender<u64>,
    cancel: CancellationToken,
    reporter: ReloadFailureReporter,
}

struct State {
    delimiter: Arc<str>,
    layers: Arc<Vec<Slot>>,
}

#[derive(Clone)]
enum Slot {
    Eager {
        layer: Arc<dyn Layer>,
        snapshot: Arc<ConfigMap>,
    },
    Lazy(Arc<dyn LazyLayer>),
}

impl Slot {
    fn lookup(&self, path: &[&str]) -> Option<Value> {
        match self {
            Self::Eager { snapshot, .. } => search(snapshot, path).cloned(),
            Self::Lazy(layer) => layer.get(path),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Eager { layer, .. } => layer.name(),
            Self::Lazy(layer) => layer.name(),
        }
    }
}

/// A layer whose initial load succeeded but which is not registered yet.
struct Prepared {
    slot: Slot,
    updates: Option<LayerUpdates>,
}

/// Builder for an [`Onion`] with a caller-owned cancellation token or a
/// custom reload failure reporter.
#[derive(Default)]
pub struct OnionBuilder {
    cancel: Option<CancellationToken>,
    reporter: Option<ReloadFailureReporter>,
}

impl OnionBuilder {
    /// Stop background listeners when `token` is cancelled.
    #[must_use]
    pub fn cancellation(mut self, token: &CancellationToken) -> Self {
        self.cancel = Some(token.child_token());
        self
    }

    /// Route background reload failures to `reporter` instead of the log.
    #[must_use]
    pub fn reload_failure_reporter(mut self, reporter: ReloadFailureReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build an empty registry.
    #[must_use]
    pub fn build(self) -> Onion {
        let (reload, _rx) = watch::channel(0_u64);
        Onion {
            shared: Arc::new(Shared {
                state: RwLock::new(State {
                    delimiter: Arc::from(DEFAULT_DELIMITER),
                    layers: Arc::new(Vec::new()),
                }),
                reload,
                cancel: self.cancel.unwrap_or_default(),
                reporter: self.reporter.unwrap_or_else(listener::default_reporter),
            }),
        }
    }
}

impl Onion {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        OnionBuilder::default().build()
    }

    /// Start configuring a registry.
    #[must_use]
    pub fn builder() -> OnionBuilder {
        OnionBuilder::default()
    }

    /// Create an empty registry whose listeners stop when `token` is
    /// cancelled.
    #[must_use]
    pub fn with_cancellation(token: &CancellationToken) -> Self {
        Self::builder().cancellation(token).build()
    }

    /// Create a registry seeded with `layers`.
    ///
    /// # Errors
    ///
    /// Returns the load failure(s) reported by [`Onion::add_layers`].
    pub async fn with_layers<I>(layers: I) -> OnionResult<Self>
    where
        I: IntoIterator<Item = AnyLayer>,
    {
        let onion = Self::new();
        onion.add_layers(layers).await?;
        Ok(onion)
    }

    /// Append `layers` to the end of the precedence order.
    ///
    /// Every eager layer is subscribed to and loaded before anything is
    /// registered. If any load fails, no layer from this call is added and
    /// the failure (or an aggregate of all failures) is returned. On success
    /// the layers are appended in iteration order and one listener task is
    /// spawned per watchable layer. Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::Load`] or [`OnionError::Aggregate`] when initial
    /// loads fail.
    pub async fn add_layers<I>(&self, layers: I) -> OnionResult<()>
    where
        I: IntoIterator<Item = AnyLayer>,
    {
        let mut prepared = Vec::new();
        let mut errors = Vec::new();
        for layer in layers {
            match prepare(layer).await {
                Ok(ready) => prepared.push(ready),
                Err(err) => errors.push(err),
            }
        }
        if let Some(err) = OnionError::try_aggregate(errors) {
            return Err(err);
        }
        if prepared.is_empty() {
            return Ok(());
        }

        let first_index = {
            let mut state = self.shared.state.write();
            let first = state.layers.len();
            Arc::make_mut(&mut state.layers).extend(prepared.iter().map(|p| p.slot.clone()));
            first
        };

        for (offset, ready) in prepared.into_iter().enumerate() {
            let index = first_index + offset;
            let name = ready.slot.name().to_owned();
            debug!(layer = %name, index, "registered layer");
            if let Some(updates) = ready.updates {
                tokio::spawn(listener::listen(
                    Arc::downgrade(&self.shared),
                    index,
                    name,
                    updates,
                    self.shared.cancel.clone(),
                ));
            }
        }
        Ok(())
    }

    /// Look up `key`, scanning layers from the most recently added.
    ///
    /// The key is split by the current delimiter. Empty or whitespace-only
    /// keys never match. The first layer holding the path wins; values from
    /// different layers are never combined.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        if key.trim().is_empty() {
            return None;
        }
        let (delimiter, layers) = {
            let state = self.shared.state.read();
            (Arc::clone(&state.delimiter), Arc::clone(&state.layers))
        };
        let path: Vec<&str> = key.split(&*delimiter).collect();
        layers.iter().rev().find_map(|slot| slot.lookup(&path))
    }

    /// The delimiter used to split keys into path segments.
    #[must_use]
    pub fn get_delimiter(&self) -> String {
        self.shared.state.read().delimiter.to_string()
    }

    /// Replace the key delimiter. An empty string restores the default `.`.
    pub fn set_delimiter(&self, delimiter: &str) {
        let delimiter = if delimiter.is_empty() {
            DEFAULT_DELIMITER
        } else {
            delimiter
        };
        self.shared.state.write().delimiter = Arc::from(delimiter);
    }

    /// Join key segments with the current delimiter, skipping empty ones.
    #[must_use]
    pub fn join_key(&self, parts: &[&str]) -> String {
        let delimiter = self.get_delimiter();
        parts
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(&delimiter)
    }

    /// A handle that fires on the next snapshot change of any layer.
    #[must_use]
    pub fn reload_watch(&self) -> ReloadSignal {
        ReloadSignal::new(self.shared.reload.subscribe())
    }

    /// Current snapshots in registration order; lazy layers contribute an
    /// empty map.
    #[must_use]
    pub fn layers_data(&self) -> Vec<Arc<ConfigMap>> {
        let layers = Arc::clone(&self.shared.state.read().layers);
        layers
            .iter()
            .map(|slot| match slot {
                Slot::Eager { snapshot, .. } => Arc::clone(snapshot),
                Slot::Lazy(_) => Arc::new(ConfigMap::new()),
            })
            .collect()
    }

    /// Number of registered layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.shared.state.read().layers.len()
    }

    /// Stop every background listener of this registry.
    ///
    /// Snapshots stay readable; they just no longer change.
    pub fn shutdown(&self) {
        self.shared.cancel.cancel();
    }
}

impl Default for Onion {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Onion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.read();
        let names: Vec<&str> = state.layers.iter().map(Slot::name).collect();
        f.debug_struct("Onion")
            .field("delimiter", &&*state.delimiter)
            .field("layers", &names)
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn replace_snapshot(&self, index: usize, data: ConfigMap) {
        {
            let mut state = self.state.write();
            let layers = Arc::make_mut(&mut state.layers);
            if let Some(Slot::Eager { snapshot, .. }) = layers.get_mut(index) {
                *snapshot = Arc::new(data);
            }
        }
        self.reload
            .send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    fn report(&self, failure: &ReloadFailure) {
        (self.reporter)(failure);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn prepare(layer: AnyLayer) -> OnionResult<Prepared> {
    match layer {
        AnyLayer::Lazy(layer) => Ok(Prepared {
            slot: Slot::Lazy(layer),
            updates: None,
        }),
        AnyLayer::Eager(layer) => {
            let updates = layer.watch();
            let snapshot = layer
                .load()
                .await
                .map_err(|err| OnionError::load(layer.name(), err))?;
            Ok(Prepared {
                slot: Slot::Eager {
                    layer,
                    snapshot: Arc::new(snapshot),
                },
                updates,
            })
        }
    }
}
