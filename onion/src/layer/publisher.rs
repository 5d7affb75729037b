//! Update channel shared by the watchable layers in this crate.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::{LayerUpdate, LayerUpdates};
use crate::{ConfigMap, OnionError};

/// Sending side of a layer's update channel.
///
/// Holds the layer's current snapshot. Every [`LayerPublisher::publish`]
/// replaces it and wakes all subscribed registries; rapid successive updates
/// may be coalesced, but the latest one is always delivered.
#[derive(Debug)]
pub struct LayerPublisher {
    tx: watch::Sender<LayerUpdate>,
    current: Mutex<ConfigMap>,
}

impl LayerPublisher {
    /// Create a publisher whose current snapshot is `initial`.
    #[must_use]
    pub fn new(initial: ConfigMap) -> Self {
        let (tx, _rx) = watch::channel(Ok(initial.clone()));
        Self {
            tx,
            current: Mutex::new(initial),
        }
    }

    /// The most recent successfully published snapshot.
    ///
    /// Failures published afterwards do not replace it.
    #[must_use]
    pub fn current(&self) -> ConfigMap {
        self.current.lock().clone()
    }

    /// Publish a replacement snapshot.
    pub fn publish(&self, data: ConfigMap) {
        let mut current = self.current.lock();
        current.clone_from(&data);
        drop(self.tx.send_replace(Ok(data)));
    }

    /// Announce that a replacement snapshot could not be produced.
    pub fn publish_failure(&self, error: Arc<OnionError>) {
        drop(self.tx.send_replace(Err(error)));
    }

    /// Modify the current snapshot in place and publish the result.
    ///
    /// The closure's return value is handed back to the caller; the snapshot
    /// is only republished when the closure reports success.
    pub fn update<F, T>(&self, f: F) -> Result<T, Arc<OnionError>>
    where
        F: FnOnce(&mut ConfigMap) -> Result<T, Arc<OnionError>>,
    {
        let mut current = self.current.lock();
        let mut next = current.clone();
        let out = f(&mut next)?;
        current.clone_from(&next);
        drop(self.tx.send_replace(Ok(next)));
        Ok(out)
    }

    /// Subscribe to future updates.
    #[must_use]
    pub fn subscribe(&self) -> LayerUpdates {
        self.tx.subscribe()
    }
}
