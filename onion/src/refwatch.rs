//! Values kept in sync with a registry across reloads.
//!
//! Register keys on a [`RefWatch`], then start it with
//! [`RefWatch::watch`]. Every handle is refreshed straight away and again
//! after each change the registry applies.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{Bind, Onion};

trait Refresh: Send + Sync {
    fn refresh(&self, onion: &Onion);
}

struct Slot<T> {
    key: String,
    default: T,
    value: RwLock<T>,
}

impl<T> Refresh for Slot<T>
where
    T: Bind + Clone + Send + Sync,
{
    fn refresh(&self, onion: &Onion) {
        let mut next = self.default.clone();
        next.bind(onion, &self.key);
        *self.value.write() = next;
    }
}

/// Read handle onto a registered value.
pub struct Watched<T> {
    slot: Arc<Slot<T>>,
}

impl<T: Clone> Watched<T> {
    /// The value as of the latest refresh.
    #[must_use]
    pub fn get(&self) -> T {
        self.slot.value.read().clone()
    }

    /// Key the value is read from.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.slot.key
    }
}

impl<T> Clone for Watched<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Watched<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watched")
            .field("key", &self.slot.key)
            .field("value", &*self.slot.value.read())
            .finish()
    }
}

/// A set of values refreshed from a registry.
#[derive(Default)]
pub struct RefWatch {
    slots: RwLock<Vec<Arc<dyn Refresh>>>,
}

impl RefWatch {
    /// An empty watch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `key`, starting from `default`.
    ///
    /// Each refresh rebinds from `default`, so a key that disappears reverts
    /// to it. Any [`Bind`] type works, records included.
    pub fn register<T>(&self, key: &str, default: T) -> Watched<T>
    where
        T: Bind + Clone + Send + Sync + 'static,
    {
        let slot = Arc::new(Slot {
            key: key.to_owned(),
            value: RwLock::new(default.clone()),
            default,
        });
        self.slots.write().push(slot.clone());
        Watched { slot }
    }

    /// Rebind every registered value from `onion` now.
    pub fn refresh(&self, onion: &Onion) {
        let slots = self.slots.read().clone();
        for slot in slots {
            slot.refresh(onion);
        }
    }

    /// Refresh now and after every change `onion` applies, until `cancel`
    /// fires.
    ///
    /// The returned receiver counts completed background refreshes. The
    /// background task keeps a handle to `onion` until it is cancelled.
    pub fn watch(self: &Arc<Self>, onion: &Onion, cancel: CancellationToken) -> watch::Receiver<u64> {
        let (tx, rx) = watch::channel(0_u64);
        let mut signal = onion.reload_watch();
        self.refresh(onion);

        let this = Arc::clone(self);
        let onion = onion.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    fired = signal.fired() => {
                        if !fired {
                            return;
                        }
                    }
                }
                signal = onion.reload_watch();
                this.refresh(&onion);
                tx.send_modify(|count| *count = count.wrapping_add(1));
                debug!("refreshed watched configuration values");
            }
        });
        rx
    }
}

impl fmt::Debug for RefWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefWatch")
            .field("registered", &self.slots.read().len())
            .finish()
    }
}
