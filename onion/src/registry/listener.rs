//! Background tasks that apply layer updates to the registry.

use std::fmt;
use std::sync::{Arc, Weak};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Shared;
use crate::OnionError;
use crate::layer::LayerUpdates;

/// A layer update that could not be applied.
///
/// The registry keeps the layer's previous snapshot and hands this value to
/// its [`ReloadFailureReporter`].
#[derive(Debug, Clone)]
pub struct ReloadFailure {
    /// Name of the layer that failed.
    pub layer: String,
    /// The wrapped failure, always an [`OnionError::Reload`].
    pub error: Arc<OnionError>,
}

impl fmt::Display for ReloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

/// Callback receiving background reload failures.
pub type ReloadFailureReporter = Arc<dyn Fn(&ReloadFailure) + Send + Sync>;

pub(super) fn default_reporter() -> ReloadFailureReporter {
    Arc::new(|failure: &ReloadFailure| {
        warn!(
            layer = %failure.layer,
            error = %failure.error,
            "layer reload failed; keeping previous snapshot"
        );
    })
}

pub(super) async fn listen(
    shared: Weak<Shared>,
    index: usize,
    name: String,
    mut updates: LayerUpdates,
    cancel: CancellationToken,
) {
    debug!(layer = %name, index, "listening for layer updates");
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(layer = %name, "layer listener cancelled");
                return;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    debug!(layer = %name, "layer closed its update channel");
                    return;
                }
                let update = updates.borrow_and_update().clone();
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                match update {
                    Ok(data) => {
                        debug!(layer = %name, "applying layer update");
                        shared.replace_snapshot(index, data);
                    }
                    Err(error) => shared.report(&ReloadFailure {
                        error: OnionError::reload(&name, error),
                        layer: name.clone(),
                    }),
                }
            }
        }
    }
}
