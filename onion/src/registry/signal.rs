//! One-shot handles onto the registry's reload generation.

use tokio::sync::watch;

/// Fires once the registry has applied a snapshot change that happened after
/// this handle was obtained.
///
/// Every handle obtained before a change is released by it, however many
/// there are. Obtain a fresh handle from [`crate::Onion::reload_watch`] after
/// each firing to wait for the next change.
#[derive(Debug, Clone)]
pub struct ReloadSignal {
    rx: watch::Receiver<u64>,
    armed_at: u64,
}

impl ReloadSignal {
    pub(super) fn new(rx: watch::Receiver<u64>) -> Self {
        let armed_at = *rx.borrow();
        Self { rx, armed_at }
    }

    /// Whether a change has already happened, without waiting.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        *self.rx.borrow() != self.armed_at
    }

    /// Wait for the next change.
    ///
    /// Returns `true` once a change has been applied, or `false` if the
    /// registry was dropped before any change happened.
    pub async fn fired(&self) -> bool {
        let armed_at = self.armed_at;
        let mut rx = self.rx.clone();
        rx.wait_for(|generation| *generation != armed_at).await.is_ok()
    }
}
