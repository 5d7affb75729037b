//! Extensions for mapping errors to `OnionResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(OnionError::…))`
//! patterns at the call sites that convert external error types into the
//! crate's `OnionResult<T>` alias (`Result<T, Arc<OnionError>>`).
//!
//! # Examples
//!
//! ```
//! use onion::{OnionResult, OnionResultExt};
//!
//! fn export() -> OnionResult<String> {
//!     serde_json::to_string(&42).into_onion()
//! }
//! # assert_eq!(export().ok().as_deref(), Some("42"));
//! ```

use std::sync::Arc;

use crate::{OnionError, OnionResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<OnionError>`
/// into an `OnionResult<T>`.
pub trait OnionResultExt<T, E> {
    /// Convert `Result<T, E>` into `OnionResult<T>` using `Into<OnionError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<OnionError>`.
    fn into_onion(self) -> OnionResult<T>;
}

impl<T, E> OnionResultExt<T, E> for Result<T, E>
where
    E: Into<OnionError>,
{
    fn into_onion(self) -> OnionResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

impl From<serde_json::Error> for OnionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Export(e)
    }
}
