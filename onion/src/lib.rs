//! Layered configuration registry.
//!
//! An [`Onion`] stacks named configuration sources ("layers") in the order
//! they are added. Lookups walk the stack from the most recently added layer
//! down and return the first value found at a delimiter-separated key path.
//! Typed accessors convert what they find with forgiving rules and fall back
//! to defaults, and [`Bind`] (usually derived) fills whole structs.
//!
//! Layers that change over time publish replacement snapshots; the registry
//! swaps them in from background tasks and releases every
//! [`ReloadSignal`] obtained before the change.
//!
//! ```rust
//! use onion::{AnyLayer, DefaultLayer, MapLayer, Onion};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> onion::OnionResult<()> {
//! let defaults = Arc::new(DefaultLayer::new());
//! defaults.set_default("server.port", json!(8080))?;
//! let overrides = MapLayer::from_value("overrides", json!({"server": {"port": "9090"}}))?;
//!
//! let onion = Onion::with_layers([AnyLayer::Eager(defaults), AnyLayer::eager(overrides)]).await?;
//! assert_eq!(onion.get_int("server.port"), 9090);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

mod accessors;
mod bind;
mod cipher;
pub mod coerce;
pub mod decoder;
mod duration;
mod error;
pub mod export;
mod layer;
mod layers;
mod merge;
mod refwatch;
mod registry;
mod result_ext;
mod search;
mod value;

pub use bind::Bind;
pub use cipher::Cipher;
pub use decoder::{Decoder, DecoderRegistry, PropertiesDecoder};
pub use duration::{DurationError, parse_duration};
pub use error::{AggregatedErrors, OnionError};
pub use layer::{AnyLayer, Layer, LayerPublisher, LayerUpdate, LayerUpdates, LazyLayer};
pub use layers::{
    DefaultLayer, EnvLayer, FileLayer, MapLayer, PrefixedEnvLayer, StreamLayer,
};
pub use merge::{merge_maps, merge_value};
pub use onion_macros::Bind;
pub use refwatch::{RefWatch, Watched};
pub use registry::{
    DEFAULT_DELIMITER, Onion, OnionBuilder, ReloadFailure, ReloadFailureReporter, ReloadSignal,
};
pub use result_ext::OnionResultExt;
pub use search::search;
pub use value::{ConfigMap, kind_name, nest};

/// Result type used throughout the crate; errors are shared so one failure
/// can be reported to several parties.
pub type OnionResult<T> = Result<T, Arc<OnionError>>;

#[cfg(test)]
mod test_support {
    use serde_json::Value;

    use crate::ConfigMap;

    /// Unwrap a `json!` object literal.
    #[expect(clippy::expect_used, reason = "test literals are always objects")]
    pub(crate) fn map(value: Value) -> ConfigMap {
        value
            .as_object()
            .cloned()
            .expect("test value must be a JSON object")
    }
}
