//! Populating values from the registry.
//!
//! [`Bind`] is implemented here for the supported scalar kinds and generated
//! for records by `#[derive(Bind)]`. Values already held by the target act as
//! defaults: a field whose key is absent, or whose value does not convert,
//! keeps what it had.

use std::time::Duration;

use crate::Onion;

/// A value that can be read from an [`Onion`] at a key.
///
/// Records usually derive this trait:
///
/// ```rust
/// use std::time::Duration;
/// use onion::{AnyLayer, Bind, MapLayer, Onion};
/// use serde_json::json;
///
/// #[derive(Bind, Default)]
/// struct Server {
///     host: String,
///     #[onion(key = "listen_port")]
///     port: i64,
///     timeout: Duration,
///     #[onion(skip)]
///     generation: u32,
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> onion::OnionResult<()> {
/// let data = json!({"server": {"host": "example.org", "listen_port": 8443, "timeout": "5s"}});
/// let onion = Onion::with_layers([AnyLayer::eager(MapLayer::from_value("app", data)?)]).await?;
///
/// let mut server = Server { port: 80, ..Server::default() };
/// onion.bind("server", &mut server);
/// assert_eq!(server.host, "example.org");
/// assert_eq!(server.port, 8443);
/// assert_eq!(server.timeout, Duration::from_secs(5));
/// # Ok(())
/// # }
/// ```
pub trait Bind {
    /// Overwrite `self` with whatever the registry holds at `key`.
    ///
    /// Records treat `key` as the prefix for their fields; an empty key binds
    /// fields at the top level.
    fn bind(&mut self, onion: &Onion, key: &str);
}

macro_rules! bind_scalar {
    ($ty:ty, $accessor:ident) => {
        impl Bind for $ty {
            fn bind(&mut self, onion: &Onion, key: &str) {
                *self = onion.$accessor(key, *self);
            }
        }
    };
}

bind_scalar!(bool, get_bool_default);
bind_scalar!(i32, get_int_default);
bind_scalar!(i64, get_int64_default);
bind_scalar!(f32, get_float32_default);
bind_scalar!(f64, get_float64_default);
bind_scalar!(Duration, get_duration_default);

impl Bind for String {
    fn bind(&mut self, onion: &Onion, key: &str) {
        *self = onion.get_string_default(key, self.as_str());
    }
}

impl Onion {
    /// Populate `target` from the values under `prefix`.
    pub fn bind<T: Bind + ?Sized>(&self, prefix: &str, target: &mut T) {
        target.bind(self, prefix);
    }
}
