//! Concrete layers built on the [`crate::Layer`] and [`crate::LazyLayer`]
//! contracts.

mod defaults;
mod directory;
mod env;
mod file;
mod map;
mod prefixed_env;
mod stream;

pub use defaults::DefaultLayer;
pub use env::EnvLayer;
pub use file::FileLayer;
pub use map::MapLayer;
pub use prefixed_env::PrefixedEnvLayer;
pub use stream::StreamLayer;
