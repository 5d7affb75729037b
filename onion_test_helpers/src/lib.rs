//! Test helpers shared across the onion crates.
//!
//! - [`env`] scopes process environment mutations behind a global lock.
//! - [`figment`] runs setup code inside a `figment::Jail`.
//! - [`files`] writes configuration fixtures into temporary folders.

pub mod env;
pub mod figment;
pub mod files;
