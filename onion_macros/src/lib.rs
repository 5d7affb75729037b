//! Procedural macros for `onion`.
//!
//! `#[derive(Bind)]` implements `onion::Bind` for structs with named fields.
//! Each field is bound at `<prefix><delimiter><field key>`, where the field
//! key is the lower-cased field name unless `#[onion(key = "...")]` names it.
//!
//! Field attributes:
//! - `#[onion(key = "name")]` reads the field from `name`.
//! - `#[onion(skip)]` leaves the field alone; required for field types that do
//!   not implement `Bind`.
//! - `#[onion(flatten)]` binds a nested record directly under the parent
//!   prefix. Combined with `key`, the key extends the prefix instead.
//!
//! Struct attribute `#[onion(crate = "path")]` changes the path generated code
//! uses to reach the `onion` crate.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `onion::Bind`.
#[proc_macro_derive(Bind, attributes(onion))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[cfg(test)]
mod tests;
