//! Literal parsing helpers for `#[onion(...)]` attributes.

use syn::meta::ParseNestedMeta;
use syn::{Lit, LitStr};

/// Parse `key = "value"`, rejecting any other literal kind.
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(other.span(), format!("{key} must be a string"))),
    }
}
