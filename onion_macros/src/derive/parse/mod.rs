//! Attribute parsing for `#[derive(Bind)]`.

mod input;
mod literals;

use syn::Attribute;
use syn::meta::ParseNestedMeta;

pub(crate) use input::parse_input;
use literals::lit_str;

/// Everything generation needs from the annotated struct.
pub(crate) struct BindInput {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub struct_attrs: StructAttrs,
    pub fields: Vec<BoundField>,
}

/// A named field with its parsed attributes.
pub(crate) struct BoundField {
    pub ident: syn::Ident,
    /// Lower-cased field name, used when no `key` is given.
    pub default_key: String,
    pub attrs: FieldAttrs,
}

impl BoundField {
    /// Key segment the field is bound under, or `None` when it binds at the
    /// parent prefix.
    pub(crate) fn key(&self) -> Option<&str> {
        match (&self.attrs.key, self.attrs.flatten) {
            (Some(key), _) => Some(key.as_str()),
            (None, true) => None,
            (None, false) => Some(self.default_key.as_str()),
        }
    }
}

#[derive(Default)]
pub(crate) struct StructAttrs {
    /// Overrides the path used to reach the `onion` crate.
    pub crate_path: Option<syn::Path>,
}

/// Field-level options.
///
/// - `key` replaces the lower-cased field name.
/// - `skip` excludes the field.
/// - `flatten` binds the field at the parent prefix unless `key` is set.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub key: Option<String>,
    pub skip: bool,
    pub flatten: bool,
}

/// Visit every `#[onion(...)]` attribute in `attrs`.
fn parse_onion<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("onion")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_onion(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let path = lit_str(meta, "crate")?.parse::<syn::Path>()?;
            out.crate_path = Some(path);
            Ok(())
        } else {
            Err(meta.error("unsupported onion struct attribute; expected `crate`"))
        }
    })?;
    Ok(out)
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_onion(attrs, |meta| {
        if meta.path.is_ident("key") {
            let key = lit_str(meta, "key")?;
            if key.value().is_empty() {
                return Err(syn::Error::new(key.span(), "key must not be empty"));
            }
            out.key = Some(key.value());
        } else if meta.path.is_ident("skip") {
            out.skip = true;
        } else if meta.path.is_ident("flatten") {
            out.flatten = true;
        } else {
            return Err(meta.error(
                "unsupported onion field attribute; expected `key`, `skip` or `flatten`",
            ));
        }
        Ok(())
    })?;
    Ok(out)
}
