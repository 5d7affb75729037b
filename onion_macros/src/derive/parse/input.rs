//! Collects the struct identifier, fields and attributes in one pass.

use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields};

use super::{BindInput, BoundField, parse_field_attrs, parse_struct_attrs};

/// Validate `input` and gather what generation needs.
///
/// Only structs with named fields are accepted.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<BindInput> {
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => {
                return Ok(BindInput {
                    ident: input.ident.clone(),
                    generics: input.generics.clone(),
                    struct_attrs,
                    fields: Vec::new(),
                });
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Bind requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Bind can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "Bind requires named fields"));
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        let default_key = ident.unraw().to_string().to_lowercase();
        fields.push(BoundField {
            ident,
            default_key,
            attrs,
        });
    }
    Ok(BindInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        struct_attrs,
        fields,
    })
}
