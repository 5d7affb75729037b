//! Token generation for `#[derive(Bind)]`.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{BindInput, BoundField};

/// Build the `impl Bind` block.
pub(crate) fn bind_impl(input: &BindInput, krate: &TokenStream) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let bindings: Vec<TokenStream> = input
        .fields
        .iter()
        .filter(|field| !field.attrs.skip)
        .map(|field| field_binding(field, krate))
        .collect();
    let (onion, key) = if bindings.is_empty() {
        (quote! { _onion }, quote! { _key })
    } else {
        (quote! { onion }, quote! { key })
    };

    quote! {
        impl #impl_generics #krate::Bind for #ident #ty_generics #where_clause {
            fn bind(&mut self, #onion: &#krate::Onion, #key: &str) {
                #( #bindings )*
            }
        }
    }
}

fn field_binding(field: &BoundField, krate: &TokenStream) -> TokenStream {
    let name = &field.ident;
    match field.key() {
        Some(segment) => quote! {
            #krate::Bind::bind(&mut self.#name, onion, &onion.join_key(&[key, #segment]));
        },
        None => quote! {
            #krate::Bind::bind(&mut self.#name, onion, key);
        },
    }
}
