//! Crate path used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// `::onion` unless `#[onion(crate = "...")]` names another path.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::onion }, |path| quote! { #path })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::resolve;

    #[rstest]
    #[case::default(None, ":: onion")]
    #[case::local(Some("crate"), "crate")]
    #[case::aliased(Some("deps::config"), "deps :: config")]
    fn resolves_paths(#[case] input: Option<&str>, #[case] expected: &str) -> syn::Result<()> {
        let parsed = input.map(syn::parse_str::<syn::Path>).transpose()?;
        assert_eq!(resolve(parsed.as_ref()).to_string(), expected);
        Ok(())
    }
}
