//! Unit tests for `#[derive(Bind)]` expansion.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

use crate::derive::expand;

fn expanded(input: &DeriveInput) -> Result<String> {
    expand(input)
        .map(|tokens| tokens.to_string())
        .map_err(|err| anyhow!(err.to_string()))
}

fn rejected(input: &DeriveInput) -> Result<String> {
    match expand(input) {
        Ok(tokens) => Err(anyhow!("expected an error, got {tokens}")),
        Err(err) => Ok(err.to_string()),
    }
}

#[rstest]
fn binds_each_field_under_its_key() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Server {
            Host: String,
            #[onion(key = "listen_port")]
            port: i64,
        }
    };
    let out = expanded(&input)?;
    ensure!(out.contains("impl :: onion :: Bind for Server"), "{out}");
    ensure!(
        out.contains(
            ":: onion :: Bind :: bind (& mut self . Host , onion , & onion . join_key (& [key , \"host\"]))"
        ),
        "{out}"
    );
    ensure!(out.contains("\"listen_port\""), "{out}");
    Ok(())
}

#[rstest]
fn flatten_binds_at_the_parent_prefix() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct App {
            #[onion(flatten)]
            common: Common,
            #[onion(flatten, key = "extra")]
            more: Common,
        }
    };
    let out = expanded(&input)?;
    ensure!(
        out.contains(":: onion :: Bind :: bind (& mut self . common , onion , key)"),
        "{out}"
    );
    ensure!(out.contains("\"extra\""), "{out}");
    Ok(())
}

#[rstest]
fn skipped_fields_are_not_bound() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[onion(crate = "crate")]
        struct Only {
            #[onion(skip)]
            cache: Vec<u8>,
        }
    };
    let out = expanded(&input)?;
    ensure!(out.contains("impl crate :: Bind for Only"), "{out}");
    ensure!(!out.contains("cache"), "{out}");
    ensure!(out.contains("_onion"), "{out}");
    Ok(())
}

#[rstest]
fn raw_identifiers_lose_their_prefix() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Kinds {
            r#type: String,
        }
    };
    let out = expanded(&input)?;
    ensure!(out.contains("\"type\""), "{out}");
    Ok(())
}

#[rstest]
fn generics_are_forwarded() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Wrapper<T: Clone> where T: Default {
            inner: T,
        }
    };
    let out = expanded(&input)?;
    ensure!(out.contains("impl < T : Clone > :: onion :: Bind for Wrapper < T > where T : Default"), "{out}");
    Ok(())
}

#[rstest]
#[case::enumeration(parse_quote! { enum E { A } }, "only be derived for structs")]
#[case::tuple(parse_quote! { struct T(u8); }, "requires named fields")]
#[case::unknown_field_attr(
    parse_quote! { struct S { #[onion(rename = "x")] a: i32 } },
    "unsupported onion field attribute"
)]
#[case::unknown_struct_attr(
    parse_quote! { #[onion(prefix = "x")] struct S { a: i32 } },
    "unsupported onion struct attribute"
)]
#[case::non_string_key(parse_quote! { struct S { #[onion(key = 3)] a: i32 } }, "key must be a string")]
#[case::empty_key(parse_quote! { struct S { #[onion(key = "")] a: i32 } }, "key must not be empty")]
fn invalid_input_is_rejected(#[case] input: DeriveInput, #[case] message: &str) -> Result<()> {
    let err = rejected(&input)?;
    ensure!(err.contains(message), "unexpected error: {err}");
    Ok(())
}
