//! Parsing of `#[validate(...)]`, `#[record(...)]` and the serde attributes
//! that affect property names.

use proc_macro2::{TokenStream, TokenTree};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Ident, LitStr, Path, Token};

use crate::utils;

// ============================================================================
// CONSTRAINT DECLARATIONS
// ============================================================================

/// One argument inside `Kind(...)`.
pub(super) enum Argument {
    Named { key: Ident, value: TokenStream },
    Positional(TokenStream),
}

impl Parse for Argument {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        if input.peek(Ident) && input.peek2(Token![=]) && !input.peek2(Token![==]) {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value = value_tokens(input)?;
            if value.is_empty() {
                return Err(syn::Error::new(key.span(), "expected a value after `=`"));
            }
            return Ok(Self::Named { key, value });
        }
        Ok(Self::Positional(value_tokens(input)?))
    }
}

/// Collects tokens up to the next top-level comma.
fn value_tokens(input: ParseStream<'_>) -> syn::Result<TokenStream> {
    let mut tokens = TokenStream::new();
    while !input.is_empty() && !input.peek(Token![,]) {
        let tt: TokenTree = input.parse()?;
        tokens.extend([tt]);
    }
    Ok(tokens)
}

/// Options of one declaration.
pub(super) enum Options {
    None,
    Named(Vec<(String, TokenStream)>),
    Positional(Vec<TokenStream>),
}

/// One entry of a `#[validate(...)]` list.
pub(super) enum Declaration {
    Constraint { kind: Ident, options: Options },
    Valid,
}

/// Declarations of one field, in order.
#[derive(Default)]
pub(super) struct FieldAttrs {
    pub declarations: Vec<Declaration>,
    pub rename: Option<String>,
    pub skip: bool,
}

impl FieldAttrs {
    pub(super) fn from_attributes(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if attr.path().is_ident("validate") {
                attr.parse_nested_meta(|meta| {
                    let Some(kind) = meta.path.get_ident().cloned() else {
                        return Err(meta.error("expected a constraint kind name"));
                    };

                    if kind == "Valid" {
                        result.declarations.push(Declaration::Valid);
                        return Ok(());
                    }

                    let options = if meta.input.peek(syn::token::Paren) {
                        let content;
                        syn::parenthesized!(content in meta.input);
                        parse_options(&kind, &content)?
                    } else {
                        Options::None
                    };
                    result
                        .declarations
                        .push(Declaration::Constraint { kind, options });
                    Ok(())
                })?;
            } else if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        if let Some(rename) = serde_rename(&meta)? {
                            result.rename = Some(rename);
                        }
                    } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                        result.skip = true;
                    } else {
                        skip_meta(&meta)?;
                    }
                    Ok(())
                })?;
            }
        }

        Ok(result)
    }
}

fn parse_options(kind: &Ident, content: ParseStream<'_>) -> syn::Result<Options> {
    let arguments = Punctuated::<Argument, Token![,]>::parse_terminated(content)?;

    let mut named = Vec::new();
    let mut positional = Vec::new();
    for argument in arguments {
        match argument {
            Argument::Named { key, value } => {
                named.push((utils::to_camel_case(&key.to_string()), value));
            }
            Argument::Positional(value) if !value.is_empty() => positional.push(value),
            Argument::Positional(_) => {}
        }
    }

    match (named.is_empty(), positional.is_empty()) {
        (true, true) => Ok(Options::None),
        (false, true) => Ok(Options::Named(named)),
        (true, false) => Ok(Options::Positional(positional)),
        (false, false) => Err(syn::Error::new(
            kind.span(),
            "mix of named and positional options; name every option or pass a single value",
        )),
    }
}

// ============================================================================
// CONTAINER
// ============================================================================

/// Container-level settings.
#[derive(Default)]
pub(super) struct RecordAttrs {
    pub name: Option<String>,
    pub loader: Option<Path>,
    pub rename_all: Option<LitStr>,
}

impl RecordAttrs {
    pub(super) fn from_attributes(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if attr.path().is_ident("record") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        let value: LitStr = meta.value()?.parse()?;
                        result.name = Some(value.value());
                        return Ok(());
                    }
                    if meta.path.is_ident("loader") {
                        result.loader = Some(meta.value()?.parse()?);
                        return Ok(());
                    }
                    Err(meta.error("unknown record attribute; expected `name` or `loader`"))
                })?;
            } else if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename_all") {
                        if meta.input.peek(Token![=]) {
                            result.rename_all = Some(meta.value()?.parse()?);
                        } else {
                            meta.parse_nested_meta(|inner| {
                                if inner.path.is_ident("serialize") {
                                    result.rename_all = Some(inner.value()?.parse()?);
                                } else {
                                    skip_meta(&inner)?;
                                }
                                Ok(())
                            })?;
                        }
                    } else {
                        skip_meta(&meta)?;
                    }
                    Ok(())
                })?;
            }
        }

        Ok(result)
    }
}

// ============================================================================
// SERDE HELPERS
// ============================================================================

/// Reads the serialized name from `rename = "..."` or
/// `rename(serialize = "...", deserialize = "...")`.
///
/// A deserialize-only rename leaves the serialized name alone.
fn serde_rename(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        let value: LitStr = meta.value()?.parse()?;
        return Ok(Some(value.value()));
    }
    let mut renamed = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            let value: LitStr = inner.value()?.parse()?;
            renamed = Some(value.value());
        } else {
            skip_meta(&inner)?;
        }
        Ok(())
    })?;
    Ok(renamed)
}

/// Consumes a serde option this derive does not care about.
fn skip_meta(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let value = meta.value()?;
        value_tokens(value)?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        content.parse::<TokenStream>()?;
    }
    Ok(())
}
