//! Code generation for the Record derive.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, GenericArgument, PathArguments, Type};

use super::parse::{Declaration, FieldAttrs, Options, RecordAttrs};
use crate::utils;

/// Wrappers looked through when finding the record type behind `Valid`.
const TRANSPARENT_WRAPPERS: &[&str] = &["Option", "Vec", "Box", "VecDeque", "Arc", "Rc"];

pub(super) fn generate_record(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record can only be derived for structs",
            ));
        }
    };

    let record = RecordAttrs::from_attributes(&input.attrs)?;
    let record_name = record.name.clone().unwrap_or_else(|| name.to_string());

    let mut attributes = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = FieldAttrs::from_attributes(&field.attrs)?;
        if attrs.skip || attrs.declarations.is_empty() {
            continue;
        }

        let property = property_name(&ident.to_string(), &attrs, &record)?;
        let mut calls = Vec::new();
        for declaration in &attrs.declarations {
            match declaration {
                Declaration::Constraint { kind, options } => {
                    let spec = constraint_spec(&kind.to_string(), options);
                    calls.push(quote! { .constraint(#spec) });
                }
                Declaration::Valid => {
                    let nested = nested_record_type(&field.ty);
                    calls.push(quote! {
                        .cascade(::assay_validator::Shape::of::<#nested>())
                    });
                }
            }
        }

        attributes.push(quote! {
            ::assay_validator::PropertyAttribute::new(#property) #(#calls)*
        });
    }

    let static_method = record.loader.as_ref().map(|loader| {
        quote! {
            fn load_validator_metadata(
                metadata: &mut ::assay_validator::ClassMetadata,
            ) -> ::std::result::Result<(), ::assay_validator::ConfigurationError> {
                #loader(metadata)
            }
        }
    });

    Ok(quote! {
        impl ::assay_validator::Record for #name {
            const NAME: &'static str = #record_name;

            #static_method

            fn property_attributes() -> ::std::vec::Vec<::assay_validator::PropertyAttribute> {
                ::std::vec![#(#attributes),*]
            }
        }
    })
}

/// Serialized name of a field.
fn property_name(field: &str, attrs: &FieldAttrs, record: &RecordAttrs) -> syn::Result<String> {
    if let Some(rename) = &attrs.rename {
        return Ok(rename.clone());
    }
    let field = field.trim_start_matches("r#");
    match &record.rename_all {
        Some(rule) => utils::apply_rename_rule(&rule.value(), field).ok_or_else(|| {
            syn::Error::new(rule.span(), format!("unknown rename_all rule `{}`", rule.value()))
        }),
        None => Ok(field.to_owned()),
    }
}

/// `ConstraintSpec` constructor for one declaration.
fn constraint_spec(kind: &str, options: &Options) -> TokenStream {
    let json = quote! { ::assay_validator::__private::serde_json::json! };
    match options {
        Options::None => quote! {
            ::assay_validator::ConstraintSpec::bare(#kind)
        },
        Options::Named(named) => {
            let keys = named.iter().map(|(key, _)| key);
            let values = named.iter().map(|(_, value)| value);
            quote! {
                ::assay_validator::ConstraintSpec::new(#kind, #json({ #(#keys: #values),* }))
            }
        }
        Options::Positional(values) if values.len() == 1 => {
            let value = &values[0];
            quote! {
                ::assay_validator::ConstraintSpec::new(#kind, #json(#value))
            }
        }
        Options::Positional(values) => quote! {
            ::assay_validator::ConstraintSpec::new(#kind, #json([#(#values),*]))
        },
    }
}

/// Strips `Option`, `Vec`, `Box` and friends to find the nested record type.
fn nested_record_type(ty: &Type) -> &Type {
    let Type::Path(path) = ty else {
        return ty;
    };
    let Some(last) = path.path.segments.last() else {
        return ty;
    };
    if !TRANSPARENT_WRAPPERS.iter().any(|wrapper| last.ident == wrapper) {
        return ty;
    }
    let PathArguments::AngleBracketed(arguments) = &last.arguments else {
        return ty;
    };
    match arguments.args.first() {
        Some(GenericArgument::Type(inner)) if arguments.args.len() == 1 => nested_record_type(inner),
        _ => ty,
    }
}
