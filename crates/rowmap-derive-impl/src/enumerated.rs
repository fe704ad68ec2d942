// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Enumerated derive macro implementation.
//!
//! Generates the `Enumerated` trait for a fieldless enum — the
//! ordinal-ordered name table and lookups in both directions — plus a
//! `FromFieldValue` implementation so generated `Record::set` arms can
//! assign the enum directly from a coerced value.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, parse_macro_input};

/// Main entry point for the Enumerated derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match variants(&input) {
        Ok(names) => generate(&input.ident, &names).into(),
        Err(err) => err.to_compile_error().into()
    }
}

/// Unit variant identifiers in declaration order.
fn variants(input: &DeriveInput) -> syn::Result<Vec<Ident>> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Enumerated can only be derived for enums"
        ));
    };
    data.variants
        .iter()
        .map(|variant| match &variant.fields {
            Fields::Unit => Ok(variant.ident.clone()),
            _ => Err(syn::Error::new_spanned(
                variant,
                "Enumerated variants must be fieldless"
            ))
        })
        .collect()
}

fn generate(name: &Ident, variants: &[Ident]) -> proc_macro2::TokenStream {
    let names: Vec<String> = variants.iter().map(Ident::to_string).collect();
    let ordinals: Vec<usize> = (0..variants.len()).collect();

    quote! {
        #[automatically_derived]
        impl rowmap_core::record::Enumerated for #name {
            const NAMES: &'static [&'static str] = &[#(#names),*];

            fn from_ordinal(ordinal: usize) -> ::std::option::Option<Self> {
                match ordinal {
                    #(#ordinals => ::std::option::Option::Some(Self::#variants),)*
                    _ => ::std::option::Option::None
                }
            }

            fn from_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    #(#names => ::std::option::Option::Some(Self::#variants),)*
                    _ => ::std::option::Option::None
                }
            }

            fn ordinal(&self) -> usize {
                match self {
                    #(Self::#variants => #ordinals,)*
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    #(Self::#variants => #names,)*
                }
            }
        }

        #[automatically_derived]
        impl rowmap_core::value::FromFieldValue for #name {
            fn from_field_value(
                value: rowmap_core::value::FieldValue,
                field: &str
            ) -> rowmap_core::error::Result<Self> {
                match value {
                    rowmap_core::value::FieldValue::Enum { ordinal, .. } => {
                        <Self as rowmap_core::record::Enumerated>::from_ordinal(ordinal)
                            .ok_or_else(|| rowmap_core::error::RowmapError::Access(
                                ::std::format!(
                                    "field `{field}`: enum ordinal {ordinal} out of range"
                                )
                            ))
                    }
                    rowmap_core::value::FieldValue::Text(name) => {
                        <Self as rowmap_core::record::Enumerated>::from_name(&name)
                            .ok_or_else(|| rowmap_core::error::RowmapError::Access(
                                ::std::format!(
                                    "field `{field}`: `{name}` is not an enum constant"
                                )
                            ))
                    }
                    other => ::std::result::Result::Err(
                        rowmap_core::error::RowmapError::Access(::std::format!(
                            "field `{field}` expects an enum value, got {}",
                            other.shape()
                        ))
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn unit_variants_collected_in_order() {
        let input: DeriveInput = parse_quote! {
            enum Status { Active, Suspended, Closed }
        };
        let names = variants(&input).unwrap();
        let rendered: Vec<String> = names.iter().map(Ident::to_string).collect();
        assert_eq!(rendered, ["Active", "Suspended", "Closed"]);
    }

    #[test]
    fn data_variants_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Broken { Ok, Payload(String) }
        };
        let err = variants(&input).unwrap_err();
        assert!(err.to_string().contains("fieldless"));
    }

    #[test]
    fn structs_rejected() {
        let input: DeriveInput = parse_quote! {
            struct NotAnEnum;
        };
        assert!(variants(&input).is_err());
    }

    #[test]
    fn generated_code_has_name_table_and_lookups() {
        let input: DeriveInput = parse_quote! {
            enum Status { Active, Closed }
        };
        let names = variants(&input).unwrap();
        let code = generate(&input.ident, &names).to_string();
        assert!(code.contains("NAMES"));
        assert!(code.contains("\"Active\""));
        assert!(code.contains("from_ordinal"));
        assert!(code.contains("FromFieldValue"));
    }
}
