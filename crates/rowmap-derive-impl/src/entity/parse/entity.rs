// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity-level attribute parsing and cross-field validation.
//!
//! [`EntityDef`] is the complete parse result handed to the generators: the
//! struct identity, the resolved table name, and every field's
//! [`FieldDef`](super::FieldDef) in declaration order.
//!
//! # Supported Attributes
//!
//! | Attribute | Required | Default | Description |
//! |-----------|----------|---------|-------------|
//! | `table` | No | type's simple name | Database table name |

use darling::FromDeriveInput;
use syn::{DeriveInput, Ident, Visibility};

use super::field::FieldDef;

/// Entity-level attributes parsed from `#[entity(...)]`.
///
/// Internal darling struct; the public API is [`EntityDef`].
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named), allow_unknown_fields)]
struct EntityAttrs {
    ident: Ident,

    #[allow(dead_code)]
    vis: Visibility,

    /// Database table name. Defaults to the struct's simple name.
    #[darling(default)]
    table: Option<String>
}

/// Entity definition with all parsed attributes and fields.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct identifier.
    pub ident: Ident,

    /// Resolved table name, possibly double-quote delimited.
    pub table: String,

    /// Field definitions in declaration order.
    pub fields: Vec<FieldDef>
}

impl EntityDef {
    /// Parse an entity definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - applied to a non-struct or a tuple/unit struct
    /// - any field-level parse error
    /// - more than one `#[generated]` id field
    /// - a `#[generated]` id combined with a composite key
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;

        let fields: Vec<FieldDef> = match &input.data {
            syn::Data::Struct(data) => match &data.fields {
                syn::Fields::Named(named) => named
                    .named
                    .iter()
                    .map(|field| FieldDef::from_field(field, &attrs.ident))
                    .collect::<darling::Result<Vec<_>>>()?,
                _ => {
                    return Err(darling::Error::custom("Entity requires named fields")
                        .with_span(&input.ident));
                }
            },
            _ => {
                return Err(
                    darling::Error::custom("Entity can only be derived for structs")
                        .with_span(&input.ident)
                );
            }
        };

        let ids = fields.iter().filter(|f| f.is_id && !f.is_transient).count();
        let generated = fields
            .iter()
            .filter(|f| f.is_id && f.is_generated && !f.is_transient)
            .count();
        if generated > 1 {
            return Err(darling::Error::custom(
                "at most one id field may be #[generated]"
            )
            .with_span(&input.ident));
        }
        if generated == 1 && ids > 1 {
            return Err(darling::Error::custom(
                "a #[generated] id cannot be combined with a composite key"
            )
            .with_span(&input.ident));
        }

        let table = attrs.table.unwrap_or_else(|| attrs.ident.to_string());

        Ok(Self {
            ident: attrs.ident,
            table,
            fields
        })
    }

    /// Struct identifier.
    #[must_use]
    pub fn name(&self) -> &Ident {
        &self.ident
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn table_defaults_to_type_name() {
        let input: DeriveInput = parse_quote! {
            pub struct Player {
                #[id]
                pub id: i64,
            }
        };
        let entity = EntityDef::from_derive_input(&input).unwrap();
        assert_eq!(entity.table, "Player");
        assert_eq!(entity.fields.len(), 1);
    }

    #[test]
    fn explicit_table_name_wins() {
        let input: DeriveInput = parse_quote! {
            #[entity(table = "\"Delimited Players\"")]
            pub struct Player {
                #[id]
                pub id: i64,
            }
        };
        let entity = EntityDef::from_derive_input(&input).unwrap();
        assert_eq!(entity.table, "\"Delimited Players\"");
    }

    #[test]
    fn composite_key_fields_kept_in_order() {
        let input: DeriveInput = parse_quote! {
            #[entity(table = "memberships")]
            pub struct Membership {
                #[id]
                pub org_id: i64,
                #[id]
                pub user_id: i64,
                pub role: String,
            }
        };
        let entity = EntityDef::from_derive_input(&input).unwrap();
        let ids: Vec<String> = entity
            .fields
            .iter()
            .filter(|f| f.is_id)
            .map(FieldDef::name_str)
            .collect();
        assert_eq!(ids, ["org_id", "user_id"]);
    }

    #[test]
    fn generated_id_with_composite_key_rejected() {
        let input: DeriveInput = parse_quote! {
            #[entity(table = "memberships")]
            pub struct Membership {
                #[id]
                #[generated]
                pub org_id: i64,
                #[id]
                pub user_id: i64,
            }
        };
        let err = EntityDef::from_derive_input(&input).unwrap_err();
        assert!(err.to_string().contains("composite"));
    }

    #[test]
    fn two_generated_ids_rejected() {
        let input: DeriveInput = parse_quote! {
            #[entity(table = "t")]
            pub struct Broken {
                #[id]
                #[generated]
                pub a: i64,
                #[id]
                #[generated]
                pub b: i64,
            }
        };
        let err = EntityDef::from_derive_input(&input).unwrap_err();
        assert!(err.to_string().contains("at most one"));
    }

    #[test]
    fn tuple_struct_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Broken(i64);
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }
}
