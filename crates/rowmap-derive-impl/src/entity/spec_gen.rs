// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl Entity` generation: the declarative mapping table and the cached
//! descriptor accessor.
//!
//! # Generated Code
//!
//! For an entity `Player`, generates:
//!
//! ```rust,ignore
//! impl rowmap_core::record::Entity for Player {
//!     fn spec() -> rowmap_core::descriptor::EntitySpec {
//!         rowmap_core::descriptor::EntitySpec {
//!             entity: "Player",
//!             table: "players",
//!             fields: vec![
//!                 rowmap_core::descriptor::FieldSpec {
//!                     id: true,
//!                     ..rowmap_core::descriptor::FieldSpec::new(
//!                         "id", "i64", rowmap_core::value::FieldType::I64, false
//!                     )
//!                 },
//!                 // ...
//!             ],
//!         }
//!     }
//!
//!     fn descriptor() -> &'static rowmap_core::descriptor::EntityDescriptor {
//!         // OnceLock-cached build + registry registration
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{
    EntityDef, EnumStorage, FieldDef, FieldShape, RelationKind, TemporalPrecision
};

/// Generates the `Entity` implementation.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let name = entity.name();
    let entity_str = name.to_string();
    let table = &entity.table;
    let fields: Vec<TokenStream> = entity.fields.iter().map(field_spec).collect();

    quote! {
        #[automatically_derived]
        impl rowmap_core::record::Entity for #name {
            fn spec() -> rowmap_core::descriptor::EntitySpec {
                rowmap_core::descriptor::EntitySpec {
                    entity: #entity_str,
                    table: #table,
                    fields: ::std::vec![#(#fields),*]
                }
            }

            fn descriptor() -> &'static rowmap_core::descriptor::EntityDescriptor {
                static DESCRIPTOR: ::std::sync::OnceLock<
                    rowmap_core::descriptor::EntityDescriptor
                > = ::std::sync::OnceLock::new();
                static REGISTERED: ::std::sync::Once = ::std::sync::Once::new();
                let descriptor = DESCRIPTOR.get_or_init(|| {
                    rowmap_core::descriptor::EntityDescriptor::build(
                        <Self as rowmap_core::record::Entity>::spec(),
                        || ::std::boxed::Box::new(<#name as ::std::default::Default>::default())
                    )
                });
                // Registration takes the registry's write lock; do it once,
                // not on every accessor call.
                REGISTERED.call_once(|| {
                    rowmap_core::descriptor::registry::register(descriptor);
                });
                descriptor
            }
        }
    }
}

/// One `FieldSpec` expression: the minimal constructor plus struct-update
/// overrides for everything the attributes declared.
fn field_spec(field: &FieldDef) -> TokenStream {
    let name = field.name_str();
    let declared = field.declared_type();
    let shape = shape_tokens(field.shape);
    let nullable = field.nullable;

    let mut overrides = Vec::new();
    if field.is_id {
        overrides.push(quote!(id: true));
    }
    if field.is_generated {
        overrides.push(quote!(generated: true));
    }
    if field.is_transient {
        overrides.push(quote!(transient: true));
    }
    if let Some(column) = &field.column {
        overrides.push(quote!(column: ::std::option::Option::Some(#column)));
    }
    if let Some(referenced) = &field.referenced {
        overrides.push(quote!(referenced: ::std::option::Option::Some(#referenced)));
    }
    if let Some(insertable) = field.insertable {
        overrides.push(quote!(insertable: ::std::option::Option::Some(#insertable)));
    }
    if let Some(updatable) = field.updatable {
        overrides.push(quote!(updatable: ::std::option::Option::Some(#updatable)));
    }
    if field.relation != RelationKind::None {
        let relation = relation_tokens(field.relation);
        overrides.push(quote!(relation: #relation));
    }
    if let Some(mapped_by) = &field.mapped_by {
        overrides.push(quote!(mapped_by: ::std::option::Option::Some(#mapped_by)));
    }
    if field.self_referencing {
        overrides.push(quote!(self_referencing: true));
    }
    if let Some(storage) = field.enum_storage {
        let base = &field.base;
        let mode = match storage {
            EnumStorage::Ordinal => quote!(rowmap_core::descriptor::EnumMode::Ordinal),
            EnumStorage::Name => quote!(rowmap_core::descriptor::EnumMode::Name)
        };
        overrides.push(quote!(enum_mode: ::std::option::Option::Some(#mode)));
        overrides.push(quote!(enum_names: ::std::option::Option::Some(
            <#base as rowmap_core::record::Enumerated>::NAMES
        )));
    }
    if let Some(precision) = field.temporal_precision() {
        let kind = match precision {
            TemporalPrecision::Date => quote!(rowmap_core::descriptor::TemporalKind::Date),
            TemporalPrecision::Time => quote!(rowmap_core::descriptor::TemporalKind::Time),
            TemporalPrecision::Timestamp => {
                quote!(rowmap_core::descriptor::TemporalKind::Timestamp)
            }
        };
        overrides.push(quote!(temporal: ::std::option::Option::Some(#kind)));
    }
    if let Some(converter) = &field.converter {
        overrides.push(quote!(converter: ::std::option::Option::Some(&#converter)));
    }
    if field.relation.is_join() {
        let base = &field.base;
        overrides.push(quote!(related: ::std::option::Option::Some(
            <#base as rowmap_core::record::Entity>::descriptor
        )));
    }

    quote! {
        rowmap_core::descriptor::FieldSpec {
            #(#overrides,)*
            ..rowmap_core::descriptor::FieldSpec::new(#name, #declared, #shape, #nullable)
        }
    }
}

fn shape_tokens(shape: FieldShape) -> TokenStream {
    match shape {
        FieldShape::Bool => quote!(rowmap_core::value::FieldType::Bool),
        FieldShape::I8 => quote!(rowmap_core::value::FieldType::I8),
        FieldShape::I16 => quote!(rowmap_core::value::FieldType::I16),
        FieldShape::I32 => quote!(rowmap_core::value::FieldType::I32),
        FieldShape::I64 => quote!(rowmap_core::value::FieldType::I64),
        FieldShape::F32 => quote!(rowmap_core::value::FieldType::F32),
        FieldShape::F64 => quote!(rowmap_core::value::FieldType::F64),
        FieldShape::Decimal => quote!(rowmap_core::value::FieldType::Decimal),
        FieldShape::Text => quote!(rowmap_core::value::FieldType::Text),
        FieldShape::Bytes => quote!(rowmap_core::value::FieldType::Bytes),
        FieldShape::Date => quote!(rowmap_core::value::FieldType::Date),
        FieldShape::Time => quote!(rowmap_core::value::FieldType::Time),
        FieldShape::DateTime => quote!(rowmap_core::value::FieldType::DateTime),
        FieldShape::Uuid => quote!(rowmap_core::value::FieldType::Uuid),
        FieldShape::Enum => quote!(rowmap_core::value::FieldType::Enum),
        FieldShape::Entity => quote!(rowmap_core::value::FieldType::Entity)
    }
}

fn relation_tokens(relation: RelationKind) -> TokenStream {
    match relation {
        RelationKind::None => quote!(rowmap_core::descriptor::Relation::None),
        RelationKind::OneToOne => quote!(rowmap_core::descriptor::Relation::OneToOne),
        RelationKind::ManyToOne => quote!(rowmap_core::descriptor::Relation::ManyToOne),
        RelationKind::OneToMany => quote!(rowmap_core::descriptor::Relation::OneToMany),
        RelationKind::ManyToMany => quote!(rowmap_core::descriptor::Relation::ManyToMany)
    }
}
