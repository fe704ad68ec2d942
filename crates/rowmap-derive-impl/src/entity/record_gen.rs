// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl Record` generation: shape-checked field assignment and link
//! attachment.
//!
//! # Generated Code
//!
//! ```rust,ignore
//! impl rowmap_core::record::Record for Player {
//!     fn set(&mut self, attribute: &AttributeDescriptor, value: FieldValue) -> Result<()> {
//!         match attribute.field {
//!             "id" => {
//!                 if !value.is_null() {
//!                     self.id = FromFieldValue::from_field_value(value, "id")?;
//!                 }
//!             }
//!             "nickname" => {
//!                 self.nickname = FromFieldValue::from_field_value(value, "nickname")?;
//!             }
//!             _ => {} // unknown attributes are tolerated
//!         }
//!         Ok(())
//!     }
//!
//!     fn attach(&mut self, link: &LinkDescriptor, child: Box<dyn Record>) -> Result<()> {
//!         match link.field {
//!             "team" => { /* downcast, assign or push */ }
//!             _ => {}
//!         }
//!         Ok(())
//!     }
//!     // descriptor_dyn / Any upcasts
//! }
//! ```
//!
//! A NULL value on a non-`Option` field leaves the field at its default;
//! `Option` fields go through the NULL-aware extraction and become `None`.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{EntityDef, FieldDef, RelationKind};

/// Generates the `Record` implementation.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let name = entity.name();
    let set_arms: Vec<TokenStream> = entity
        .fields
        .iter()
        .filter(|f| f.is_scalar())
        .map(set_arm)
        .collect();
    let attach_arms: Vec<TokenStream> = entity
        .fields
        .iter()
        .filter(|f| f.is_link())
        .map(attach_arm)
        .collect();

    quote! {
        #[automatically_derived]
        impl rowmap_core::record::Record for #name {
            fn descriptor_dyn(&self) -> &'static rowmap_core::descriptor::EntityDescriptor {
                <Self as rowmap_core::record::Entity>::descriptor()
            }

            fn set(
                &mut self,
                attribute: &rowmap_core::descriptor::AttributeDescriptor,
                value: rowmap_core::value::FieldValue
            ) -> rowmap_core::error::Result<()> {
                match attribute.field {
                    #(#set_arms)*
                    _ => {}
                }
                ::std::result::Result::Ok(())
            }

            fn attach(
                &mut self,
                link: &rowmap_core::descriptor::LinkDescriptor,
                child: ::std::boxed::Box<dyn rowmap_core::record::Record>
            ) -> rowmap_core::error::Result<()> {
                match link.field {
                    #(#attach_arms)*
                    _ => {}
                }
                ::std::result::Result::Ok(())
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(
                self: ::std::boxed::Box<Self>
            ) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }
    }
}

fn set_arm(field: &FieldDef) -> TokenStream {
    let ident = &field.ident;
    let name = field.name_str();
    if field.nullable {
        quote! {
            #name => {
                self.#ident =
                    rowmap_core::value::FromFieldValue::from_field_value(value, #name)?;
            }
        }
    } else {
        quote! {
            #name => {
                if !value.is_null() {
                    self.#ident =
                        rowmap_core::value::FromFieldValue::from_field_value(value, #name)?;
                }
            }
        }
    }
}

fn attach_arm(field: &FieldDef) -> TokenStream {
    let ident = &field.ident;
    let name = field.name_str();
    let base = &field.base;
    let base_str = quote!(#base).to_string().replace(' ', "");

    let downcast = quote! {
        let child = child.into_any().downcast::<#base>().map_err(|_| {
            rowmap_core::error::RowmapError::Access(::std::format!(
                "link `{}` expects a child of type {}",
                #name,
                #base_str
            ))
        })?;
    };

    match field.relation {
        RelationKind::OneToMany => quote! {
            #name => {
                #downcast
                self.#ident.push(*child);
            }
        },
        _ if field.nullable => quote! {
            #name => {
                #downcast
                self.#ident = ::std::option::Option::Some(*child);
            }
        },
        _ => quote! {
            #name => {
                #downcast
                self.#ident = *child;
            }
        }
    }
}
