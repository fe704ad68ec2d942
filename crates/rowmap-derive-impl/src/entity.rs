// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity derive macro implementation.
//!
//! Orchestrates parsing of the annotated struct into an [`EntityDef`] and
//! delegates code generation to specialized submodules.
//!
//! # Architecture
//!
//! ```text
//! entity.rs (orchestrator)
//! │
//! ├── parse/         → Attribute parsing (EntityDef, FieldDef)
//! │
//! ├── spec_gen.rs    → impl Entity: the EntitySpec mapping table and the
//! │                    cached descriptor() accessor
//! └── record_gen.rs  → impl Record: set/attach arms and Any upcasts
//! ```
//!
//! # Generated Code
//!
//! For an entity like:
//!
//! ```rust,ignore
//! #[derive(Entity, Default)]
//! #[entity(table = "players")]
//! pub struct Player {
//!     #[id]
//!     pub id: i64,
//!     pub name: String,
//! }
//! ```
//!
//! The macro generates `impl rowmap_core::record::Entity for Player` (the
//! declarative field table plus the `OnceLock`-cached descriptor) and
//! `impl rowmap_core::record::Record for Player` (field assignment and link
//! attachment driven by the materializer).

pub mod parse;
mod record_gen;
mod spec_gen;

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use self::parse::EntityDef;

/// Main entry point for the Entity derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match EntityDef::from_derive_input(&input) {
        Ok(entity) => generate(&entity),
        Err(err) => err.write_errors().into()
    }
}

fn generate(entity: &EntityDef) -> TokenStream {
    let entity_impl = spec_gen::generate(entity);
    let record_impl = record_gen::generate(entity);

    let expanded = quote! {
        #entity_impl
        #record_impl
    };

    expanded.into()
}
