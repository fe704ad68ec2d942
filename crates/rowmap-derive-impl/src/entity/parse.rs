// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing for the Entity derive macro.
//!
//! Entity-level attributes (`#[entity(table = "...")]`) are parsed with
//! [`darling`]'s `FromDeriveInput`; field-level attributes mix darling
//! (`#[column(...)]`, `#[join_column(...)]`, `#[convert(...)]`) with manual
//! parsing for the marker-style attributes (`#[id]`, `#[generated]`,
//! relation markers) that don't fit darling's key-value model.
//!
//! # Architecture
//!
//! ```text
//! parse.rs (coordinator)
//! ├── entity.rs — EntityDef: struct-level attributes + cross-field checks
//! └── field.rs  — FieldDef: per-field attributes + field-shape inference
//! ```
//!
//! # Parsing Strategy
//!
//! Every attribute of a field is read up front before any decision is made,
//! so a `FieldDef` is always a complete record. Cross-field invariants (one
//! generated id at most, never alongside a composite key) are checked in
//! [`EntityDef::from_derive_input`] once all fields are parsed.

mod entity;
mod field;

pub use entity::EntityDef;
pub use field::{EnumStorage, FieldDef, FieldShape, RelationKind, TemporalPrecision};
