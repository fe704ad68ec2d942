// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Proc-macro implementation for rowmap.
//!
//! This crate generates the mapping metadata and record plumbing that
//! `rowmap-core` drives at runtime. Use `rowmap-derive` instead of depending
//! on this crate directly.
//!
//! # Attribute Quick Reference
//!
//! ## Entity-Level `#[entity(...)]`
//!
//! ```rust,ignore
//! #[derive(Entity, Default)]
//! #[entity(table = "users")] // Optional: defaults to the type's simple name
//! pub struct User { /* ... */ }
//! ```
//!
//! ## Field-Level Attributes
//!
//! ```rust,ignore
//! pub struct User {
//!     #[id]
//!     #[generated]                         // Database-generated key
//!     pub id: i64,
//!
//!     #[column(name = "user_name")]        // Explicit column name
//!     pub name: String,
//!
//!     #[column(insertable = false, updatable = false)]
//!     pub audit_stamp: Option<NaiveDateTime>,
//!
//!     #[enumerated(ordinal)]               // Stored by declaration ordinal
//!     pub status: Status,
//!
//!     #[convert(with = UuidAsText)]        // Custom bidirectional converter
//!     pub external_id: Uuid,
//!
//!     #[many_to_one]
//!     #[join_column(referenced = "org_id")]
//!     pub organization: Option<Organization>,
//!
//!     #[one_to_many(mapped_by = "organization")]
//!     pub members: Vec<User>,
//!
//!     #[transient]                         // Never mapped
//!     pub cached_display: String,
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod entity;
mod enumerated;

use proc_macro::TokenStream;

/// Derive macro generating table mapping metadata and record plumbing for a
/// struct.
///
/// # Overview
///
/// For an entity named `User`, the macro generates:
///
/// - **`impl Entity for User`** — the declarative
///   `EntitySpec` mapping table plus the process-cached `descriptor()`
///   accessor (built once, registered in the global table registry)
/// - **`impl Record for User`** — shape-checked field assignment and
///   parent-child link attachment, driven by the materializer
///
/// The struct must also implement `Default`; the materializer constructs
/// joined instances through it.
///
/// # Entity Attributes
///
/// | Attribute | Required | Default | Description |
/// |-----------|----------|---------|-------------|
/// | `table` | No | type's simple name | Database table name; double-quote the value inside the string to force a delimited identifier |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[id]` | Primary key member. Repeat on several fields for a composite key; declaration order is the positional contract. |
/// | `#[generated]` | Database-generated key. At most one, and never alongside a composite key. |
/// | `#[transient]` | Exclude the field from mapping entirely. |
/// | `#[column(name = "...", insertable = ..., updatable = ...)]` | Explicit column name and tri-state DML eligibility. |
/// | `#[join_column(name = "...", referenced = "...")]` | Column config for a relationship field. Self-joins resolve via `name`, foreign keys via `referenced`. |
/// | `#[one_to_one]` / `#[many_to_one]` | To-one relationship holder. |
/// | `#[one_to_many(mapped_by = "...")]` | Collection of related entities; with `mapped_by` it is the inverse side, excluded from generated SQL. |
/// | `#[many_to_many]` | Join-table relationship; excluded from INSERT/UPDATE. |
/// | `#[enumerated]` / `#[enumerated(ordinal)]` / `#[enumerated(name)]` | Enum storage mode for a type deriving [`Enumerated`](macro@Enumerated). Default is ordinal. |
/// | `#[temporal(date)]` / `#[temporal(time)]` / `#[temporal(timestamp)]` | Explicit temporal precision; inferred from the chrono type when absent. |
/// | `#[convert(with = Path)]` | Bidirectional converter; `Path` must be a unit struct implementing `Convert`. |
///
/// # Compile-Time Guarantees
///
/// - a field cannot carry both `#[column]` and `#[join_column]`
/// - at most one `#[generated]` id, never combined with a composite key
/// - `#[one_to_many]` requires a `Vec<T>` field
/// - unnamed and tuple structs are rejected
///
/// # Example
///
/// ```rust,ignore
/// use rowmap_derive::Entity;
///
/// #[derive(Entity, Default)]
/// #[entity(table = "players")]
/// pub struct Player {
///     #[id]
///     #[generated]
///     pub id: i64,
///
///     pub name: String,
///
///     #[many_to_one]
///     #[join_column(referenced = "team_id")]
///     pub team: Option<Team>,
/// }
/// ```
#[proc_macro_derive(
    Entity,
    attributes(
        entity, id, generated, transient, column, join_column, one_to_one, many_to_one,
        one_to_many, many_to_many, enumerated, temporal, convert
    )
)]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}

/// Derive macro for persisted enums.
///
/// # Overview
///
/// Implements the `Enumerated` trait for a fieldless enum: the
/// ordinal-ordered constant name table, ordinal/name lookups in both
/// directions, plus value extraction so the enum can be assigned by
/// generated `Record::set` code.
///
/// # Example
///
/// ```rust,ignore
/// use rowmap_derive::Enumerated;
///
/// #[derive(Enumerated, Debug, Clone, Copy, PartialEq, Default)]
/// pub enum Status {
///     #[default]
///     Active,
///     Suspended,
///     Closed,
/// }
///
/// assert_eq!(Status::NAMES, &["Active", "Suspended", "Closed"]);
/// assert_eq!(Status::from_ordinal(2), Some(Status::Closed));
/// ```
///
/// # Errors
///
/// Variants with fields are rejected at compile time; the storage model is
/// ordinal-or-name only.
#[proc_macro_derive(Enumerated)]
pub fn derive_enumerated(input: TokenStream) -> TokenStream {
    enumerated::derive(input)
}
