// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity metadata model.
//!
//! Three layers, built in this order:
//!
//! 1. [`EntitySpec`] / [`FieldSpec`] — the declarative mapping table the
//!    `Entity` derive emits at compile time. One tagged record per field; no
//!    reflection, no runtime attribute scanning.
//! 2. [`AttributeDescriptor`] — per-field metadata resolved from a
//!    `FieldSpec`: column identity (lookup / case-sensitive / delimited /
//!    qualified forms), owning table, flags, enum mapping, converter.
//! 3. [`EntityDescriptor`] — the per-entity aggregate: declaration-ordered
//!    attributes, case-insensitive column map, ordered id list, deduplicated
//!    insertable/updatable arrays, relationship links, and the constructor
//!    used by the materializer.
//!
//! Descriptors build once per process per type behind a `OnceLock` (atomic
//! compute-if-absent) and register themselves in the global
//! [`registry`](crate::descriptor::registry) keyed by upper-cased table name.
//! Relationship targets stay as thunks resolved on demand, so
//! mutually-referencing entities terminate without re-entrant builds.

mod attribute;
mod entity;
pub mod registry;
mod spec;

pub use attribute::{AttributeDescriptor, ColumnName};
pub use entity::{EntityDescriptor, LinkDescriptor, LinkKind, TableName};
pub use spec::{EntitySpec, EnumMode, FieldSpec, Relation, TemporalKind};
