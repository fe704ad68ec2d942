// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Traits implemented by derive-generated code.
//!
//! - [`Record`] — object-safe surface the materializer drives: shape-checked
//!   field assignment and parent-child link attachment, with `Any` upcasts
//!   for downcasting joined children back to concrete types.
//! - [`Entity`] — the typed entry point: the compile-time
//!   [`EntitySpec`](crate::descriptor::EntitySpec) and the cached
//!   [`EntityDescriptor`](crate::descriptor::EntityDescriptor).
//! - [`Enumerated`] — ordinal/name mapping for persisted enums.

use std::any::Any;

use crate::{
    descriptor::{AttributeDescriptor, EntityDescriptor, EntitySpec, LinkDescriptor},
    error::Result,
    value::FieldValue
};

/// Object-safe record populated by the materializer.
///
/// Implemented by the `Entity` derive; not intended for manual
/// implementation. Assignments for unknown attributes are silent no-ops so
/// that extra result-set columns stay tolerated end to end.
pub trait Record: Any {
    /// Descriptor of this record's entity type.
    fn descriptor_dyn(&self) -> &'static EntityDescriptor;

    /// Assign a coerced value onto the named attribute's field.
    fn set(&mut self, attribute: &AttributeDescriptor, value: FieldValue) -> Result<()>;

    /// Attach a joined child onto a relationship field: to-one links assign,
    /// collection links append.
    fn attach(&mut self, link: &LinkDescriptor, child: Box<dyn Record>) -> Result<()>;

    /// Upcast for inspection.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for mutation.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Consume the box for downcasting to the concrete entity type.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// A mapped entity type.
///
/// Every entity reachable during materialization must be
/// default-constructible, which the `Default` bound enforces; the
/// materializer creates joined instances through
/// [`EntityDescriptor::new_record`].
pub trait Entity: Record + Default + Sized + 'static {
    /// The declarative mapping table the derive emitted for this type.
    fn spec() -> EntitySpec;

    /// Cached descriptor. Built exactly once per process; concurrent first
    /// calls return the identical `&'static` instance.
    fn descriptor() -> &'static EntityDescriptor;
}

/// Ordinal/name mapping for a persisted enum.
///
/// Derived for fieldless enums; the constant table is built once from the
/// declaration order.
pub trait Enumerated: Sized + 'static {
    /// Constant names in declaration (ordinal) order.
    const NAMES: &'static [&'static str];

    /// Constant at the given zero-based ordinal.
    fn from_ordinal(ordinal: usize) -> Option<Self>;

    /// Constant with the given name.
    fn from_name(name: &str) -> Option<Self>;

    /// Zero-based declaration ordinal of this constant.
    fn ordinal(&self) -> usize;

    /// Canonical name of this constant.
    fn name(&self) -> &'static str;
}
