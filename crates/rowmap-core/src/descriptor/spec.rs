// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declarative mapping table emitted by the `Entity` derive.
//!
//! A [`FieldSpec`] is the compile-time record of everything the persistence
//! attributes said about one field. The derive reads all attributes up front
//! and emits the complete record before any decision is made, so no partial
//! state ever reaches the runtime build.

use crate::{convert::Convert, descriptor::EntityDescriptor, value::FieldType};

/// Relationship classification of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relation {
    /// Plain scalar column.
    #[default]
    None,
    /// `#[one_to_one]` — holds the related entity.
    OneToOne,
    /// `#[many_to_one]` — holds the related entity.
    ManyToOne,
    /// `#[one_to_many]` — holds a collection of related entities. With
    /// `mapped_by` this is the inverse side: populated during
    /// materialization, never written.
    OneToMany,
    /// `#[many_to_many]`.
    ManyToMany
}

impl Relation {
    /// Whether the field holds another entity (or a collection of them)
    /// rather than a scalar column value.
    #[must_use]
    pub const fn is_join(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Enum storage mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumMode {
    /// Stored as the zero-based declaration ordinal (1-based under MySQL).
    Ordinal,
    /// Stored as the constant's name.
    Name
}

/// Temporal precision marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    /// Calendar date only.
    Date,
    /// Time of day only.
    Time,
    /// Date and time.
    Timestamp
}

/// Compile-time record for one entity field.
#[derive(Clone)]
pub struct FieldSpec {
    /// Field identifier.
    pub name: &'static str,

    /// Declared Rust type, for diagnostics.
    pub declared_type: &'static str,

    /// Shape of the field (after unwrapping `Option`).
    pub field_type: FieldType,

    /// Whether the field is `Option<T>`.
    pub nullable: bool,

    /// `#[id]`.
    pub id: bool,

    /// `#[generated]` — database-generated key.
    pub generated: bool,

    /// `#[transient]` — never mapped.
    pub transient: bool,

    /// Explicit column name from `#[column(name = ...)]` or
    /// `#[join_column(name = ...)]`.
    pub column: Option<&'static str>,

    /// Referenced column name from `#[join_column(referenced = ...)]`.
    pub referenced: Option<&'static str>,

    /// Tri-state insert eligibility: `None` means unspecified.
    pub insertable: Option<bool>,

    /// Tri-state update eligibility: `None` means unspecified.
    pub updatable: Option<bool>,

    /// Relationship classification.
    pub relation: Relation,

    /// `mapped_by` value on an inverse `#[one_to_many]` field.
    pub mapped_by: Option<&'static str>,

    /// Whether the related type is the owning type itself.
    pub self_referencing: bool,

    /// Enum storage mode when the field is an `Enumerated` type.
    pub enum_mode: Option<EnumMode>,

    /// Ordinal-ordered constant names of the field's enum type.
    pub enum_names: Option<&'static [&'static str]>,

    /// Temporal precision marker.
    pub temporal: Option<TemporalKind>,

    /// Registered converter instance.
    pub converter: Option<&'static dyn Convert>,

    /// Thunk producing the related entity's descriptor. Present on every
    /// relationship field; never invoked during the owning build.
    pub related: Option<fn() -> &'static EntityDescriptor>
}

impl FieldSpec {
    /// Minimal record for a scalar column; the derive fills the rest with
    /// struct-update syntax.
    #[must_use]
    pub const fn new(
        name: &'static str,
        declared_type: &'static str,
        field_type: FieldType,
        nullable: bool
    ) -> Self {
        Self {
            name,
            declared_type,
            field_type,
            nullable,
            id: false,
            generated: false,
            transient: false,
            column: None,
            referenced: None,
            insertable: None,
            updatable: None,
            relation: Relation::None,
            mapped_by: None,
            self_referencing: false,
            enum_mode: None,
            enum_names: None,
            temporal: None,
            converter: None,
            related: None
        }
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("field_type", &self.field_type)
            .field("nullable", &self.nullable)
            .field("id", &self.id)
            .field("relation", &self.relation)
            .finish_non_exhaustive()
    }
}

/// Compile-time record for one entity type.
#[derive(Debug)]
pub struct EntitySpec {
    /// Entity type name.
    pub entity: &'static str,

    /// Table name, possibly double-quote delimited. Defaults to the type's
    /// simple name when the `#[entity(table = ...)]` attribute is absent.
    pub table: &'static str,

    /// Field records in declaration order.
    pub fields: Vec<FieldSpec>
}
