// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-field metadata unit.
//!
//! An [`AttributeDescriptor`] is resolved once from a
//! [`FieldSpec`](crate::descriptor::FieldSpec) during the owning entity's
//! descriptor build and is immutable thereafter.
//!
//! # Column naming
//!
//! Names surrounded by double quotes are *delimited*: case is preserved, the
//! quotes are retained for SQL emission, and stripped for the case-sensitive
//! form. Undelimited names keep their original case as the case-sensitive
//! form. Both kinds fold to lower case for the primary lookup key, so column
//! lookups are insensitive to input case.
//!
//! # Join fields
//!
//! A relationship field resolves its column from the `#[join_column]`
//! attribute: self-referencing joins use `name`, foreign-key joins use
//! `referenced`, and the field name is the fallback for both.

use crate::{
    convert::Convert,
    descriptor::{
        EntityDescriptor,
        spec::{EnumMode, FieldSpec, Relation, TemporalKind}
    },
    value::FieldType
};

/// The four forms of a column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnName {
    /// Lower-cased, quote-stripped primary lookup key.
    pub lookup: String,

    /// Case-preserving, quote-stripped name.
    pub case_sensitive: String,

    /// Name as emitted into SQL: quotes retained when delimited.
    pub delimited: String,

    /// Table-qualified form, `table.column`.
    pub qualified: String,

    /// Whether the declared name was double-quote delimited.
    pub is_delimited: bool
}

impl ColumnName {
    /// Parse a raw declared name, detecting double-quote delimiting.
    #[must_use]
    pub fn parse(raw: &str, table: &str) -> Self {
        let is_delimited = raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"');
        let inner = if is_delimited {
            &raw[1..raw.len() - 1]
        } else {
            raw
        };
        Self {
            lookup:         inner.to_lowercase(),
            case_sensitive: inner.to_string(),
            delimited:      raw.to_string(),
            qualified:      format!("{table}.{raw}"),
            is_delimited
        }
    }
}

/// Immutable metadata for one mapped field.
pub struct AttributeDescriptor {
    /// Position among the owning entity's considered attributes.
    pub index: usize,

    /// Owning entity type name.
    pub entity: &'static str,

    /// Field identifier (case-sensitive lookup key for field-name lookups).
    pub field: &'static str,

    /// Declared Rust type, for diagnostics.
    pub declared_type: &'static str,

    /// Shape of the field.
    pub field_type: FieldType,

    /// Whether the field is `Option<T>`. A NULL raw value on a
    /// non-nullable field leaves the field at its default.
    pub nullable: bool,

    /// Column identity.
    pub column: ColumnName,

    /// Owning table name (undelimited form).
    pub table: String,

    /// Primary key marker.
    pub is_id: bool,

    /// Database-generated key marker.
    pub is_generated: bool,

    /// Tri-state insert eligibility as declared. Join-crossing fields are
    /// force-excluded regardless of this value.
    pub insertable: Option<bool>,

    /// Tri-state update eligibility as declared.
    pub updatable: Option<bool>,

    /// Relationship classification.
    pub relation: Relation,

    /// Whether the related type is the owning type itself.
    pub self_referencing: bool,

    /// Enum storage mode, when the field is an enum.
    pub enum_mode: Option<EnumMode>,

    /// Ordinal-ordered constant names of the field's enum type.
    pub enum_names: Option<&'static [&'static str]>,

    /// Temporal precision marker.
    pub temporal: Option<TemporalKind>,

    /// Registered converter, taking precedence over built-in coercion.
    pub converter: Option<&'static dyn Convert>,

    related: Option<fn() -> &'static EntityDescriptor>
}

impl AttributeDescriptor {
    /// Resolve an attribute from its compile-time record.
    pub(crate) fn from_spec(index: usize, entity: &'static str, table: &str, spec: &FieldSpec) -> Self {
        let raw_name = if spec.relation.is_join() {
            // Self-joins resolve via `name`, foreign keys via `referenced`.
            if spec.self_referencing {
                spec.column.unwrap_or(spec.name)
            } else {
                spec.referenced.or(spec.column).unwrap_or(spec.name)
            }
        } else {
            spec.column.unwrap_or(spec.name)
        };

        Self {
            index,
            entity,
            field: spec.name,
            declared_type: spec.declared_type,
            field_type: spec.field_type,
            nullable: spec.nullable,
            column: ColumnName::parse(raw_name, table),
            table: table.to_string(),
            is_id: spec.id,
            is_generated: spec.generated,
            insertable: spec.insertable,
            updatable: spec.updatable,
            relation: spec.relation,
            self_referencing: spec.self_referencing,
            enum_mode: spec.enum_mode,
            enum_names: spec.enum_names,
            temporal: spec.temporal,
            converter: spec.converter,
            related: spec.related
        }
    }

    /// Whether this field represents a relationship rather than a scalar.
    #[must_use]
    pub const fn is_join(&self) -> bool {
        self.relation.is_join()
    }

    /// Whether the field crosses to a second table, which forces exclusion
    /// from the insertable and updatable arrays.
    #[must_use]
    pub const fn crosses_join(&self) -> bool {
        self.relation.is_join()
    }

    /// Table name of the related entity, for join fields. Resolves the
    /// related descriptor on first use.
    #[must_use]
    pub fn related_table(&self) -> Option<&'static str> {
        self.related
            .map(|thunk| thunk().table.undelimited.as_str())
    }

    /// Descriptor of the related entity, for join fields.
    #[must_use]
    pub fn related_descriptor(&self) -> Option<&'static EntityDescriptor> {
        self.related.map(|thunk| thunk())
    }

    /// `Entity.field` rendering used in diagnostics.
    #[must_use]
    pub fn qualified_field(&self) -> String {
        format!("{}.{}", self.entity, self.field)
    }

    /// Whether an explicit `false` or a join crossing excludes this field
    /// from INSERT column lists.
    #[must_use]
    pub fn is_insertable(&self) -> bool {
        !self.crosses_join() && self.insertable.unwrap_or(true)
    }

    /// Whether an explicit `false` or a join crossing excludes this field
    /// from UPDATE column lists.
    #[must_use]
    pub fn is_updatable(&self) -> bool {
        !self.crosses_join() && self.updatable.unwrap_or(true)
    }
}

impl std::fmt::Debug for AttributeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeDescriptor")
            .field("entity", &self.entity)
            .field("field", &self.field)
            .field("column", &self.column.case_sensitive)
            .field("table", &self.table)
            .field("field_type", &self.field_type)
            .field("is_id", &self.is_id)
            .field("relation", &self.relation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undelimited_name_folds_for_lookup_keeps_case() {
        let name = ColumnName::parse("Default_Case", "users");
        assert_eq!(name.lookup, "default_case");
        assert_eq!(name.case_sensitive, "Default_Case");
        assert_eq!(name.delimited, "Default_Case");
        assert_eq!(name.qualified, "users.Default_Case");
        assert!(!name.is_delimited);
    }

    #[test]
    fn delimited_name_round_trip() {
        let name = ColumnName::parse("\"Delimited Field Name\"", "users");
        assert_eq!(name.lookup, "delimited field name");
        assert_eq!(name.case_sensitive, "Delimited Field Name");
        assert_eq!(name.delimited, "\"Delimited Field Name\"");
        assert!(name.is_delimited);
    }
}
