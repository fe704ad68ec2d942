// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level attribute parsing and field-shape inference.
//!
//! A [`FieldDef`] is the complete per-field record: markers (`#[id]`,
//! `#[generated]`, `#[transient]`), column configuration, relationship
//! classification, enum/temporal/converter handling, and the inferred
//! [`FieldShape`] after unwrapping `Option`.
//!
//! # Shape inference
//!
//! | Declared type | Shape |
//! |---------------|-------|
//! | `bool`, `i8`..`i64`, `f32`, `f64` | matching primitive |
//! | `String` | `Text` |
//! | `Vec<u8>` | `Bytes` |
//! | `Decimal` | `Decimal` |
//! | `NaiveDate` / `NaiveTime` / `NaiveDateTime` | temporal |
//! | `Uuid` | `Uuid` |
//! | `#[enumerated]` type | `Enum` |
//! | relation-marked type | `Entity` |
//!
//! Anything else is a compile error unless the field is `#[transient]`.

use darling::FromMeta;
use syn::{Attribute, Field, GenericArgument, Ident, Meta, PathArguments, Type};

/// Relationship classification, as declared by the relation markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelationKind {
    /// Plain scalar column.
    #[default]
    None,
    /// `#[one_to_one]`.
    OneToOne,
    /// `#[many_to_one]`.
    ManyToOne,
    /// `#[one_to_many]`.
    OneToMany,
    /// `#[many_to_many]`.
    ManyToMany
}

impl RelationKind {
    /// Whether the field holds another entity.
    #[must_use]
    pub fn is_join(self) -> bool {
        self != Self::None
    }
}

/// Enum storage mode from `#[enumerated(...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumStorage {
    /// Zero-based declaration ordinal (the default).
    #[default]
    Ordinal,
    /// Constant name.
    Name
}

/// Temporal precision from `#[temporal(...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalPrecision {
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp
}

/// Target shape of the field after unwrapping `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `rust_decimal::Decimal`
    Decimal,
    /// `String`
    Text,
    /// `Vec<u8>`
    Bytes,
    /// `chrono::NaiveDate`
    Date,
    /// `chrono::NaiveTime`
    Time,
    /// `chrono::NaiveDateTime`
    DateTime,
    /// `uuid::Uuid`
    Uuid,
    /// A type deriving `Enumerated`.
    Enum,
    /// A relationship holder.
    Entity
}

/// `#[column(name = "...", insertable = ..., updatable = ...)]`.
#[derive(Debug, Default, FromMeta)]
struct ColumnAttr {
    #[darling(default)]
    name:       Option<String>,
    #[darling(default)]
    insertable: Option<bool>,
    #[darling(default)]
    updatable:  Option<bool>
}

/// `#[join_column(name = "...", referenced = "...", ...)]`.
#[derive(Debug, Default, FromMeta)]
struct JoinColumnAttr {
    #[darling(default)]
    name:       Option<String>,
    #[darling(default)]
    referenced: Option<String>,
    #[darling(default)]
    insertable: Option<bool>,
    #[darling(default)]
    updatable:  Option<bool>
}

/// `#[one_to_many(mapped_by = "...")]`.
#[derive(Debug, Default, FromMeta)]
struct OneToManyAttr {
    #[darling(default)]
    mapped_by: Option<String>
}

/// `#[convert(with = Path)]`.
#[derive(Debug, FromMeta)]
struct ConvertAttr {
    with: syn::Path
}

/// Field definition with all parsed attributes.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier.
    pub ident: Ident,

    /// Declared field type, as written.
    pub ty: Type,

    /// Base type after unwrapping `Option` (and the `Vec` element type for
    /// `#[one_to_many]` fields).
    pub base: Type,

    /// Whether the declared type is `Option<T>`.
    pub nullable: bool,

    /// Inferred target shape.
    pub shape: FieldShape,

    /// `#[id]` marker.
    pub is_id: bool,

    /// `#[generated]` marker.
    pub is_generated: bool,

    /// `#[transient]` marker.
    pub is_transient: bool,

    /// Explicit column name.
    pub column: Option<String>,

    /// Referenced column name from `#[join_column]`.
    pub referenced: Option<String>,

    /// Tri-state insert eligibility.
    pub insertable: Option<bool>,

    /// Tri-state update eligibility.
    pub updatable: Option<bool>,

    /// Relationship classification.
    pub relation: RelationKind,

    /// `mapped_by` value on an inverse `#[one_to_many]`.
    pub mapped_by: Option<String>,

    /// Enum storage mode; `Some` when `#[enumerated]` is present.
    pub enum_storage: Option<EnumStorage>,

    /// Explicit temporal precision.
    pub temporal: Option<TemporalPrecision>,

    /// Converter path from `#[convert(with = ...)]`.
    pub converter: Option<syn::Path>,

    /// Whether the related type is the owning struct itself.
    pub self_referencing: bool
}

impl FieldDef {
    /// Parse a field definition from syn's `Field`.
    ///
    /// # Errors
    ///
    /// - unnamed field (tuple struct)
    /// - both `#[column]` and `#[join_column]` on one field
    /// - `#[one_to_many]` on a non-`Vec` field
    /// - a declared type with no supported shape (unless `#[transient]`)
    pub fn from_field(field: &Field, owner: &Ident) -> darling::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Entity fields must be named").with_span(field)
        })?;
        let ty = field.ty.clone();

        let mut is_id = false;
        let mut is_generated = false;
        let mut is_transient = false;
        let mut column: Option<ColumnAttr> = None;
        let mut join_column: Option<JoinColumnAttr> = None;
        let mut relation = RelationKind::None;
        let mut mapped_by = None;
        let mut enum_storage = None;
        let mut temporal = None;
        let mut converter = None;

        for attr in &field.attrs {
            if attr.path().is_ident("id") {
                is_id = true;
            } else if attr.path().is_ident("generated") {
                is_generated = true;
            } else if attr.path().is_ident("transient") {
                is_transient = true;
            } else if attr.path().is_ident("column") {
                column = Some(ColumnAttr::from_meta(&attr.meta)?);
            } else if attr.path().is_ident("join_column") {
                join_column = Some(JoinColumnAttr::from_meta(&attr.meta)?);
            } else if attr.path().is_ident("one_to_one") {
                relation = RelationKind::OneToOne;
            } else if attr.path().is_ident("many_to_one") {
                relation = RelationKind::ManyToOne;
            } else if attr.path().is_ident("many_to_many") {
                relation = RelationKind::ManyToMany;
            } else if attr.path().is_ident("one_to_many") {
                relation = RelationKind::OneToMany;
                if let Meta::List(_) = &attr.meta {
                    mapped_by = OneToManyAttr::from_meta(&attr.meta)?.mapped_by;
                }
            } else if attr.path().is_ident("enumerated") {
                enum_storage = Some(parse_enumerated(attr)?);
            } else if attr.path().is_ident("temporal") {
                temporal = Some(parse_temporal(attr)?);
            } else if attr.path().is_ident("convert") {
                converter = Some(ConvertAttr::from_meta(&attr.meta)?.with);
            }
        }

        if column.is_some() && join_column.is_some() {
            return Err(darling::Error::custom(
                "a field cannot carry both #[column] and #[join_column]"
            )
            .with_span(field));
        }

        let (nullable, unwrapped) = match option_inner(&ty) {
            Some(inner) => (true, inner.clone()),
            None => (false, ty.clone())
        };

        let base = if relation == RelationKind::OneToMany {
            vec_inner(&unwrapped)
                .ok_or_else(|| {
                    darling::Error::custom("#[one_to_many] requires a Vec<T> field")
                        .with_span(field)
                })?
                .clone()
        } else {
            unwrapped
        };

        let shape = if relation.is_join() {
            FieldShape::Entity
        } else if enum_storage.is_some() {
            FieldShape::Enum
        } else {
            match infer_shape(&base) {
                Some(shape) => shape,
                None if is_transient => FieldShape::Text,
                None => {
                    return Err(darling::Error::custom(format!(
                        "unsupported field type `{}`: mark it #[transient], add a relation \
                         attribute, or derive Enumerated and add #[enumerated]",
                        type_string(&base)
                    ))
                    .with_span(field));
                }
            }
        };

        let self_referencing = last_ident(&base).is_some_and(|id| id == owner);

        let (column_name, referenced, insertable, updatable) = match (column, join_column) {
            (Some(c), None) => (c.name, None, c.insertable, c.updatable),
            (None, Some(j)) => (j.name, j.referenced, j.insertable, j.updatable),
            _ => (None, None, None, None)
        };

        Ok(Self {
            ident,
            ty,
            base,
            nullable,
            shape,
            is_id,
            is_generated,
            is_transient,
            column: column_name,
            referenced,
            insertable,
            updatable,
            relation,
            mapped_by,
            enum_storage,
            temporal,
            converter,
            self_referencing
        })
    }

    /// Field name as a string, for match arms and diagnostics.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }

    /// Declared type rendered for diagnostics, whitespace-free.
    #[must_use]
    pub fn declared_type(&self) -> String {
        type_string(&self.ty)
    }

    /// Whether the field contributes a scalar column assignment arm.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !self.is_transient && self.shape != FieldShape::Entity
    }

    /// Whether the field receives a child through link attachment.
    #[must_use]
    pub fn is_link(&self) -> bool {
        matches!(
            self.relation,
            RelationKind::OneToOne | RelationKind::ManyToOne | RelationKind::OneToMany
        )
    }

    /// Temporal precision, explicit or inferred from the chrono shape.
    #[must_use]
    pub fn temporal_precision(&self) -> Option<TemporalPrecision> {
        self.temporal.or(match self.shape {
            FieldShape::Date => Some(TemporalPrecision::Date),
            FieldShape::Time => Some(TemporalPrecision::Time),
            FieldShape::DateTime => Some(TemporalPrecision::Timestamp),
            _ => None
        })
    }
}

fn parse_enumerated(attr: &Attribute) -> darling::Result<EnumStorage> {
    match &attr.meta {
        Meta::Path(_) => Ok(EnumStorage::Ordinal),
        _ => {
            let mode: Ident = attr.parse_args()?;
            if mode == "ordinal" {
                Ok(EnumStorage::Ordinal)
            } else if mode == "name" {
                Ok(EnumStorage::Name)
            } else {
                Err(darling::Error::custom(
                    "#[enumerated] accepts `ordinal` or `name`"
                )
                .with_span(attr))
            }
        }
    }
}

fn parse_temporal(attr: &Attribute) -> darling::Result<TemporalPrecision> {
    let precision: Ident = attr.parse_args()?;
    if precision == "date" {
        Ok(TemporalPrecision::Date)
    } else if precision == "time" {
        Ok(TemporalPrecision::Time)
    } else if precision == "timestamp" {
        Ok(TemporalPrecision::Timestamp)
    } else {
        Err(darling::Error::custom(
            "#[temporal] accepts `date`, `time`, or `timestamp`"
        )
        .with_span(attr))
    }
}

/// Inner type of `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    generic_inner(ty, "Option")
}

/// Inner type of `Vec<T>`.
fn vec_inner(ty: &Type) -> Option<&Type> {
    generic_inner(ty, "Vec")
}

fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None
    })
}

fn last_ident(ty: &Type) -> Option<&Ident> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| &s.ident),
        _ => None
    }
}

fn infer_shape(base: &Type) -> Option<FieldShape> {
    if vec_inner(base).is_some_and(|inner| last_ident(inner).is_some_and(|id| id == "u8")) {
        return Some(FieldShape::Bytes);
    }
    let ident = last_ident(base)?;
    let shape = if ident == "bool" {
        FieldShape::Bool
    } else if ident == "i8" {
        FieldShape::I8
    } else if ident == "i16" {
        FieldShape::I16
    } else if ident == "i32" {
        FieldShape::I32
    } else if ident == "i64" {
        FieldShape::I64
    } else if ident == "f32" {
        FieldShape::F32
    } else if ident == "f64" {
        FieldShape::F64
    } else if ident == "Decimal" {
        FieldShape::Decimal
    } else if ident == "String" {
        FieldShape::Text
    } else if ident == "NaiveDate" {
        FieldShape::Date
    } else if ident == "NaiveTime" {
        FieldShape::Time
    } else if ident == "NaiveDateTime" {
        FieldShape::DateTime
    } else if ident == "Uuid" {
        FieldShape::Uuid
    } else {
        return None;
    };
    Some(shape)
}

/// Render a type without whitespace, e.g. `Option<String>`.
fn type_string(ty: &Type) -> String {
    quote::quote!(#ty).to_string().replace(' ', "")
}
