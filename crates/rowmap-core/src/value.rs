// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Value model shared by the coercion matrix, the materializer, and the
//! statement binder.
//!
//! Two closed unions live here:
//!
//! - [`SqlValue`] — the finite set of shapes a database driver hands back
//!   (or accepts). Drivers disagree about which shape represents a given SQL
//!   type (SQLite returns integers for TIMESTAMP columns, MySQL and H2 pick
//!   different integer widths for the same column), so coercion dispatches on
//!   the *value's* shape first, never on the schema.
//! - [`FieldValue`] — a value already shaped for a target field, produced by
//!   [`coerce::from_database`](crate::coerce::from_database) and consumed by
//!   generated [`Record::set`](crate::record::Record::set) implementations
//!   through [`FromFieldValue`].

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Result, RowmapError};

/// Database engine the values travelled through.
///
/// Only engines with a documented special case get a variant; everything
/// else is `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    /// No engine-specific behavior.
    #[default]
    Generic,
    /// ENUM storage is 1-based; ordinal coercion shifts by one.
    MySql,
    /// Integral raw values for temporal fields bypass registered converters
    /// (the driver returns a narrower type than converters expect).
    Sqlite,
    /// `citext` columns unwrap to plain text.
    Postgres
}

/// Statically declared shape of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
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
    /// A type deriving `Enumerated`, stored by ordinal or name.
    Enum,
    /// A relationship holder (another entity). Never coerced; populated by
    /// the materializer through link attachment.
    Entity
}

impl FieldType {
    /// Diagnostic name of the target type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "Decimal",
            Self::Text => "String",
            Self::Bytes => "Vec<u8>",
            Self::Date => "NaiveDate",
            Self::Time => "NaiveTime",
            Self::DateTime => "NaiveDateTime",
            Self::Uuid => "Uuid",
            Self::Enum => "enum",
            Self::Entity => "entity"
        }
    }
}

/// Handle on a character-large-object stream.
///
/// Drained in fixed-size chunks until end-of-stream when the target field is
/// `String`. The stream is consumed exactly once.
pub struct CharStream {
    reader: Box<dyn Read + Send>
}

impl CharStream {
    /// Chunk size used while draining.
    pub const CHUNK: usize = 4096;

    /// Wrap a reader as a large-object handle.
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            reader: Box::new(reader)
        }
    }

    /// Drain the stream to a `String`, reading [`Self::CHUNK`] bytes at a
    /// time until end-of-stream.
    pub fn drain(mut self) -> Result<String> {
        let mut out = Vec::new();
        let mut chunk = [0u8; Self::CHUNK];
        loop {
            let n = self.reader.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8(out)
            .map_err(|e| RowmapError::ResultSet(format!("CLOB is not valid UTF-8: {e}")))
    }
}

impl std::fmt::Debug for CharStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CharStream(..)")
    }
}

/// Raw value as returned by (or bound into) the database client.
#[derive(Debug)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// 8-bit integer.
    TinyInt(i8),
    /// 16-bit integer.
    SmallInt(i16),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    BigInt(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
    /// Text.
    Text(String),
    /// Byte sequence (BLOB).
    Bytes(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time.
    Timestamp(NaiveDateTime),
    /// UUID.
    Uuid(Uuid),
    /// Character-large-object stream.
    Clob(CharStream)
}

impl SqlValue {
    /// Whether this value is SQL NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this value is one of the integral shapes.
    #[must_use]
    pub const fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::TinyInt(_) | Self::SmallInt(_) | Self::Int(_) | Self::BigInt(_)
        )
    }

    /// Diagnostic name of the shape.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool(_) => "boolean",
            Self::TinyInt(_) => "tinyint",
            Self::SmallInt(_) => "smallint",
            Self::Int(_) => "integer",
            Self::BigInt(_) => "bigint",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Timestamp(_) => "timestamp",
            Self::Uuid(_) => "uuid",
            Self::Clob(_) => "clob"
        }
    }

    /// Short rendering for diagnostics. Large shapes render as their shape
    /// name only.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(v) => v.to_string(),
            Self::TinyInt(v) => v.to_string(),
            Self::SmallInt(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::BigInt(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Decimal(v) => v.to_string(),
            Self::Text(v) => format!("'{v}'"),
            Self::Bytes(v) => format!("<{} bytes>", v.len()),
            Self::Date(v) => v.to_string(),
            Self::Time(v) => v.to_string(),
            Self::Timestamp(v) => v.to_string(),
            Self::Uuid(v) => v.to_string(),
            Self::Clob(_) => "<clob>".to_string()
        }
    }
}

// Clob handles are never equal; everything else compares by value. Manual
// impl because `CharStream` holds a reader.
impl PartialEq for SqlValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::TinyInt(a), Self::TinyInt(b)) => a == b,
            (Self::SmallInt(a), Self::SmallInt(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            _ => false
        }
    }
}

/// A value already shaped for its target field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// SQL NULL — maps to `None` for `Option` fields.
    Null,
    /// `bool`
    Bool(bool),
    /// `i8`
    I8(i8),
    /// `i16`
    I16(i16),
    /// `i32`
    I32(i32),
    /// `i64`
    I64(i64),
    /// `f32`
    F32(f32),
    /// `f64`
    F64(f64),
    /// `Decimal`
    Decimal(Decimal),
    /// `String`
    Text(String),
    /// `Vec<u8>`
    Bytes(Vec<u8>),
    /// `NaiveDate`
    Date(NaiveDate),
    /// `NaiveTime`
    Time(NaiveTime),
    /// `NaiveDateTime`
    DateTime(NaiveDateTime),
    /// `Uuid`
    Uuid(Uuid),
    /// Resolved enum constant: ordinal position and canonical name.
    Enum {
        /// Zero-based position in declaration order.
        ordinal: usize,
        /// Canonical constant name.
        name:    &'static str
    }
}

impl FieldValue {
    /// Whether this value is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Diagnostic name of the shape.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Decimal(_) => "Decimal",
            Self::Text(_) => "String",
            Self::Bytes(_) => "Vec<u8>",
            Self::Date(_) => "NaiveDate",
            Self::Time(_) => "NaiveTime",
            Self::DateTime(_) => "NaiveDateTime",
            Self::Uuid(_) => "Uuid",
            Self::Enum { .. } => "enum"
        }
    }
}

/// Extraction of a concrete field value from a [`FieldValue`].
///
/// Mirrors the leaf-per-type extraction drivers use for row reads: one impl
/// per supported target type, plus a NULL-aware `Option<T>` wrapper.
/// Generated `Record::set` arms call this; a shape mismatch here means the
/// coercion matrix and the field table disagree, which is a programming
/// error, not a data error.
pub trait FromFieldValue: Sized {
    /// Extract `Self`, failing with field context on a shape mismatch.
    fn from_field_value(value: FieldValue, field: &str) -> Result<Self>;
}

fn mismatch<T>(value: &FieldValue, expected: &'static str, field: &str) -> Result<T> {
    Err(RowmapError::Access(format!(
        "field `{field}` expects {expected}, got {} value",
        value.shape()
    )))
}

macro_rules! impl_from_field_value {
    ($($ty:ty => $variant:ident, $expected:literal);* $(;)?) => {
        $(
            impl FromFieldValue for $ty {
                fn from_field_value(value: FieldValue, field: &str) -> Result<Self> {
                    match value {
                        FieldValue::$variant(v) => Ok(v),
                        other => mismatch(&other, $expected, field)
                    }
                }
            }
        )*
    };
}

impl_from_field_value! {
    bool => Bool, "bool";
    i8 => I8, "i8";
    i16 => I16, "i16";
    i32 => I32, "i32";
    i64 => I64, "i64";
    f32 => F32, "f32";
    f64 => F64, "f64";
    Decimal => Decimal, "Decimal";
    String => Text, "String";
    Vec<u8> => Bytes, "Vec<u8>";
    NaiveDate => Date, "NaiveDate";
    NaiveTime => Time, "NaiveTime";
    NaiveDateTime => DateTime, "NaiveDateTime";
    Uuid => Uuid, "Uuid";
}

impl<T: FromFieldValue> FromFieldValue for Option<T> {
    fn from_field_value(value: FieldValue, field: &str) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_field_value(value, field).map(Some)
        }
    }
}
