// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Pluggable bidirectional value converters.
//!
//! A converter registered on a field (`#[convert(with = ...)]`) takes
//! precedence over every built-in coercion rule, with one exception: under
//! [`Engine::Sqlite`](crate::value::Engine::Sqlite) an integral raw value
//! destined for a temporal field takes the built-in epoch path instead,
//! because the driver hands back a narrower type than converters expect.
//!
//! Converters are referenced as `&'static dyn Convert`; the derive emits a
//! `static` instance per converter type, so implementations must be
//! stateless unit structs (or interior-mutability-free at minimum).

use chrono::DateTime;
use uuid::Uuid;

use crate::{
    error::{Result, RowmapError},
    value::{FieldValue, SqlValue}
};

/// Bidirectional transformation between field values and database values.
pub trait Convert: Send + Sync {
    /// Transform a field value into the shape written to the database.
    fn to_database(&self, value: FieldValue) -> Result<SqlValue>;

    /// Transform a raw database value into the field's shape.
    fn from_database(&self, value: SqlValue) -> Result<FieldValue>;
}

/// Stores a `Uuid` field as a TEXT column.
#[derive(Debug, Clone, Copy)]
pub struct UuidAsText;

impl Convert for UuidAsText {
    fn to_database(&self, value: FieldValue) -> Result<SqlValue> {
        match value {
            FieldValue::Null => Ok(SqlValue::Null),
            FieldValue::Uuid(u) => Ok(SqlValue::Text(u.to_string())),
            other => Err(RowmapError::Access(format!(
                "UuidAsText expects a Uuid field value, got {}",
                other.shape()
            )))
        }
    }

    fn from_database(&self, value: SqlValue) -> Result<FieldValue> {
        match value {
            SqlValue::Null => Ok(FieldValue::Null),
            SqlValue::Text(s) => Uuid::parse_str(s.trim())
                .map(FieldValue::Uuid)
                .map_err(|e| RowmapError::ResultSet(format!("malformed UUID text: {e}"))),
            other => Err(RowmapError::ResultSet(format!(
                "UuidAsText expects a text column, got {}",
                other.shape()
            )))
        }
    }
}

/// Stores a `NaiveDateTime` field as a BIGINT epoch-milliseconds column.
#[derive(Debug, Clone, Copy)]
pub struct TimestampAsEpochMillis;

impl Convert for TimestampAsEpochMillis {
    fn to_database(&self, value: FieldValue) -> Result<SqlValue> {
        match value {
            FieldValue::Null => Ok(SqlValue::Null),
            FieldValue::DateTime(dt) => Ok(SqlValue::BigInt(dt.and_utc().timestamp_millis())),
            other => Err(RowmapError::Access(format!(
                "TimestampAsEpochMillis expects a NaiveDateTime field value, got {}",
                other.shape()
            )))
        }
    }

    fn from_database(&self, value: SqlValue) -> Result<FieldValue> {
        match value {
            SqlValue::Null => Ok(FieldValue::Null),
            SqlValue::BigInt(ms) => DateTime::from_timestamp_millis(ms)
                .map(|dt| FieldValue::DateTime(dt.naive_utc()))
                .ok_or_else(|| {
                    RowmapError::ResultSet(format!("epoch milliseconds out of range: {ms}"))
                }),
            other => Err(RowmapError::ResultSet(format!(
                "TimestampAsEpochMillis expects a bigint column, got {}",
                other.shape()
            )))
        }
    }
}
