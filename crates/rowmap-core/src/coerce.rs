// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Coercion between raw driver values and declared field types.
//!
//! The read path dispatches on the **raw value's shape first**, then on the
//! target [`FieldType`]. Drivers disagree about which shape represents a
//! given SQL type (SQLite returns integers for TIMESTAMP columns; MySQL and
//! H2 hand back different integer widths for the same column), so the
//! coercion must be value-driven, never schema-driven.
//!
//! A registered [`Convert`](crate::convert::Convert) takes precedence over
//! every built-in rule, except under [`Engine::Sqlite`] where an integral
//! raw value destined for a temporal field takes the built-in epoch path —
//! the driver returns a narrower type than converters expect.
//!
//! A value/target pair with no applicable rule is an **error** carrying the
//! raw value, the column type name, the target type, and the field identity.
//! The matrix never silently leaves a field unassigned.

use chrono::{DateTime, Datelike, NaiveTime};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive}
};
use tracing::trace;
use uuid::Uuid;

use crate::{
    descriptor::{AttributeDescriptor, EnumMode},
    error::{Result, RowmapError},
    value::{Engine, FieldType, FieldValue, SqlValue}
};

/// Coerce a raw database value into the attribute's field shape.
pub fn from_database(
    attribute: &AttributeDescriptor,
    raw: SqlValue,
    column_type: &str,
    engine: Engine
) -> Result<FieldValue> {
    if raw.is_null() {
        return Ok(FieldValue::Null);
    }

    if let Some(converter) = attribute.converter {
        if !sqlite_bypasses_converter(engine, &raw, attribute) {
            return converter.from_database(raw).map_err(|e| match e {
                RowmapError::Conversion { .. } => e,
                other => RowmapError::Conversion {
                    attribute: attribute.qualified_field(),
                    message:   other.to_string()
                }
            });
        }
        trace!(
            field = %attribute.qualified_field(),
            "integral raw value for temporal field under SQLite, bypassing converter"
        );
    }

    // YEAR columns produce a calendar year regardless of the raw shape the
    // driver picked.
    if column_type.eq_ignore_ascii_case("YEAR") {
        return year(attribute, raw, column_type);
    }

    match raw {
        SqlValue::Null => Ok(FieldValue::Null),
        SqlValue::Bool(v) => from_bool(attribute, v, column_type),
        SqlValue::TinyInt(v) => from_integral(attribute, i64::from(v), column_type, engine),
        SqlValue::SmallInt(v) => from_integral(attribute, i64::from(v), column_type, engine),
        SqlValue::Int(v) => from_integral(attribute, i64::from(v), column_type, engine),
        SqlValue::BigInt(v) => from_integral(attribute, v, column_type, engine),
        SqlValue::Float(v) => from_floating(attribute, f64::from(v), column_type),
        SqlValue::Double(v) => from_floating(attribute, v, column_type),
        SqlValue::Decimal(v) => from_decimal(attribute, v, column_type),
        SqlValue::Text(v) => from_text(attribute, v, column_type, engine),
        SqlValue::Bytes(v) => from_bytes(attribute, v, column_type),
        SqlValue::Date(v) => from_date(attribute, v, column_type),
        SqlValue::Time(v) => from_time(attribute, v, column_type),
        SqlValue::Timestamp(v) => from_timestamp(attribute, v, column_type),
        SqlValue::Uuid(v) => from_uuid(attribute, v, column_type),
        SqlValue::Clob(stream) => match attribute.field_type {
            FieldType::Text => Ok(FieldValue::Text(stream.drain()?)),
            _ => Err(no_rule(attribute, column_type, "<clob>"))
        }
    }
}

/// Coerce a field value into the shape written to the database.
pub fn to_database(
    attribute: &AttributeDescriptor,
    value: FieldValue,
    engine: Engine
) -> Result<SqlValue> {
    if let Some(converter) = attribute.converter {
        return converter.to_database(value).map_err(|e| match e {
            RowmapError::Conversion { .. } => e,
            other => RowmapError::Conversion {
                attribute: attribute.qualified_field(),
                message:   other.to_string()
            }
        });
    }

    Ok(match value {
        FieldValue::Null => SqlValue::Null,
        FieldValue::Bool(v) => SqlValue::Bool(v),
        FieldValue::I8(v) => SqlValue::TinyInt(v),
        FieldValue::I16(v) => SqlValue::SmallInt(v),
        FieldValue::I32(v) => SqlValue::Int(v),
        FieldValue::I64(v) => SqlValue::BigInt(v),
        FieldValue::F32(v) => SqlValue::Float(v),
        FieldValue::F64(v) => SqlValue::Double(v),
        FieldValue::Decimal(v) => SqlValue::Decimal(v),
        FieldValue::Text(v) => SqlValue::Text(v),
        FieldValue::Bytes(v) => SqlValue::Bytes(v),
        FieldValue::Date(v) => SqlValue::Date(v),
        FieldValue::Time(v) => SqlValue::Time(v),
        FieldValue::DateTime(v) => SqlValue::Timestamp(v),
        FieldValue::Uuid(v) => SqlValue::Uuid(v),
        FieldValue::Enum { ordinal, name } => match attribute.enum_mode {
            Some(EnumMode::Name) => SqlValue::Text(name.to_string()),
            // ENUM storage is 1-based under MySQL.
            _ => {
                let offset = usize::from(engine == Engine::MySql);
                SqlValue::BigInt((ordinal + offset) as i64)
            }
        }
    })
}

/// Whether the SQLite narrow-raw-type hack applies: an integral raw value
/// destined for a temporal field bypasses the registered converter.
fn sqlite_bypasses_converter(
    engine: Engine,
    raw: &SqlValue,
    attribute: &AttributeDescriptor
) -> bool {
    engine == Engine::Sqlite
        && raw.is_integral()
        && matches!(
            attribute.field_type,
            FieldType::Date | FieldType::Time | FieldType::DateTime
        )
}

fn no_rule(attribute: &AttributeDescriptor, column_type: &str, value: impl Into<String>) -> RowmapError {
    RowmapError::coercion(
        attribute.qualified_field(),
        column_type,
        attribute.field_type.name(),
        value
    )
}

fn year(attribute: &AttributeDescriptor, raw: SqlValue, column_type: &str) -> Result<FieldValue> {
    let year = match &raw {
        SqlValue::Date(d) => i64::from(d.year()),
        SqlValue::Timestamp(ts) => i64::from(ts.date().year()),
        SqlValue::TinyInt(v) => i64::from(*v),
        SqlValue::SmallInt(v) => i64::from(*v),
        SqlValue::Int(v) => i64::from(*v),
        SqlValue::BigInt(v) => *v,
        SqlValue::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| no_rule(attribute, column_type, raw.render()))?,
        _ => return Err(no_rule(attribute, column_type, raw.render()))
    };
    match attribute.field_type {
        FieldType::Text => Ok(FieldValue::Text(format!("{year:04}"))),
        FieldType::I16 => Ok(FieldValue::I16(year as i16)),
        FieldType::I32 => Ok(FieldValue::I32(year as i32)),
        FieldType::I64 => Ok(FieldValue::I64(year)),
        _ => Err(no_rule(attribute, column_type, raw.render()))
    }
}

fn from_bool(attribute: &AttributeDescriptor, v: bool, column_type: &str) -> Result<FieldValue> {
    match attribute.field_type {
        FieldType::Bool => Ok(FieldValue::Bool(v)),
        FieldType::I8 => Ok(FieldValue::I8(i8::from(v))),
        FieldType::I16 => Ok(FieldValue::I16(i16::from(v))),
        FieldType::I32 => Ok(FieldValue::I32(i32::from(v))),
        FieldType::I64 => Ok(FieldValue::I64(i64::from(v))),
        _ => Err(no_rule(attribute, column_type, v.to_string()))
    }
}

// Integer narrowing truncates (two's complement) rather than rounding or
// saturating, matching the established wire behavior.
fn from_integral(
    attribute: &AttributeDescriptor,
    v: i64,
    column_type: &str,
    engine: Engine
) -> Result<FieldValue> {
    match attribute.field_type {
        FieldType::Bool => Ok(FieldValue::Bool(v != 0)),
        FieldType::I8 => Ok(FieldValue::I8(v as i8)),
        FieldType::I16 => Ok(FieldValue::I16(v as i16)),
        FieldType::I32 => Ok(FieldValue::I32(v as i32)),
        FieldType::I64 => Ok(FieldValue::I64(v)),
        FieldType::F32 => Ok(FieldValue::F32(v as f32)),
        FieldType::F64 => Ok(FieldValue::F64(v as f64)),
        FieldType::Decimal => Ok(FieldValue::Decimal(Decimal::from(v))),
        FieldType::DateTime => epoch_datetime(attribute, v, column_type),
        FieldType::Date => {
            epoch_datetime(attribute, v, column_type).map(|dt| match dt {
                FieldValue::DateTime(dt) => FieldValue::Date(dt.date()),
                other => other
            })
        }
        FieldType::Time => {
            epoch_datetime(attribute, v, column_type).map(|dt| match dt {
                FieldValue::DateTime(dt) => FieldValue::Time(dt.time()),
                other => other
            })
        }
        FieldType::Enum => enum_from_ordinal(attribute, v, column_type, engine),
        _ => Err(no_rule(attribute, column_type, v.to_string()))
    }
}

fn epoch_datetime(attribute: &AttributeDescriptor, millis: i64, column_type: &str) -> Result<FieldValue> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| FieldValue::DateTime(dt.naive_utc()))
        .ok_or_else(|| no_rule(attribute, column_type, millis.to_string()))
}

fn from_floating(attribute: &AttributeDescriptor, v: f64, column_type: &str) -> Result<FieldValue> {
    match attribute.field_type {
        FieldType::I8 => Ok(FieldValue::I8(v as i8)),
        FieldType::I16 => Ok(FieldValue::I16(v as i16)),
        FieldType::I32 => Ok(FieldValue::I32(v as i32)),
        FieldType::I64 => Ok(FieldValue::I64(v as i64)),
        FieldType::F32 => Ok(FieldValue::F32(v as f32)),
        FieldType::F64 => Ok(FieldValue::F64(v)),
        FieldType::Decimal => Decimal::from_f64(v)
            .map(FieldValue::Decimal)
            .ok_or_else(|| no_rule(attribute, column_type, v.to_string())),
        _ => Err(no_rule(attribute, column_type, v.to_string()))
    }
}

fn from_decimal(attribute: &AttributeDescriptor, v: Decimal, column_type: &str) -> Result<FieldValue> {
    // Narrowing truncates toward zero.
    let truncated = v.trunc();
    match attribute.field_type {
        FieldType::I8 => truncated
            .to_i8()
            .map(FieldValue::I8)
            .ok_or_else(|| no_rule(attribute, column_type, v.to_string())),
        FieldType::I16 => truncated
            .to_i16()
            .map(FieldValue::I16)
            .ok_or_else(|| no_rule(attribute, column_type, v.to_string())),
        FieldType::I32 => truncated
            .to_i32()
            .map(FieldValue::I32)
            .ok_or_else(|| no_rule(attribute, column_type, v.to_string())),
        FieldType::I64 => truncated
            .to_i64()
            .map(FieldValue::I64)
            .ok_or_else(|| no_rule(attribute, column_type, v.to_string())),
        FieldType::F32 => v
            .to_f32()
            .map(FieldValue::F32)
            .ok_or_else(|| no_rule(attribute, column_type, v.to_string())),
        FieldType::F64 => v
            .to_f64()
            .map(FieldValue::F64)
            .ok_or_else(|| no_rule(attribute, column_type, v.to_string())),
        FieldType::Decimal => Ok(FieldValue::Decimal(v)),
        FieldType::Text => Ok(FieldValue::Text(v.to_string())),
        _ => Err(no_rule(attribute, column_type, v.to_string()))
    }
}

fn from_text(
    attribute: &AttributeDescriptor,
    v: String,
    column_type: &str,
    engine: Engine
) -> Result<FieldValue> {
    let parse_err = |attribute: &AttributeDescriptor| no_rule(attribute, column_type, format!("'{v}'"));
    match attribute.field_type {
        // Engine-specific case-insensitive text wrappers (Postgres citext)
        // arrive here already unwrapped to plain text.
        FieldType::Text => Ok(FieldValue::Text(v)),
        FieldType::Bool => match v.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(FieldValue::Bool(true)),
            "false" | "0" => Ok(FieldValue::Bool(false)),
            _ => Err(parse_err(attribute))
        },
        FieldType::I8 => v.trim().parse().map(FieldValue::I8).map_err(|_| parse_err(attribute)),
        FieldType::I16 => v.trim().parse().map(FieldValue::I16).map_err(|_| parse_err(attribute)),
        FieldType::I32 => v.trim().parse().map(FieldValue::I32).map_err(|_| parse_err(attribute)),
        FieldType::I64 => v.trim().parse().map(FieldValue::I64).map_err(|_| parse_err(attribute)),
        FieldType::F32 => v.trim().parse().map(FieldValue::F32).map_err(|_| parse_err(attribute)),
        FieldType::F64 => v.trim().parse().map(FieldValue::F64).map_err(|_| parse_err(attribute)),
        FieldType::Decimal => v
            .trim()
            .parse()
            .map(FieldValue::Decimal)
            .map_err(|_| parse_err(attribute)),
        FieldType::Date => v.trim().parse().map(FieldValue::Date).map_err(|_| parse_err(attribute)),
        FieldType::Time => v.trim().parse().map(FieldValue::Time).map_err(|_| parse_err(attribute)),
        FieldType::DateTime => parse_datetime(v.trim())
            .map(FieldValue::DateTime)
            .ok_or_else(|| parse_err(attribute)),
        FieldType::Uuid => Uuid::parse_str(v.trim())
            .map(FieldValue::Uuid)
            .map_err(|_| parse_err(attribute)),
        FieldType::Bytes => Ok(FieldValue::Bytes(v.into_bytes())),
        FieldType::Enum => match attribute.enum_mode {
            // Some drivers report ordinal-stored enums as text.
            Some(EnumMode::Ordinal) => match v.trim().parse::<i64>() {
                Ok(ordinal) => enum_from_ordinal(attribute, ordinal, column_type, engine),
                Err(_) => enum_from_name(attribute, &v, column_type)
            },
            _ => enum_from_name(attribute, &v, column_type)
        },
        _ => Err(parse_err(attribute))
    }
}

/// Timestamps arrive as either `YYYY-MM-DD HH:MM:SS[.fff]` or the
/// `T`-separated ISO form depending on the driver.
fn parse_datetime(v: &str) -> Option<chrono::NaiveDateTime> {
    v.parse()
        .ok()
        .or_else(|| chrono::NaiveDateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S%.f").ok())
}

fn from_bytes(attribute: &AttributeDescriptor, v: Vec<u8>, column_type: &str) -> Result<FieldValue> {
    let render = || format!("<{} bytes>", v.len());
    match attribute.field_type {
        FieldType::Bytes => Ok(FieldValue::Bytes(v)),
        FieldType::Text => String::from_utf8(v.clone())
            .map(FieldValue::Text)
            .map_err(|_| no_rule(attribute, column_type, render())),
        FieldType::I8 => Ok(FieldValue::I8(int_from_be_bytes(&v) as i8)),
        FieldType::I16 => Ok(FieldValue::I16(int_from_be_bytes(&v) as i16)),
        FieldType::I32 => Ok(FieldValue::I32(int_from_be_bytes(&v) as i32)),
        FieldType::I64 => Ok(FieldValue::I64(int_from_be_bytes(&v))),
        FieldType::Uuid => Uuid::from_slice(&v)
            .map(FieldValue::Uuid)
            .map_err(|_| no_rule(attribute, column_type, render())),
        _ => Err(no_rule(attribute, column_type, render()))
    }
}

/// Big-endian two's complement reinterpretation of a byte sequence,
/// sign-extended from the leading byte; only the trailing eight bytes are
/// significant.
fn int_from_be_bytes(bytes: &[u8]) -> i64 {
    let mut out: i64 = if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        -1
    } else {
        0
    };
    for &b in bytes.iter().rev().take(8).collect::<Vec<_>>().into_iter().rev() {
        out = (out << 8) | i64::from(b);
    }
    out
}

fn from_date(
    attribute: &AttributeDescriptor,
    v: chrono::NaiveDate,
    column_type: &str
) -> Result<FieldValue> {
    match attribute.field_type {
        FieldType::Date => Ok(FieldValue::Date(v)),
        FieldType::DateTime => Ok(FieldValue::DateTime(v.and_time(NaiveTime::MIN))),
        FieldType::Text => Ok(FieldValue::Text(v.to_string())),
        _ => Err(no_rule(attribute, column_type, v.to_string()))
    }
}

fn from_time(
    attribute: &AttributeDescriptor,
    v: chrono::NaiveTime,
    column_type: &str
) -> Result<FieldValue> {
    match attribute.field_type {
        FieldType::Time => Ok(FieldValue::Time(v)),
        FieldType::Text => Ok(FieldValue::Text(v.to_string())),
        _ => Err(no_rule(attribute, column_type, v.to_string()))
    }
}

fn from_timestamp(
    attribute: &AttributeDescriptor,
    v: chrono::NaiveDateTime,
    column_type: &str
) -> Result<FieldValue> {
    match attribute.field_type {
        FieldType::DateTime => Ok(FieldValue::DateTime(v)),
        FieldType::Date => Ok(FieldValue::Date(v.date())),
        FieldType::Time => Ok(FieldValue::Time(v.time())),
        FieldType::Text => Ok(FieldValue::Text(v.to_string())),
        FieldType::I64 => Ok(FieldValue::I64(v.and_utc().timestamp_millis())),
        _ => Err(no_rule(attribute, column_type, v.to_string()))
    }
}

fn from_uuid(attribute: &AttributeDescriptor, v: Uuid, column_type: &str) -> Result<FieldValue> {
    match attribute.field_type {
        FieldType::Uuid => Ok(FieldValue::Uuid(v)),
        FieldType::Text => Ok(FieldValue::Text(v.to_string())),
        FieldType::Bytes => Ok(FieldValue::Bytes(v.as_bytes().to_vec())),
        _ => Err(no_rule(attribute, column_type, v.to_string()))
    }
}

fn enum_from_ordinal(
    attribute: &AttributeDescriptor,
    raw: i64,
    column_type: &str,
    engine: Engine
) -> Result<FieldValue> {
    let names = attribute
        .enum_names
        .ok_or_else(|| RowmapError::Access(format!(
            "field `{}` has no enum constant table",
            attribute.qualified_field()
        )))?;
    // ENUM storage is 1-based under MySQL.
    let offset = i64::from(engine == Engine::MySql);
    let index = raw - offset;
    if index < 0 || index as usize >= names.len() {
        return Err(RowmapError::coercion(
            attribute.qualified_field(),
            column_type,
            attribute.field_type.name(),
            format!(
                "ordinal {raw} out of range for {} constants (engine {engine:?})",
                names.len()
            )
        ));
    }
    Ok(FieldValue::Enum {
        ordinal: index as usize,
        name:    names[index as usize]
    })
}

fn enum_from_name(
    attribute: &AttributeDescriptor,
    raw: &str,
    column_type: &str
) -> Result<FieldValue> {
    let names = attribute
        .enum_names
        .ok_or_else(|| RowmapError::Access(format!(
            "field `{}` has no enum constant table",
            attribute.qualified_field()
        )))?;
    names
        .iter()
        .position(|n| *n == raw)
        .map(|ordinal| FieldValue::Enum {
            ordinal,
            name: names[ordinal]
        })
        .ok_or_else(|| {
            RowmapError::coercion(
                attribute.qualified_field(),
                column_type,
                attribute.field_type.name(),
                format!("'{raw}' is not a constant of this enum")
            )
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        descriptor::{FieldSpec, TemporalKind},
        value::CharStream
    };

    fn attr(field_type: FieldType) -> AttributeDescriptor {
        let mut spec = FieldSpec::new("subject", "T", field_type, false);
        if field_type == FieldType::Enum {
            spec.enum_mode = Some(EnumMode::Ordinal);
            spec.enum_names = Some(&["Red", "Green", "Blue"]);
        }
        AttributeDescriptor::from_spec(0, "Probe", "probes", &spec)
    }

    #[test]
    fn nonzero_integer_is_true() {
        let a = attr(FieldType::Bool);
        assert_eq!(
            from_database(&a, SqlValue::Int(3), "INTEGER", Engine::Generic).unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            from_database(&a, SqlValue::Int(0), "INTEGER", Engine::Generic).unwrap(),
            FieldValue::Bool(false)
        );
    }

    #[test]
    fn epoch_long_becomes_timestamp_with_exact_millis() {
        let a = attr(FieldType::DateTime);
        let millis = 1_700_000_000_123_i64;
        let got = from_database(&a, SqlValue::BigInt(millis), "TIMESTAMP", Engine::Generic).unwrap();
        let FieldValue::DateTime(dt) = got else {
            panic!("expected DateTime, got {got:?}");
        };
        assert_eq!(dt.and_utc().timestamp_millis(), millis);
    }

    #[test]
    fn decimal_truncates_toward_zero() {
        let a = attr(FieldType::I32);
        let pos = Decimal::new(995, 2); // 9.95
        assert_eq!(
            from_database(&a, SqlValue::Decimal(pos), "DECIMAL", Engine::Generic).unwrap(),
            FieldValue::I32(9)
        );
        let neg = Decimal::new(-995, 2); // -9.95
        assert_eq!(
            from_database(&a, SqlValue::Decimal(neg), "DECIMAL", Engine::Generic).unwrap(),
            FieldValue::I32(-9)
        );
    }

    #[test]
    fn enum_ordinal_is_one_based_under_mysql() {
        let a = attr(FieldType::Enum);
        assert_eq!(
            from_database(&a, SqlValue::Int(1), "ENUM", Engine::MySql).unwrap(),
            FieldValue::Enum {
                ordinal: 0,
                name:    "Red"
            }
        );
        assert_eq!(
            from_database(&a, SqlValue::Int(0), "INTEGER", Engine::Generic).unwrap(),
            FieldValue::Enum {
                ordinal: 0,
                name:    "Red"
            }
        );
    }

    #[test]
    fn enum_ordinal_out_of_range_is_descriptive() {
        let a = attr(FieldType::Enum);
        let err = from_database(&a, SqlValue::Int(7), "INTEGER", Engine::Generic).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ordinal 7"), "{msg}");
        assert!(msg.contains("Probe.subject"), "{msg}");
    }

    #[test]
    fn enum_by_name_from_text() {
        let mut spec = FieldSpec::new("subject", "T", FieldType::Enum, false);
        spec.enum_mode = Some(EnumMode::Name);
        spec.enum_names = Some(&["Red", "Green", "Blue"]);
        let a = AttributeDescriptor::from_spec(0, "Probe", "probes", &spec);
        assert_eq!(
            from_database(&a, SqlValue::Text("Green".into()), "VARCHAR", Engine::Generic).unwrap(),
            FieldValue::Enum {
                ordinal: 1,
                name:    "Green"
            }
        );
        assert!(
            from_database(&a, SqlValue::Text("Pink".into()), "VARCHAR", Engine::Generic).is_err()
        );
    }

    #[test]
    fn bytes_become_text_and_integers() {
        let a = attr(FieldType::Text);
        assert_eq!(
            from_database(&a, SqlValue::Bytes(b"abc".to_vec()), "BLOB", Engine::Generic).unwrap(),
            FieldValue::Text("abc".into())
        );

        let a = attr(FieldType::I64);
        assert_eq!(
            from_database(&a, SqlValue::Bytes(vec![0x01, 0x00]), "BLOB", Engine::Generic).unwrap(),
            FieldValue::I64(256)
        );
        // Sign extension from the leading byte.
        assert_eq!(
            from_database(&a, SqlValue::Bytes(vec![0xFF]), "BLOB", Engine::Generic).unwrap(),
            FieldValue::I64(-1)
        );
    }

    #[test]
    fn clob_drains_to_string() {
        let a = attr(FieldType::Text);
        let stream = CharStream::new(std::io::Cursor::new(b"long text".to_vec()));
        assert_eq!(
            from_database(&a, SqlValue::Clob(stream), "CLOB", Engine::Generic).unwrap(),
            FieldValue::Text("long text".into())
        );
    }

    #[test]
    fn year_column_ignores_raw_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let a = attr(FieldType::Text);
        assert_eq!(
            from_database(&a, SqlValue::Date(date), "YEAR", Engine::MySql).unwrap(),
            FieldValue::Text("2024".into())
        );

        let a = attr(FieldType::I32);
        assert_eq!(
            from_database(&a, SqlValue::SmallInt(2024), "YEAR", Engine::MySql).unwrap(),
            FieldValue::I32(2024)
        );
    }

    #[test]
    fn uuid_unwraps_to_string_field() {
        let id = Uuid::new_v4();
        let a = attr(FieldType::Text);
        assert_eq!(
            from_database(&a, SqlValue::Uuid(id), "UUID", Engine::Postgres).unwrap(),
            FieldValue::Text(id.to_string())
        );
    }

    #[test]
    fn converter_takes_precedence_except_sqlite_integral_temporal() {
        let mut spec = FieldSpec::new("at", "NaiveDateTime", FieldType::DateTime, false);
        spec.temporal = Some(TemporalKind::Timestamp);
        spec.converter = Some(&crate::convert::TimestampAsEpochMillis);
        let a = AttributeDescriptor::from_spec(0, "Probe", "probes", &spec);

        // Generic engine: the converter runs.
        let got = from_database(&a, SqlValue::BigInt(86_400_000), "BIGINT", Engine::Generic).unwrap();
        assert!(matches!(got, FieldValue::DateTime(_)));

        // SQLite integral raw for a temporal field: built-in epoch path.
        let got = from_database(&a, SqlValue::BigInt(86_400_000), "TIMESTAMP", Engine::Sqlite).unwrap();
        let FieldValue::DateTime(dt) = got else {
            panic!("expected DateTime");
        };
        assert_eq!(dt.and_utc().timestamp_millis(), 86_400_000);
    }

    #[test]
    fn unrecognized_pair_is_an_error() {
        let a = attr(FieldType::Uuid);
        let err = from_database(&a, SqlValue::Double(1.5), "DOUBLE", Engine::Generic).unwrap_err();
        assert!(matches!(err, RowmapError::Coercion { .. }));
    }

    #[test]
    fn write_path_shifts_mysql_ordinals() {
        let a = attr(FieldType::Enum);
        let value = FieldValue::Enum {
            ordinal: 0,
            name:    "Red"
        };
        assert_eq!(
            to_database(&a, value.clone(), Engine::MySql).unwrap(),
            SqlValue::BigInt(1)
        );
        assert_eq!(
            to_database(&a, value, Engine::Generic).unwrap(),
            SqlValue::BigInt(0)
        );
    }

    #[test]
    fn text_parses_temporals_and_numbers() {
        let a = attr(FieldType::DateTime);
        let got = from_database(
            &a,
            SqlValue::Text("2024-06-01 12:30:45".into()),
            "TEXT",
            Engine::Sqlite
        )
        .unwrap();
        assert!(matches!(got, FieldValue::DateTime(_)));

        let a = attr(FieldType::I32);
        assert_eq!(
            from_database(&a, SqlValue::Text(" 42 ".into()), "TEXT", Engine::Sqlite).unwrap(),
            FieldValue::I32(42)
        );
    }
}
