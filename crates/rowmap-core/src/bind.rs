// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Positional parameter binding.
//!
//! Binds ordered values into a prepared statement, consulting statement
//! metadata for each parameter's declared SQL type and applying the small
//! set of shape adjustments drivers require. Deliberately thin: anything
//! beyond a direct shape fix belongs in the coercion matrix.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use tracing::trace;

use crate::{
    client::{SqlType, Statement},
    error::{Result, RowmapError},
    value::SqlValue
};

/// Bind `values` positionally into `statement`.
///
/// Supplying fewer values than the statement declares parameters is an
/// error; supplying more is an error too — a mismatch either way means the
/// SQL and the argument list went out of sync.
pub fn bind_all(statement: &mut dyn Statement, values: Vec<SqlValue>) -> Result<()> {
    let expected = statement.parameter_count();
    if values.len() != expected {
        return Err(RowmapError::Binding {
            supplied: values.len(),
            expected
        });
    }
    for (index, value) in values.into_iter().enumerate() {
        let declared = statement.parameter_type(index)?;
        statement.bind(index, adjust(value, declared))?;
    }
    trace!(parameters = expected, "statement parameters bound");
    Ok(())
}

/// Driver-compatibility shape adjustments, keyed on the declared parameter
/// type.
fn adjust(value: SqlValue, declared: SqlType) -> SqlValue {
    match (value, declared) {
        // Engines without a boolean type declare SMALLINT.
        (SqlValue::Bool(v), SqlType::SmallInt) => SqlValue::SmallInt(i16::from(v)),
        // DATE parameters declared TIMESTAMP take midnight.
        (SqlValue::Date(v), SqlType::Timestamp) => {
            SqlValue::Timestamp(v.and_time(NaiveTime::MIN))
        }
        // Wide integer columns surfaced as DECIMAL.
        (SqlValue::BigInt(v), SqlType::Decimal) => SqlValue::Decimal(Decimal::from(v)),
        (value, _) => value
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::client::MemoryStatement;

    #[test]
    fn adjusts_shapes_to_declared_parameter_types() {
        let mut statement = MemoryStatement::new(vec![
            SqlType::SmallInt,
            SqlType::Timestamp,
            SqlType::Decimal,
            SqlType::Text,
        ]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        bind_all(
            &mut statement,
            vec![
                SqlValue::Bool(true),
                SqlValue::Date(date),
                SqlValue::BigInt(9000),
                SqlValue::Text("plain".into()),
            ]
        )
        .unwrap();

        assert_eq!(statement.bound()[0], Some(SqlValue::SmallInt(1)));
        assert_eq!(
            statement.bound()[1],
            Some(SqlValue::Timestamp(date.and_time(NaiveTime::MIN)))
        );
        assert_eq!(
            statement.bound()[2],
            Some(SqlValue::Decimal(Decimal::from(9000)))
        );
        assert_eq!(statement.bound()[3], Some(SqlValue::Text("plain".into())));
    }

    #[test]
    fn too_few_values_is_an_error() {
        let mut statement = MemoryStatement::new(vec![SqlType::Integer, SqlType::Integer]);
        let err = bind_all(&mut statement, vec![SqlValue::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            RowmapError::Binding {
                supplied: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn too_many_values_is_an_error() {
        let mut statement = MemoryStatement::new(vec![SqlType::Integer]);
        let err =
            bind_all(&mut statement, vec![SqlValue::Int(1), SqlValue::Int(2)]).unwrap_err();
        assert!(matches!(err, RowmapError::Binding { .. }));
    }
}
