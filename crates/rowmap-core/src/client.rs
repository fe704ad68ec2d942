// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Injected blocking database-client abstraction.
//!
//! The engine operates purely in-process over these traits; no wire format
//! or connection management is defined here. Adapters wrap a concrete
//! driver's statement and result-set handles; [`MemoryResultSet`] and
//! [`MemoryStatement`] back tests and offline fixtures.

use std::collections::VecDeque;

use crate::{
    error::{Result, RowmapError},
    value::SqlValue
};

/// SQL parameter type as reported by statement metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// BOOLEAN
    Boolean,
    /// TINYINT
    TinyInt,
    /// SMALLINT
    SmallInt,
    /// INTEGER
    Integer,
    /// BIGINT
    BigInt,
    /// REAL
    Float,
    /// DOUBLE PRECISION
    Double,
    /// DECIMAL / NUMERIC
    Decimal,
    /// CHAR / VARCHAR / TEXT
    Text,
    /// BLOB / BYTEA
    Bytes,
    /// DATE
    Date,
    /// TIME
    Time,
    /// TIMESTAMP
    Timestamp,
    /// UUID
    Uuid,
    /// CLOB
    Clob,
    /// Anything the driver reports that has no dedicated variant.
    Other
}

/// Cursor over a query result.
///
/// Column indexes are zero-based. [`ResultSet::value`] consumes the cell:
/// the engine reads each column of a row exactly once.
pub trait ResultSet {
    /// Advance to the next row; `false` at end of results.
    fn advance(&mut self) -> Result<bool>;

    /// Number of columns per row.
    fn column_count(&self) -> usize;

    /// Driver-reported column name.
    fn column_name(&self, index: usize) -> Result<&str>;

    /// Driver-reported owning table; empty for computed or aliased
    /// expressions.
    fn table_name(&self, index: usize) -> Result<&str>;

    /// Driver-reported SQL type name of the column.
    fn column_type_name(&self, index: usize) -> Result<&str>;

    /// Take the value at the column in the current row.
    fn value(&mut self, index: usize) -> Result<SqlValue>;
}

/// A prepared statement accepting positional parameters.
pub trait Statement {
    /// Number of declared parameters.
    fn parameter_count(&self) -> usize;

    /// Declared type of a parameter, from statement metadata.
    fn parameter_type(&self, index: usize) -> Result<SqlType>;

    /// Bind a value at the zero-based parameter index.
    fn bind(&mut self, index: usize, value: SqlValue) -> Result<()>;
}

/// Column metadata for [`MemoryResultSet`].
#[derive(Debug, Clone)]
pub struct MemoryColumn {
    /// Column name as a driver would report it.
    pub name: String,

    /// Owning table name; empty for computed expressions.
    pub table: String,

    /// SQL type name.
    pub type_name: String
}

impl MemoryColumn {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: &str, table: &str, type_name: &str) -> Self {
        Self {
            name:      name.to_string(),
            table:     table.to_string(),
            type_name: type_name.to_string()
        }
    }
}

/// In-memory [`ResultSet`] over prebuilt rows.
#[derive(Debug, Default)]
pub struct MemoryResultSet {
    columns: Vec<MemoryColumn>,
    rows:    VecDeque<Vec<SqlValue>>,
    current: Vec<Option<SqlValue>>
}

impl MemoryResultSet {
    /// Build a result set from column metadata and rows. Each row must have
    /// one value per column.
    #[must_use]
    pub fn new(columns: Vec<MemoryColumn>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter().collect(),
            current: Vec::new()
        }
    }
}

impl ResultSet for MemoryResultSet {
    fn advance(&mut self) -> Result<bool> {
        match self.rows.pop_front() {
            Some(row) => {
                self.current = row.into_iter().map(Some).collect();
                Ok(true)
            }
            None => {
                self.current.clear();
                Ok(false)
            }
        }
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, index: usize) -> Result<&str> {
        self.columns
            .get(index)
            .map(|c| c.name.as_str())
            .ok_or_else(|| RowmapError::ResultSet(format!("column index {index} out of range")))
    }

    fn table_name(&self, index: usize) -> Result<&str> {
        self.columns
            .get(index)
            .map(|c| c.table.as_str())
            .ok_or_else(|| RowmapError::ResultSet(format!("column index {index} out of range")))
    }

    fn column_type_name(&self, index: usize) -> Result<&str> {
        self.columns
            .get(index)
            .map(|c| c.type_name.as_str())
            .ok_or_else(|| RowmapError::ResultSet(format!("column index {index} out of range")))
    }

    fn value(&mut self, index: usize) -> Result<SqlValue> {
        self.current
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| {
                RowmapError::ResultSet(format!("no value at column index {index} in current row"))
            })
    }
}

/// In-memory [`Statement`] capturing bound values for inspection.
#[derive(Debug, Default)]
pub struct MemoryStatement {
    types: Vec<SqlType>,
    bound: Vec<Option<SqlValue>>
}

impl MemoryStatement {
    /// Build a statement declaring the given parameter types.
    #[must_use]
    pub fn new(types: Vec<SqlType>) -> Self {
        let bound = types.iter().map(|_| None).collect();
        Self { types, bound }
    }

    /// Values bound so far, `None` where nothing was bound.
    #[must_use]
    pub fn bound(&self) -> &[Option<SqlValue>] {
        &self.bound
    }
}

impl Statement for MemoryStatement {
    fn parameter_count(&self) -> usize {
        self.types.len()
    }

    fn parameter_type(&self, index: usize) -> Result<SqlType> {
        self.types
            .get(index)
            .copied()
            .ok_or_else(|| RowmapError::ResultSet(format!("parameter index {index} out of range")))
    }

    fn bind(&mut self, index: usize, value: SqlValue) -> Result<()> {
        let slot = self.bound.get_mut(index).ok_or_else(|| {
            RowmapError::ResultSet(format!("parameter index {index} out of range"))
        })?;
        *slot = Some(value);
        Ok(())
    }
}
