// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types for descriptor building, coercion, materialization, and
//! binding.
//!
//! All failures surface as [`RowmapError`] with a human-readable message and,
//! where applicable, a source chain. Lookup misses (unmapped tables or
//! columns) are *not* errors; they are `None` returns so that ad-hoc
//! projection queries selecting more columns than the target model declares
//! keep working.

use thiserror::Error;

/// Unified error type for all rowmap operations.
#[derive(Debug, Error)]
pub enum RowmapError {
    /// No coercion rule maps the raw driver value onto the target field
    /// type, or an applicable rule rejected the value (e.g. an enum ordinal
    /// out of range).
    #[error(
        "cannot coerce value {value} (column type {column_type}) into field `{attribute}` of type {field_type}"
    )]
    Coercion {
        /// Field the value was destined for, as `Entity.field`.
        attribute:   String,
        /// Driver-reported SQL type name of the source column.
        column_type: String,
        /// Target field type name.
        field_type:  &'static str,
        /// Rendering of the offending raw value.
        value:       String
    },

    /// A user-supplied [`Convert`](crate::convert::Convert) implementation
    /// rejected the value.
    #[error("converter failed for field `{attribute}`: {message}")]
    Conversion {
        /// Field the converter is registered on.
        attribute: String,
        /// Converter-provided failure description.
        message:   String
    },

    /// Assignment or downcast failure while populating a record. These are
    /// programming errors (a link pointing at the wrong entity type, a
    /// hand-written spec out of sync with the struct), never data errors.
    #[error("record access error: {0}")]
    Access(String),

    /// The supplied positional values do not match the statement's declared
    /// parameter count.
    #[error("{supplied} values supplied for a statement with {expected} parameters")]
    Binding {
        /// Number of values handed to the binder.
        supplied: usize,
        /// Number of parameters the statement declares.
        expected: usize
    },

    /// The underlying client failed while advancing the cursor or reading a
    /// column.
    #[error("result set error: {0}")]
    ResultSet(String),

    /// Draining a large-object stream failed.
    #[error("large object stream error")]
    LargeObject(#[from] std::io::Error)
}

impl RowmapError {
    /// Build a [`RowmapError::Coercion`] from its parts.
    pub fn coercion(
        attribute: impl Into<String>,
        column_type: impl Into<String>,
        field_type: &'static str,
        value: impl Into<String>
    ) -> Self {
        Self::Coercion {
            attribute:   attribute.into(),
            column_type: column_type.into(),
            field_type,
            value:       value.into()
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RowmapError>;
