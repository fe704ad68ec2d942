// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rowmap_core::prelude::*;
//! ```

pub use crate::{
    bind::bind_all,
    client::{MemoryColumn, MemoryResultSet, MemoryStatement, ResultSet, SqlType, Statement},
    coerce,
    convert::Convert,
    descriptor::{
        AttributeDescriptor, EntityDescriptor, EntitySpec, EnumMode, FieldSpec, LinkDescriptor,
        LinkKind, Relation, TemporalKind, registry
    },
    error::{Result, RowmapError},
    materialize::Materializer,
    record::{Entity, Enumerated, Record},
    value::{Engine, FieldType, FieldValue, FromFieldValue, SqlValue}
};
