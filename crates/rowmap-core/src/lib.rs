// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core runtime for rowmap.
//!
//! This crate holds everything the `Entity` derive generates code against:
//! the descriptor model, the value-coercion matrix, the result-set
//! materializer, and the statement binder. It can also be used standalone
//! with hand-written [`EntitySpec`](descriptor::EntitySpec) metadata.
//!
//! # Overview
//!
//! - [`descriptor`] — per-field and per-entity mapping metadata, built once
//!   per type and cached for the process lifetime
//! - [`coerce`] — raw driver value to declared field type, both directions
//! - [`materialize`] — rows (possibly multi-table joins) into entity graphs
//! - [`bind`] — positional statement parameter binding
//! - [`client`] — the injected result-set/statement abstraction, with
//!   in-memory implementations for tests and fixtures
//! - [`prelude`] — convenient re-exports
//!
//! # Usage
//!
//! Most users should use `rowmap-derive` directly, which re-exports this
//! crate. A typical read path:
//!
//! ```rust,ignore
//! use rowmap_core::prelude::*;
//!
//! let materializer = Materializer::new(Engine::MySql);
//! let users: Vec<User> = materializer.materialize(&mut result_set)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bind;
pub mod client;
pub mod coerce;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod materialize;
pub mod prelude;
pub mod record;
pub mod value;

pub use error::{Result, RowmapError};
