// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # rowmap-derive
//!
//! One crate, all features. Re-exports:
//! - [`Entity`] and [`Enumerated`] derive macros from `rowmap-derive-impl`
//! - All types from `rowmap-core` ([`Materializer`](materialize::Materializer),
//!   [`EntityDescriptor`](descriptor::EntityDescriptor), the value and client
//!   abstractions)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rowmap_derive::{Entity, prelude::*};
//!
//! #[derive(Entity, Default)]
//! #[entity(table = "users")]
//! pub struct User {
//!     #[id]
//!     #[generated]
//!     pub id: i64,
//!     #[column(name = "user_name")]
//!     pub name: String,
//! }
//!
//! let users: Vec<User> = Materializer::default().materialize(&mut results)?;
//! ```

// Re-export derive macros
// Re-export all core types
pub use rowmap_core::*;
pub use rowmap_derive_impl::{Entity, Enumerated};
