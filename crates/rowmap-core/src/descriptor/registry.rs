// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Process-wide table-name registry.
//!
//! Maps upper-cased table names to their entity descriptors so the
//! materializer can resolve which entity owns a driver-reported table. A
//! descriptor registers itself the first time
//! [`Entity::descriptor`](crate::record::Entity::descriptor) runs; entries
//! are never evicted.

use std::{
    collections::HashMap,
    sync::{LazyLock, PoisonError, RwLock}
};

use crate::descriptor::EntityDescriptor;

static REGISTRY: LazyLock<RwLock<HashMap<String, &'static EntityDescriptor>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Register a descriptor under its upper-cased table name. Idempotent; the
/// first registration for a table wins.
pub fn register(descriptor: &'static EntityDescriptor) {
    let key = descriptor.table.undelimited.to_uppercase();
    let mut map = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    map.entry(key).or_insert(descriptor);
}

/// Look up the descriptor owning a table name, case-insensitively.
#[must_use]
pub fn lookup(table: &str) -> Option<&'static EntityDescriptor> {
    let map = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    map.get(&table.trim_matches('"').to_uppercase()).copied()
}
