// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Row-to-entity materialization.
//!
//! [`Materializer`] walks a [`ResultSet`] and produces one populated root
//! entity per row. Joined tables in the same row become child records
//! attached through the root's relationship links.
//!
//! # Per-row algorithm
//!
//! Columns are visited in **descending index order**. Each column resolves
//! to an owning table (driver-reported, falling back to the root table when
//! the driver reports none), then to an attribute of that table's
//! descriptor. Unmapped tables and unmapped columns are skipped, never
//! errors — a query is free to select more than the mapping knows about.
//!
//! Each row keeps a scope of one record per table. The root record always
//! exists; a joined record is created lazily on its first non-NULL column,
//! so a left-joined row whose child columns are all NULL yields no child
//! and the parent's link stays unset. Parent-child links are discovered per
//! column, deduplicated, and attached once at end of row.
//!
//! Rows are never merged: a fan-out join that repeats the same root key
//! produces one root instance per row, each holding its own child.

use std::collections::HashMap;

use tracing::trace;

use crate::{
    client::ResultSet,
    coerce,
    descriptor::{EntityDescriptor, registry},
    error::{Result, RowmapError},
    record::{Entity, Record},
    value::Engine
};

/// One discovered parent-child connection within a row.
struct PendingLink {
    parent: String,
    child:  String
}

/// Materializes result-set rows into entity records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Materializer {
    engine: Engine
}

impl Materializer {
    /// A materializer applying the given engine's coercion quirks.
    #[must_use]
    pub const fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Materialize every remaining row into instances of `E`.
    pub fn materialize<E: Entity>(&self, results: &mut dyn ResultSet) -> Result<Vec<E>> {
        let records = self.materialize_dyn(E::descriptor(), results)?;
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            out.push(Self::downcast(record)?);
        }
        Ok(out)
    }

    /// Populate `target` from the **current** row only. The cursor must
    /// already stand on a row. Columns whose name matches an entry of
    /// `ignored` (case-insensitively) are skipped.
    pub fn materialize_row<E: Entity>(
        &self,
        results: &mut dyn ResultSet,
        target: E,
        ignored: &[&str]
    ) -> Result<E> {
        let record = self.row_into(E::descriptor(), results, Box::new(target), ignored)?;
        Self::downcast(record)
    }

    fn downcast<E: Entity>(record: Box<dyn Record>) -> Result<E> {
        record
            .into_any()
            .downcast::<E>()
            .map(|entity| *entity)
            .map_err(|_| {
                RowmapError::Access("materialized record is not the requested entity type".into())
            })
    }

    /// Materialize every remaining row against an explicit root descriptor.
    pub fn materialize_dyn(
        &self,
        root: &'static EntityDescriptor,
        results: &mut dyn ResultSet
    ) -> Result<Vec<Box<dyn Record>>> {
        let mut out = Vec::new();
        while results.advance()? {
            out.push(self.row_into(root, results, root.new_record(), &[])?);
        }
        trace!(
            entity = root.entity,
            rows = out.len(),
            "result set materialized"
        );
        Ok(out)
    }

    /// Materialize the current row onto `seed` as the root record.
    fn row_into(
        &self,
        root: &'static EntityDescriptor,
        results: &mut dyn ResultSet,
        seed: Box<dyn Record>,
        ignored: &[&str]
    ) -> Result<Box<dyn Record>> {
        let root_key = root.table.undelimited.to_uppercase();
        let mut scope: HashMap<String, Box<dyn Record>> = HashMap::new();
        scope.insert(root_key.clone(), seed);
        let mut pending: Vec<PendingLink> = Vec::new();

        for index in (0..results.column_count()).rev() {
            let reported = results.table_name(index)?;
            let table = if reported.is_empty() {
                root.table.undelimited.clone()
            } else {
                reported.to_string()
            };
            let Some(descriptor) = Self::descriptor_for(root, &table) else {
                continue;
            };

            let column = results.column_name(index)?.to_string();
            if ignored.iter().any(|skip| skip.eq_ignore_ascii_case(&column)) {
                continue;
            }
            let Some(attribute) = descriptor.scalar_attribute(&column) else {
                continue;
            };

            let column_type = results.column_type_name(index)?.to_string();
            let raw = results.value(index)?;
            let value = coerce::from_database(attribute, raw, &column_type, self.engine)?;

            let key = descriptor.table.undelimited.to_uppercase();
            if key != root_key {
                Self::note_link(root, &scope, &mut pending, &root_key, &key);
            }

            if value.is_null() {
                if attribute.nullable {
                    if let Some(record) = scope.get_mut(&key) {
                        record.set(attribute, value)?;
                    }
                }
                // A NULL never creates a joined record and leaves a
                // non-nullable field at its default.
                continue;
            }

            let record = scope
                .entry(key)
                .or_insert_with(|| descriptor.new_record());
            record.set(attribute, value)?;
        }

        Self::attach_pending(root, &mut scope, pending)?;

        scope.remove(&root_key).ok_or_else(|| {
            RowmapError::ResultSet("root record missing after row materialization".into())
        })
    }

    /// Resolve a driver-reported table to a descriptor: the root itself,
    /// the global registry, or the root's transitive link graph.
    fn descriptor_for(
        root: &'static EntityDescriptor,
        table: &str
    ) -> Option<&'static EntityDescriptor> {
        if table.eq_ignore_ascii_case(&root.table.undelimited) {
            return Some(root);
        }
        registry::lookup(table).or_else(|| root.joined_descriptor(table))
    }

    /// Record the parent-child connection for a joined table, searching the
    /// root first and then every table already seen this row. Duplicate
    /// discoveries within a row collapse to one attachment.
    fn note_link(
        root: &'static EntityDescriptor,
        scope: &HashMap<String, Box<dyn Record>>,
        pending: &mut Vec<PendingLink>,
        root_key: &str,
        child_key: &str
    ) {
        if pending.iter().any(|p| p.child == child_key) {
            return;
        }
        let parent_key = if root.link_for_table(child_key).is_some() {
            Some(root_key.to_string())
        } else {
            scope
                .keys()
                .filter(|key| key.as_str() != child_key)
                .find(|key| {
                    Self::descriptor_for(root, key)
                        .is_some_and(|d| d.link_for_table(child_key).is_some())
                })
                .cloned()
        };
        if let Some(parent) = parent_key {
            pending.push(PendingLink {
                parent,
                child: child_key.to_string()
            });
        }
    }

    /// Attach discovered children to their parents, deepest first so a
    /// mid-level record receives its own children before it moves into its
    /// parent.
    fn attach_pending(
        root: &'static EntityDescriptor,
        scope: &mut HashMap<String, Box<dyn Record>>,
        mut pending: Vec<PendingLink>
    ) -> Result<()> {
        while !pending.is_empty() {
            let position = pending
                .iter()
                .position(|candidate| !pending.iter().any(|p| p.parent == candidate.child))
                .ok_or_else(|| {
                    RowmapError::ResultSet("cyclic parent-child links within one row".into())
                })?;
            let entry = pending.swap_remove(position);

            // All-NULL children were never created; drop the connection.
            let Some(child) = scope.remove(&entry.child) else {
                continue;
            };
            let Some(parent) = scope.get_mut(&entry.parent) else {
                continue;
            };
            let parent_desc = Self::descriptor_for(root, &entry.parent).ok_or_else(|| {
                RowmapError::ResultSet(format!("no descriptor for table {}", entry.parent))
            })?;
            let link = parent_desc.link_for_table(&entry.child).ok_or_else(|| {
                RowmapError::ResultSet(format!(
                    "no link from {} to {}",
                    entry.parent, entry.child
                ))
            })?;
            parent.attach(link, child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{any::Any, sync::OnceLock};

    use super::*;
    use crate::{
        client::{MemoryColumn, MemoryResultSet},
        descriptor::{
            AttributeDescriptor, EntitySpec, FieldSpec, LinkDescriptor, Relation, registry
        },
        error::Result,
        value::{FieldType, FieldValue, FromFieldValue, SqlValue}
    };

    #[derive(Debug, Default, PartialEq)]
    struct Wheel {
        id:   i64,
        size: i32
    }

    impl Wheel {
        fn build_spec() -> EntitySpec {
            EntitySpec {
                entity: "Wheel",
                table:  "mz_wheels",
                fields: vec![
                    FieldSpec {
                        id: true,
                        ..FieldSpec::new("id", "i64", FieldType::I64, false)
                    },
                    FieldSpec::new("size", "i32", FieldType::I32, false),
                ]
            }
        }

        fn descriptor() -> &'static EntityDescriptor {
            static CELL: OnceLock<EntityDescriptor> = OnceLock::new();
            let descriptor = CELL.get_or_init(|| {
                EntityDescriptor::build(Self::build_spec(), || Box::new(Wheel::default()))
            });
            registry::register(descriptor);
            descriptor
        }
    }

    impl Record for Wheel {
        fn descriptor_dyn(&self) -> &'static EntityDescriptor {
            Self::descriptor()
        }

        fn set(&mut self, attribute: &AttributeDescriptor, value: FieldValue) -> Result<()> {
            match attribute.field {
                "id" if !value.is_null() => self.id = i64::from_field_value(value, "id")?,
                "size" if !value.is_null() => self.size = i32::from_field_value(value, "size")?,
                _ => {}
            }
            Ok(())
        }

        fn attach(&mut self, _link: &LinkDescriptor, _child: Box<dyn Record>) -> Result<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    impl Entity for Wheel {
        fn spec() -> EntitySpec {
            Self::build_spec()
        }

        fn descriptor() -> &'static EntityDescriptor {
            Self::descriptor()
        }
    }

    #[derive(Debug, Default)]
    struct Car {
        id:       i64,
        model:    Option<String>,
        wheel_id: i64,
        wheel:    Option<Wheel>
    }

    impl Car {
        fn build_spec() -> EntitySpec {
            EntitySpec {
                entity: "Car",
                table:  "mz_cars",
                fields: vec![
                    FieldSpec {
                        id: true,
                        ..FieldSpec::new("id", "i64", FieldType::I64, false)
                    },
                    FieldSpec::new("model", "Option<String>", FieldType::Text, true),
                    FieldSpec::new("wheel_id", "i64", FieldType::I64, false),
                    FieldSpec {
                        relation: Relation::ManyToOne,
                        referenced: Some("wheel_id"),
                        related: Some(Wheel::descriptor),
                        ..FieldSpec::new("wheel", "Option<Wheel>", FieldType::Entity, true)
                    },
                ]
            }
        }

        fn descriptor() -> &'static EntityDescriptor {
            static CELL: OnceLock<EntityDescriptor> = OnceLock::new();
            let descriptor = CELL.get_or_init(|| {
                EntityDescriptor::build(Self::build_spec(), || Box::new(Car::default()))
            });
            registry::register(descriptor);
            descriptor
        }
    }

    impl Record for Car {
        fn descriptor_dyn(&self) -> &'static EntityDescriptor {
            Self::descriptor()
        }

        fn set(&mut self, attribute: &AttributeDescriptor, value: FieldValue) -> Result<()> {
            match attribute.field {
                "id" if !value.is_null() => self.id = i64::from_field_value(value, "id")?,
                "model" => self.model = Option::from_field_value(value, "model")?,
                "wheel_id" if !value.is_null() => {
                    self.wheel_id = i64::from_field_value(value, "wheel_id")?;
                }
                _ => {}
            }
            Ok(())
        }

        fn attach(&mut self, link: &LinkDescriptor, child: Box<dyn Record>) -> Result<()> {
            if link.field == "wheel" {
                let wheel = child.into_any().downcast::<Wheel>().map_err(|_| {
                    RowmapError::Access("attached child is not a Wheel".into())
                })?;
                self.wheel = Some(*wheel);
            }
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    impl Entity for Car {
        fn spec() -> EntitySpec {
            Self::build_spec()
        }

        fn descriptor() -> &'static EntityDescriptor {
            Self::descriptor()
        }
    }

    fn join_columns() -> Vec<MemoryColumn> {
        vec![
            MemoryColumn::new("id", "mz_cars", "BIGINT"),
            MemoryColumn::new("model", "mz_cars", "VARCHAR"),
            MemoryColumn::new("wheel_id", "mz_cars", "BIGINT"),
            MemoryColumn::new("id", "mz_wheels", "BIGINT"),
            MemoryColumn::new("size", "mz_wheels", "INTEGER"),
        ]
    }

    #[test]
    fn joined_row_attaches_child() {
        let mut rs = MemoryResultSet::new(
            join_columns(),
            vec![vec![
                SqlValue::BigInt(1),
                SqlValue::Text("roadster".into()),
                SqlValue::BigInt(10),
                SqlValue::BigInt(10),
                SqlValue::Int(17),
            ]]
        );
        let cars = Materializer::default().materialize::<Car>(&mut rs).unwrap();
        assert_eq!(cars.len(), 1);
        let car = &cars[0];
        assert_eq!(car.id, 1);
        assert_eq!(car.model.as_deref(), Some("roadster"));
        assert_eq!(car.wheel_id, 10);
        assert_eq!(car.wheel, Some(Wheel { id: 10, size: 17 }));
    }

    #[test]
    fn all_null_child_is_not_created() {
        let mut rs = MemoryResultSet::new(
            join_columns(),
            vec![vec![
                SqlValue::BigInt(2),
                SqlValue::Null,
                SqlValue::Null,
                SqlValue::Null,
                SqlValue::Null,
            ]]
        );
        let cars = Materializer::default().materialize::<Car>(&mut rs).unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].id, 2);
        assert_eq!(cars[0].model, None);
        assert_eq!(cars[0].wheel, None);
    }

    #[test]
    fn fan_out_rows_are_never_merged() {
        let mut rs = MemoryResultSet::new(
            join_columns(),
            vec![
                vec![
                    SqlValue::BigInt(3),
                    SqlValue::Null,
                    SqlValue::BigInt(20),
                    SqlValue::BigInt(20),
                    SqlValue::Int(15),
                ],
                vec![
                    SqlValue::BigInt(3),
                    SqlValue::Null,
                    SqlValue::BigInt(21),
                    SqlValue::BigInt(21),
                    SqlValue::Int(16),
                ],
            ]
        );
        let cars = Materializer::default().materialize::<Car>(&mut rs).unwrap();
        assert_eq!(cars.len(), 2);
        assert_eq!(cars[0].id, 3);
        assert_eq!(cars[1].id, 3);
        assert_eq!(cars[0].wheel, Some(Wheel { id: 20, size: 15 }));
        assert_eq!(cars[1].wheel, Some(Wheel { id: 21, size: 16 }));
    }

    #[test]
    fn unmapped_tables_and_columns_are_tolerated() {
        let mut columns = join_columns();
        columns.push(MemoryColumn::new("score", "mz_audit", "INTEGER"));
        columns.push(MemoryColumn::new("not_mapped", "mz_cars", "VARCHAR"));
        let mut rs = MemoryResultSet::new(
            columns,
            vec![vec![
                SqlValue::BigInt(4),
                SqlValue::Null,
                SqlValue::BigInt(30),
                SqlValue::BigInt(30),
                SqlValue::Int(14),
                SqlValue::Int(99),
                SqlValue::Text("ignored".into()),
            ]]
        );
        let cars = Materializer::default().materialize::<Car>(&mut rs).unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].wheel, Some(Wheel { id: 30, size: 14 }));
    }

    #[test]
    fn materialize_row_populates_target_and_honors_ignores() {
        let mut rs = MemoryResultSet::new(
            vec![
                MemoryColumn::new("id", "mz_cars", "BIGINT"),
                MemoryColumn::new("model", "mz_cars", "VARCHAR"),
            ],
            vec![vec![SqlValue::BigInt(9), SqlValue::Text("estate".into())]]
        );
        assert!(rs.advance().unwrap());
        let car = Materializer::default()
            .materialize_row(&mut rs, Car::default(), &["MODEL"])
            .unwrap();
        assert_eq!(car.id, 9);
        assert_eq!(car.model, None);
    }

    #[test]
    fn blank_table_name_falls_back_to_root() {
        let mut rs = MemoryResultSet::new(
            vec![
                MemoryColumn::new("id", "", "BIGINT"),
                MemoryColumn::new("model", "", "VARCHAR"),
            ],
            vec![vec![SqlValue::BigInt(5), SqlValue::Text("coupe".into())]]
        );
        let cars = Materializer::default().materialize::<Car>(&mut rs).unwrap();
        assert_eq!(cars[0].id, 5);
        assert_eq!(cars[0].model.as_deref(), Some("coupe"));
    }
}
