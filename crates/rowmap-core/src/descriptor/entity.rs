// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-entity descriptor aggregation.
//!
//! [`EntityDescriptor::build`] consumes the derive-emitted
//! [`EntitySpec`](crate::descriptor::EntitySpec) and produces the aggregate
//! the SQL builders and the materializer work from. The build is phase 1 of
//! the two-phase scheme: it resolves every directly-owned attribute and
//! registers the descriptor, but leaves relationship targets as thunks.
//! Phase 2 happens on demand — [`LinkDescriptor::target`] resolves the
//! related descriptor through its own `OnceLock` the first time a joined
//! table must be understood. Resolving a target never touches that target's
//! own links, so mutually-referencing entities terminate.

use std::{collections::HashMap, sync::OnceLock};

use tracing::debug;

use crate::{
    descriptor::{
        attribute::AttributeDescriptor,
        registry,
        spec::{EntitySpec, FieldSpec, Relation}
    },
    record::Record,
    value::FieldType
};

/// Delimited and undelimited forms of a table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    /// Quote-stripped form used for registry keys and comparisons.
    pub undelimited: String,

    /// Form as emitted into SQL, quotes retained when delimited.
    pub delimited: String
}

impl TableName {
    /// Parse a raw declared table name, stripping double-quote delimiters
    /// for the undelimited form.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let is_delimited = raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"');
        let inner = if is_delimited {
            &raw[1..raw.len() - 1]
        } else {
            raw
        };
        Self {
            undelimited: inner.to_string(),
            delimited:   raw.to_string()
        }
    }
}

/// How a relationship field receives its child during materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// One-to-one / many-to-one: the child is assigned onto the field.
    ToOne,
    /// Inverse (or collection-valued) one-to-many: the child is appended to
    /// the field's collection.
    Collection
}

/// A relationship field usable for parent-child linking.
///
/// Covers both to-one holders and one-to-many collections, including the
/// inverse side that is excluded from every SQL column array.
pub struct LinkDescriptor {
    /// Field identifier on the owning entity.
    pub field: &'static str,

    /// Attachment semantics.
    pub kind: LinkKind,

    related: fn() -> &'static EntityDescriptor,
    target:  OnceLock<&'static EntityDescriptor>
}

impl LinkDescriptor {
    /// Descriptor of the link's target entity (phase-2 resolution, cached).
    #[must_use]
    pub fn target(&self) -> &'static EntityDescriptor {
        self.target.get_or_init(self.related)
    }
}

impl std::fmt::Debug for LinkDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkDescriptor")
            .field("field", &self.field)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Fully built, immutable metadata for one entity type.
///
/// Obtained through [`Entity::descriptor`](crate::record::Entity::descriptor)
/// — never constructed per call. Concurrent first accesses build exactly
/// once; every caller sees the identical `&'static` instance.
pub struct EntityDescriptor {
    /// Entity type name.
    pub entity: &'static str,

    /// Resolved table name.
    pub table: TableName,

    attributes: Vec<AttributeDescriptor>,
    by_column:  HashMap<String, Vec<usize>>,
    by_field:   HashMap<&'static str, usize>,
    ids:        Vec<usize>,
    insertable: Vec<usize>,
    updatable:  Vec<usize>,
    links:      Vec<LinkDescriptor>,

    columns:                Vec<String>,
    id_columns:             Vec<String>,
    non_id_columns:         Vec<String>,
    case_sensitive_columns: Vec<String>,
    delimited_columns:      Vec<String>,
    column_tables:          Vec<String>,

    new_record: fn() -> Box<dyn Record>
}

impl EntityDescriptor {
    /// Build a descriptor from its compile-time record.
    ///
    /// # Panics
    ///
    /// Panics when the spec violates an invariant the derive normally
    /// enforces: a generated id alongside other id fields, or a collection
    /// relationship without a related-descriptor thunk. Such a spec is a
    /// programming error in hand-written metadata, unrecoverable at runtime.
    #[must_use]
    pub fn build(spec: EntitySpec, new_record: fn() -> Box<dyn Record>) -> Self {
        let table = TableName::parse(spec.table);
        let entity = spec.entity;

        let mut attributes = Vec::new();
        let mut by_column: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_field = HashMap::new();
        let mut ids = Vec::new();
        let mut links = Vec::new();

        for field in &spec.fields {
            if field.transient {
                continue;
            }
            if let Some(link) = Self::link_from(field, entity) {
                links.push(link);
            }
            if field.relation == Relation::OneToMany {
                // Collection fields have no scalar column of their own; the
                // inverse side additionally never appears in generated SQL.
                continue;
            }

            let index = attributes.len();
            let attr =
                AttributeDescriptor::from_spec(index, entity, &table.undelimited, field);
            by_column
                .entry(attr.column.lookup.clone())
                .or_default()
                .push(index);
            by_field.insert(attr.field, index);
            if attr.is_id {
                ids.push(index);
            }
            attributes.push(attr);
        }

        let generated = ids
            .iter()
            .filter(|&&i| attributes[i].is_generated)
            .count();
        assert!(
            generated <= 1,
            "entity {entity}: more than one generated id field"
        );
        assert!(
            generated == 0 || ids.len() == 1,
            "entity {entity}: a generated id cannot be combined with a composite key"
        );

        let insertable = Self::dedup_by_column(&attributes, AttributeDescriptor::is_insertable);
        let updatable = Self::dedup_by_column(&attributes, AttributeDescriptor::is_updatable);

        let selectable = Self::dedup_by_column(&attributes, |_| true);
        let columns = selectable
            .iter()
            .map(|&i| attributes[i].column.delimited.clone())
            .collect();
        let id_columns = ids
            .iter()
            .map(|&i| attributes[i].column.delimited.clone())
            .collect();
        let non_id_columns = selectable
            .iter()
            .filter(|&&i| !attributes[i].is_id)
            .map(|&i| attributes[i].column.delimited.clone())
            .collect();
        let case_sensitive_columns = selectable
            .iter()
            .map(|&i| attributes[i].column.case_sensitive.clone())
            .collect();
        let delimited_columns = selectable
            .iter()
            .map(|&i| attributes[i].column.delimited.clone())
            .collect();
        let column_tables = selectable
            .iter()
            .map(|&i| attributes[i].table.clone())
            .collect();

        debug!(
            entity,
            table = %table.undelimited,
            attributes = attributes.len(),
            ids = ids.len(),
            links = links.len(),
            "entity descriptor built"
        );

        Self {
            entity,
            table,
            attributes,
            by_column,
            by_field,
            ids,
            insertable,
            updatable,
            links,
            columns,
            id_columns,
            non_id_columns,
            case_sensitive_columns,
            delimited_columns,
            column_tables,
            new_record
        }
    }

    fn link_from(field: &FieldSpec, entity: &str) -> Option<LinkDescriptor> {
        let kind = match field.relation {
            Relation::OneToOne | Relation::ManyToOne => LinkKind::ToOne,
            Relation::OneToMany => LinkKind::Collection,
            Relation::None | Relation::ManyToMany => return None
        };
        let Some(related) = field.related else {
            panic!(
                "entity {entity}: relationship field `{}` has no related descriptor",
                field.name
            );
        };
        Some(LinkDescriptor {
            field: field.name,
            kind,
            related,
            target: OnceLock::new()
        })
    }

    /// Deduplicate eligible attributes by column lookup name; the first
    /// occurrence survives, so a column shared between an id field and a
    /// join field is emitted once in generated SQL.
    fn dedup_by_column(
        attributes: &[AttributeDescriptor],
        eligible: impl Fn(&AttributeDescriptor) -> bool
    ) -> Vec<usize> {
        let mut seen = Vec::new();
        let mut out = Vec::new();
        for attr in attributes {
            if !eligible(attr) || seen.contains(&attr.column.lookup) {
                continue;
            }
            seen.push(attr.column.lookup.clone());
            out.push(attr.index);
        }
        out
    }

    /// All considered attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// First attribute matching a column name, case-insensitively. Quote
    /// delimiters in the query are ignored.
    #[must_use]
    pub fn attribute(&self, column: &str) -> Option<&AttributeDescriptor> {
        self.attributes_for_column(column).first().copied()
    }

    /// Every attribute sharing a column name, in declaration order. A name
    /// may be shared by an id field and a join field.
    #[must_use]
    pub fn attributes_for_column(&self, column: &str) -> Vec<&AttributeDescriptor> {
        let key = column.trim_matches('"').to_lowercase();
        self.by_column
            .get(&key)
            .map(|indexes| indexes.iter().map(|&i| &self.attributes[i]).collect())
            .unwrap_or_default()
    }

    /// Attribute lookup by field name, case-sensitive.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.by_field.get(name).map(|&i| &self.attributes[i])
    }

    /// Cross-table attribute lookup: resolves the table through the global
    /// registry, then through transitively linked descriptors. A miss is
    /// `None`, never an error — extra result-set columns are tolerated.
    #[must_use]
    pub fn attribute_in(&self, table: &str, column: &str) -> Option<&AttributeDescriptor> {
        if table.eq_ignore_ascii_case(&self.table.undelimited) {
            return self.attribute(column);
        }
        registry::lookup(table)
            .or_else(|| self.joined_descriptor(table))
            .and_then(|desc| desc.attribute(column))
    }

    /// Resolve a table name through this entity's links, transitively.
    #[must_use]
    pub fn joined_descriptor(&self, table: &str) -> Option<&'static EntityDescriptor> {
        let mut visited: Vec<*const Self> = vec![std::ptr::from_ref(self)];
        let mut queue: Vec<&'static Self> =
            self.links.iter().map(LinkDescriptor::target).collect();
        while let Some(desc) = queue.pop() {
            if visited.contains(&std::ptr::from_ref(desc)) {
                continue;
            }
            visited.push(std::ptr::from_ref(desc));
            if desc.table.undelimited.eq_ignore_ascii_case(table) {
                return Some(desc);
            }
            queue.extend(desc.links.iter().map(LinkDescriptor::target));
        }
        None
    }

    /// The relationship field on this entity whose target table matches,
    /// used by the materializer to walk upward from a joined entity.
    #[must_use]
    pub fn link_for_table(&self, table: &str) -> Option<&LinkDescriptor> {
        self.links
            .iter()
            .find(|link| link.target().table.undelimited.eq_ignore_ascii_case(table))
    }

    /// All relationship links, including the inverse one-to-many side.
    #[must_use]
    pub fn links(&self) -> &[LinkDescriptor] {
        &self.links
    }

    /// Id attributes in declaration order. The order is the positional
    /// contract for composite-key lookups.
    #[must_use]
    pub fn id_attributes(&self) -> Vec<&AttributeDescriptor> {
        self.ids.iter().map(|&i| &self.attributes[i]).collect()
    }

    /// Attributes eligible for INSERT column lists, deduplicated by column
    /// name.
    #[must_use]
    pub fn insertable_attributes(&self) -> Vec<&AttributeDescriptor> {
        self.insertable
            .iter()
            .map(|&i| &self.attributes[i])
            .collect()
    }

    /// Attributes eligible for UPDATE column lists, deduplicated by column
    /// name.
    #[must_use]
    pub fn updatable_attributes(&self) -> Vec<&AttributeDescriptor> {
        self.updatable
            .iter()
            .map(|&i| &self.attributes[i])
            .collect()
    }

    /// Selectable column names (delimited form) in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Id column names (delimited form) in declaration order.
    #[must_use]
    pub fn id_columns(&self) -> &[String] {
        &self.id_columns
    }

    /// Selectable column names excluding ids.
    #[must_use]
    pub fn non_id_columns(&self) -> &[String] {
        &self.non_id_columns
    }

    /// Case-sensitive column names in declaration order.
    #[must_use]
    pub fn case_sensitive_columns(&self) -> &[String] {
        &self.case_sensitive_columns
    }

    /// Delimited column names in declaration order.
    #[must_use]
    pub fn delimited_columns(&self) -> &[String] {
        &self.delimited_columns
    }

    /// Owning table per selectable column.
    #[must_use]
    pub fn column_tables(&self) -> &[String] {
        &self.column_tables
    }

    /// Construct a fresh, default-initialized record of this entity.
    #[must_use]
    pub fn new_record(&self) -> Box<dyn Record> {
        (self.new_record)()
    }

    /// First attribute for the column whose field type is not
    /// [`FieldType::Entity`] — a scalar foreign-key field takes precedence
    /// over a join holder sharing its column name. Falls back to the first
    /// candidate when only join holders match.
    #[must_use]
    pub fn scalar_attribute(&self, column: &str) -> Option<&AttributeDescriptor> {
        let candidates = self.attributes_for_column(column);
        candidates
            .iter()
            .find(|a| a.field_type != FieldType::Entity)
            .copied()
            .or_else(|| candidates.first().copied())
    }
}

impl std::fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("entity", &self.entity)
            .field("table", &self.table.undelimited)
            .field("attributes", &self.attributes.len())
            .field("ids", &self.ids.len())
            .field("links", &self.links.len())
            .finish_non_exhaustive()
    }
}
