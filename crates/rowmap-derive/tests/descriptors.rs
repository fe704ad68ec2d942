// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Descriptor behavior of derived entities: caching, column naming, key
//! ordering and the insert/update eligibility arrays.

use std::thread;

use chrono::{NaiveDate, NaiveDateTime};
use rowmap_derive::{Entity, prelude::*};

#[derive(Entity, Default, Debug)]
#[entity(table = "dx_squads")]
pub struct Squad {
    #[id]
    #[generated]
    pub id: i64,

    #[column(name = "\"Squad Name\"")]
    pub name: String,

    #[column(insertable = false)]
    pub motto: Option<String>,

    pub founded: Option<NaiveDate>,

    #[one_to_many(mapped_by = "squad")]
    pub members: Vec<Member>
}

#[derive(Entity, Default, Debug)]
#[entity(table = "dx_members")]
pub struct Member {
    #[id]
    #[generated]
    pub id: i64,

    pub alias: String,

    #[column(updatable = false)]
    pub joined_on: Option<NaiveDateTime>,

    pub squad_id: i64,

    #[many_to_one]
    #[join_column(referenced = "squad_id")]
    pub squad: Option<Squad>
}

#[derive(Entity, Default, Debug)]
#[entity(table = "dx_memberships")]
pub struct Membership {
    #[id]
    pub squad_id: i64,

    #[id]
    pub member_id: i64,

    pub role: String
}

#[test]
fn descriptor_is_identical_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| thread::spawn(|| std::ptr::from_ref(Squad::descriptor()) as usize))
        .collect();
    let first = std::ptr::from_ref(Squad::descriptor()) as usize;
    for handle in handles {
        assert_eq!(handle.join().unwrap(), first);
    }
}

#[test]
fn descriptor_registers_its_table() {
    let desc = Squad::descriptor();
    let found = registry::lookup("DX_SQUADS").expect("registered on first descriptor access");
    assert!(std::ptr::eq(found, desc));
    assert!(registry::lookup("dx_squads").is_some());
}

#[test]
fn composite_key_columns_keep_declaration_order() {
    let desc = Membership::descriptor();
    assert_eq!(desc.id_columns(), ["squad_id", "member_id"]);
    let ids: Vec<&str> = desc.id_attributes().iter().map(|a| a.field).collect();
    assert_eq!(ids, ["squad_id", "member_id"]);
}

#[test]
fn delimited_column_keeps_case_and_quotes() {
    let desc = Squad::descriptor();
    let name = desc.attribute("\"Squad Name\"").expect("delimited lookup");
    assert_eq!(name.column.case_sensitive, "Squad Name");
    assert_eq!(name.column.delimited, "\"Squad Name\"");
    assert!(name.column.is_delimited);

    // lookup is case-insensitive and quote-insensitive
    let same = desc.attribute("squad name").expect("folded lookup");
    assert_eq!(same.field, "name");
    assert!(
        desc.delimited_columns()
            .iter()
            .any(|c| c == "\"Squad Name\"")
    );
}

#[test]
fn eligibility_honors_declared_tri_state() {
    let desc = Squad::descriptor();
    let insertable: Vec<&str> = desc
        .insertable_attributes()
        .iter()
        .map(|a| a.field)
        .collect();
    assert!(!insertable.contains(&"motto"));
    assert!(insertable.contains(&"founded"));

    let updatable: Vec<&str> = desc.updatable_attributes().iter().map(|a| a.field).collect();
    assert!(updatable.contains(&"motto"));

    let member = Member::descriptor();
    let updatable: Vec<&str> = member
        .updatable_attributes()
        .iter()
        .map(|a| a.field)
        .collect();
    assert!(!updatable.contains(&"joined_on"));
}

#[test]
fn join_fields_never_enter_sql_column_arrays() {
    let desc = Member::descriptor();
    let join = desc.field("squad").expect("join attribute present");
    assert!(join.is_join());
    assert!(!join.is_insertable());
    assert!(!join.is_updatable());

    // the collection side owns no column at all
    assert!(Squad::descriptor().field("members").is_none());
    assert_eq!(Squad::descriptor().links().len(), 1);
}

#[test]
fn shared_column_is_emitted_once() {
    let desc = Member::descriptor();
    // squad_id the scalar and squad the join resolve to the same column
    assert_eq!(desc.attributes_for_column("squad_id").len(), 2);
    let occurrences = desc.columns().iter().filter(|c| *c == "squad_id").count();
    assert_eq!(occurrences, 1);
    let insertable = desc
        .insertable_attributes()
        .iter()
        .filter(|a| a.column.lookup == "squad_id")
        .count();
    assert_eq!(insertable, 1);
}

#[test]
fn generated_id_survives_into_metadata() {
    let id = Squad::descriptor().field("id").expect("id attribute");
    assert!(id.is_id);
    assert!(id.is_generated);
}

#[test]
fn link_target_resolves_lazily_to_cached_descriptor() {
    let link = Member::descriptor().link_for_table("dx_squads").expect("squad link");
    assert_eq!(link.kind, LinkKind::ToOne);
    assert!(std::ptr::eq(link.target(), Squad::descriptor()));
}
