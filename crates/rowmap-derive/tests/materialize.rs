// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end materialization over derived entities: joined rows, NULL-only
//! joins, fan-out, collection links, enum storage and converters.

use chrono::{DateTime, NaiveDateTime};
use rowmap_derive::{Entity, Enumerated, prelude::*};

#[derive(Entity, Default, Debug)]
#[entity(table = "mm_rights")]
pub struct Right {
    #[id]
    pub id: i64,

    pub label: Option<String>
}

#[derive(Entity, Default, Debug)]
#[entity(table = "mm_lefts")]
pub struct Left {
    #[id]
    pub id: i64,

    pub kind: Option<String>,

    pub right_id: i64,

    #[many_to_one]
    #[join_column(referenced = "right_id")]
    pub right: Option<Right>
}

#[derive(Entity, Default, Debug)]
#[entity(table = "mm_bands")]
pub struct Band {
    #[id]
    pub id: i64,

    pub name: Option<String>,

    #[one_to_many(mapped_by = "band")]
    pub tracks: Vec<Track>
}

#[derive(Entity, Default, Debug)]
#[entity(table = "mm_tracks")]
pub struct Track {
    #[id]
    pub id: i64,

    pub title: Option<String>,

    pub band_id: i64,

    #[many_to_one]
    #[join_column(referenced = "band_id")]
    pub band: Option<Band>
}

#[derive(Enumerated, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold
}

#[derive(Entity, Default, Debug)]
#[entity(table = "mm_profiles")]
pub struct Profile {
    #[id]
    pub id: i64,

    #[enumerated]
    pub tier: Tier,

    #[convert(with = rowmap_derive::convert::TimestampAsEpochMillis)]
    pub last_seen: Option<NaiveDateTime>
}

fn left_columns() -> Vec<MemoryColumn> {
    vec![
        MemoryColumn::new("id", "mm_lefts", "BIGINT"),
        MemoryColumn::new("kind", "mm_lefts", "VARCHAR"),
        MemoryColumn::new("right_id", "mm_lefts", "BIGINT"),
        MemoryColumn::new("id", "mm_rights", "BIGINT"),
        MemoryColumn::new("label", "mm_rights", "VARCHAR"),
    ]
}

#[test]
fn joined_row_populates_parent_and_child() {
    let mut rs = MemoryResultSet::new(left_columns(), vec![vec![
        SqlValue::BigInt(1),
        SqlValue::Text("alpha".into()),
        SqlValue::BigInt(10),
        SqlValue::BigInt(10),
        SqlValue::Text("prime".into()),
    ]]);

    let lefts: Vec<Left> = Materializer::default().materialize(&mut rs).unwrap();
    assert_eq!(lefts.len(), 1);
    let left = &lefts[0];
    assert_eq!(left.id, 1);
    assert_eq!(left.kind.as_deref(), Some("alpha"));
    assert_eq!(left.right_id, 10);

    let right = left.right.as_ref().expect("joined child attached");
    assert_eq!(right.id, 10);
    assert_eq!(right.label.as_deref(), Some("prime"));
}

#[test]
fn all_null_join_leaves_link_unset() {
    let mut rs = MemoryResultSet::new(left_columns(), vec![vec![
        SqlValue::BigInt(2),
        SqlValue::Null,
        SqlValue::BigInt(11),
        SqlValue::Null,
        SqlValue::Null,
    ]]);

    let lefts: Vec<Left> = Materializer::default().materialize(&mut rs).unwrap();
    assert_eq!(lefts.len(), 1);
    assert_eq!(lefts[0].kind, None);
    assert!(lefts[0].right.is_none());
}

#[test]
fn fan_out_produces_one_record_per_row() {
    let mut rs = MemoryResultSet::new(left_columns(), vec![
        vec![
            SqlValue::BigInt(1),
            SqlValue::Null,
            SqlValue::BigInt(10),
            SqlValue::BigInt(10),
            SqlValue::Text("first".into()),
        ],
        vec![
            SqlValue::BigInt(1),
            SqlValue::Null,
            SqlValue::BigInt(11),
            SqlValue::BigInt(11),
            SqlValue::Text("second".into()),
        ],
    ]);

    let lefts: Vec<Left> = Materializer::default().materialize(&mut rs).unwrap();
    assert_eq!(lefts.len(), 2);
    assert_eq!(
        lefts[0].right.as_ref().and_then(|r| r.label.as_deref()),
        Some("first")
    );
    assert_eq!(
        lefts[1].right.as_ref().and_then(|r| r.label.as_deref()),
        Some("second")
    );
}

#[test]
fn unmapped_tables_and_computed_columns_are_tolerated() {
    let columns = vec![
        MemoryColumn::new("id", "mm_lefts", "BIGINT"),
        MemoryColumn::new("right_id", "mm_lefts", "BIGINT"),
        MemoryColumn::new("id", "mm_rights", "BIGINT"),
        MemoryColumn::new("label", "mm_rights", "VARCHAR"),
        MemoryColumn::new("phantom", "mm_ghosts", "BIGINT"),
        MemoryColumn::new("kind", "", "VARCHAR"),
    ];

    let mut rs = MemoryResultSet::new(columns, vec![vec![
        SqlValue::BigInt(3),
        SqlValue::BigInt(12),
        SqlValue::BigInt(12),
        SqlValue::Null,
        SqlValue::BigInt(999),
        SqlValue::Text("computed".into()),
    ]]);

    let lefts: Vec<Left> = Materializer::default().materialize(&mut rs).unwrap();
    assert_eq!(lefts.len(), 1);
    // the table-less column lands on the root entity
    assert_eq!(lefts[0].kind.as_deref(), Some("computed"));
    assert_eq!(lefts[0].right.as_ref().map(|r| r.id), Some(12));
}

#[test]
fn collection_link_appends_children() {
    let columns = vec![
        MemoryColumn::new("id", "mm_bands", "BIGINT"),
        MemoryColumn::new("name", "mm_bands", "VARCHAR"),
        MemoryColumn::new("id", "mm_tracks", "BIGINT"),
        MemoryColumn::new("title", "mm_tracks", "VARCHAR"),
        MemoryColumn::new("band_id", "mm_tracks", "BIGINT"),
    ];
    let mut rs = MemoryResultSet::new(columns, vec![vec![
        SqlValue::BigInt(7),
        SqlValue::Text("band".into()),
        SqlValue::BigInt(70),
        SqlValue::Text("track".into()),
        SqlValue::BigInt(7),
    ]]);

    let bands: Vec<Band> = Materializer::default().materialize(&mut rs).unwrap();
    assert_eq!(bands.len(), 1);
    assert_eq!(bands[0].tracks.len(), 1);
    assert_eq!(bands[0].tracks[0].title.as_deref(), Some("track"));
}

#[test]
fn enum_and_converter_fields_coerce_through_the_derive() {
    let columns = vec![
        MemoryColumn::new("id", "mm_profiles", "BIGINT"),
        MemoryColumn::new("tier", "mm_profiles", "INT"),
        MemoryColumn::new("last_seen", "mm_profiles", "BIGINT"),
    ];
    let mut rs = MemoryResultSet::new(columns, vec![vec![
        SqlValue::BigInt(1),
        SqlValue::Int(2),
        SqlValue::BigInt(1_700_000_000_000),
    ]]);

    let profiles: Vec<Profile> = Materializer::default().materialize(&mut rs).unwrap();
    assert_eq!(profiles[0].tier, Tier::Gold);
    let expected = DateTime::from_timestamp_millis(1_700_000_000_000)
        .unwrap()
        .naive_utc();
    assert_eq!(profiles[0].last_seen, Some(expected));
}

#[test]
fn mysql_enum_ordinals_are_one_based() {
    let columns = vec![
        MemoryColumn::new("id", "mm_profiles", "BIGINT"),
        MemoryColumn::new("tier", "mm_profiles", "ENUM"),
        MemoryColumn::new("last_seen", "mm_profiles", "BIGINT"),
    ];
    let mut rs = MemoryResultSet::new(columns, vec![vec![
        SqlValue::BigInt(2),
        SqlValue::BigInt(1),
        SqlValue::Null,
    ]]);

    let profiles: Vec<Profile> = Materializer::new(Engine::MySql)
        .materialize(&mut rs)
        .unwrap();
    assert_eq!(profiles[0].tier, Tier::Bronze);
    assert_eq!(profiles[0].last_seen, None);
}

#[test]
fn enumerated_derive_maps_both_directions() {
    assert_eq!(Tier::NAMES, ["Bronze", "Silver", "Gold"]);
    assert_eq!(Tier::from_ordinal(1), Some(Tier::Silver));
    assert_eq!(Tier::from_ordinal(3), None);
    assert_eq!(Tier::from_name("Gold"), Some(Tier::Gold));
    assert_eq!(Tier::from_name("gold"), None);
    assert_eq!(Tier::Silver.ordinal(), 1);
    assert_eq!(Tier::Gold.name(), "Gold");
}
