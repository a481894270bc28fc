// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
// IFFV readers and writers with diverging field sets and versions.

#![allow(clippy::cast_possible_truncation)]

use iffv_reflect::codec;
use iffv_reflect::{FieldInfo, Format, Reflect, TypeRegistry};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq)]
struct Record {
    count: u32,
    name: String,
    samples: Vec<u16>,
    scale: f64,
    lookup: BTreeMap<u8, String>,
    triple: [i16; 3],
}

impl Reflect for Record {}

const FIELD_COUNT: usize = 6;

fn field(index: usize) -> FieldInfo {
    match index {
        0 => FieldInfo::new("count", |r: &Record| &r.count, |r: &mut Record| &mut r.count),
        1 => FieldInfo::new("name", |r: &Record| &r.name, |r: &mut Record| &mut r.name),
        2 => FieldInfo::new(
            "samples",
            |r: &Record| &r.samples,
            |r: &mut Record| &mut r.samples,
        ),
        3 => FieldInfo::new("scale", |r: &Record| &r.scale, |r: &mut Record| &mut r.scale),
        4 => FieldInfo::new(
            "lookup",
            |r: &Record| &r.lookup,
            |r: &mut Record| &mut r.lookup,
        ),
        _ => FieldInfo::new(
            "triple",
            |r: &Record| &r.triple,
            |r: &mut Record| &mut r.triple,
        ),
    }
}

/// Registered schema: `Some(version)` per field, `None` when absent.
type Schema = [Option<u32>; FIELD_COUNT];

fn registry_for(schema: &Schema) -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    let fields = schema
        .iter()
        .enumerate()
        .filter_map(|(index, version)| version.map(|v| field(index).version(v)))
        .collect();
    registry
        .set_type_fields::<Record>(fields)
        .expect("Record fields");
    registry
}

fn copy_field(index: usize, from: &Record, to: &mut Record) {
    match index {
        0 => to.count = from.count,
        1 => to.name = from.name.clone(),
        2 => to.samples = from.samples.clone(),
        3 => to.scale = from.scale,
        4 => to.lookup = from.lookup.clone(),
        _ => to.triple = from.triple,
    }
}

fn random_record(rng: &mut fastrand::Rng) -> Record {
    let name_len = rng.usize(0..12);
    Record {
        count: rng.u32(..),
        name: (0..name_len).map(|_| rng.alphanumeric()).collect(),
        samples: (0..rng.usize(0..8)).map(|_| rng.u16(..)).collect(),
        scale: rng.f64(),
        lookup: (0..rng.usize(0..4))
            .map(|i| (i as u8, format!("entry-{}", rng.u8(..))))
            .collect(),
        triple: [rng.i16(..), rng.i16(..), rng.i16(..)],
    }
}

fn random_schema(rng: &mut fastrand::Rng) -> Schema {
    let mut schema = [None; FIELD_COUNT];
    for slot in &mut schema {
        if rng.bool() {
            *slot = Some(rng.u32(1..=2));
        }
    }
    schema
}

#[test]
fn test_added_field_keeps_default() {
    let old = registry_for(&[Some(1), Some(1), None, None, None, None]);
    let new = registry_for(&[Some(1); FIELD_COUNT]);

    let value = Record {
        count: 4,
        name: "old".to_string(),
        samples: vec![1, 2],
        ..Record::default()
    };
    let bytes = codec::to_bytes(&old, Format::Iffv, &value).expect("encode");
    let back: Record = codec::from_bytes(&new, Format::Iffv, &bytes).expect("decode");

    assert_eq!(back.count, 4);
    assert_eq!(back.name, "old");
    assert!(back.samples.is_empty());
}

#[test]
fn test_removed_field_is_skipped() {
    let old = registry_for(&[Some(1); FIELD_COUNT]);
    let new = registry_for(&[Some(1), None, None, None, None, Some(1)]);

    let value = Record {
        count: 9,
        name: "dropped".to_string(),
        lookup: BTreeMap::from([(1, "one".to_string())]),
        triple: [1, -2, 3],
        ..Record::default()
    };
    let bytes = codec::to_bytes(&old, Format::Iffv, &value).expect("encode");
    let back: Record = codec::from_bytes(&new, Format::Iffv, &bytes).expect("decode");

    assert_eq!(back.count, 9);
    assert_eq!(back.triple, [1, -2, 3]);
    assert!(back.name.is_empty());
    assert!(back.lookup.is_empty());
}

#[test]
fn test_version_bump_discards_old_payload() {
    let old = registry_for(&[Some(1); FIELD_COUNT]);
    let mut bumped = [Some(1); FIELD_COUNT];
    bumped[2] = Some(2);
    let new = registry_for(&bumped);

    let value = Record {
        count: 1,
        samples: vec![5, 6, 7],
        ..Record::default()
    };
    let bytes = codec::to_bytes(&old, Format::Iffv, &value).expect("encode");
    let back: Record = codec::from_bytes(&new, Format::Iffv, &bytes).expect("decode");

    assert_eq!(back.count, 1);
    assert!(back.samples.is_empty());
}

#[test]
fn test_plain_requires_identical_schema() {
    let registry = registry_for(&[Some(1); FIELD_COUNT]);
    let mut rng = fastrand::Rng::with_seed(7);
    let value = random_record(&mut rng);

    let bytes = codec::to_bytes(&registry, Format::Plain, &value).expect("encode");
    let back: Record = codec::from_bytes(&registry, Format::Plain, &bytes).expect("decode");
    assert_eq!(back, value);
}

#[test]
fn test_random_schema_pairs() {
    let mut rng = fastrand::Rng::with_seed(0x1FF5);

    for _ in 0..200 {
        let writer_schema = random_schema(&mut rng);
        let reader_schema = random_schema(&mut rng);
        let writer = registry_for(&writer_schema);
        let reader = registry_for(&reader_schema);
        let value = random_record(&mut rng);

        let bytes = codec::to_bytes(&writer, Format::Iffv, &value).expect("encode");
        let back: Record = codec::from_bytes(&reader, Format::Iffv, &bytes).expect("decode");

        let mut expected = Record::default();
        for index in 0..FIELD_COUNT {
            match (writer_schema[index], reader_schema[index]) {
                (Some(w), Some(r)) if w == r => copy_field(index, &value, &mut expected),
                _ => {}
            }
        }
        assert_eq!(
            back, expected,
            "writer {writer_schema:?} reader {reader_schema:?}"
        );
    }
}
