// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container iteration tests.

use super::*;
use crate::error::Error;
use crate::identity::{describe, Reflect};
use std::collections::BTreeMap;

fn kind_of<T: Reflect>() -> Box<dyn ContainerKind> {
    describe::<T>().container_kind().expect("container kind")
}

/// Collect the values of a container of `u32`.
fn read_u32s(kind: &dyn ContainerKind, container: &dyn Any) -> Vec<u32> {
    let mut out = Vec::new();
    kind.with_reader(container, &mut |iter| {
        while iter.is_valid() {
            out.push(*iter.value()?.downcast_ref::<u32>().expect("u32"));
            iter.advance()?;
        }
        Ok(())
    })
    .expect("read");
    out
}

#[test]
fn test_shapes_and_element_types() {
    let array = kind_of::<[u32; 5]>();
    assert_eq!(array.shape(), ContainerShape::FixedArray);
    assert_eq!(array.value_type(), describe::<u32>());
    assert!(array.key_type().is_none());

    let seq = kind_of::<Vec<String>>();
    assert_eq!(seq.shape(), ContainerShape::Sequence);
    assert_eq!(seq.value_type(), describe::<String>());

    let map = kind_of::<BTreeMap<String, u32>>();
    assert_eq!(map.shape(), ContainerShape::OrderedMap);
    assert_eq!(map.key_type(), Some(describe::<String>()));
    assert_eq!(map.value_type(), describe::<u32>());

    assert!(array.read_iterator_size() > 0);
    assert!(map.write_iterator_size() > 0);
    assert!(describe::<u32>().container_kind().is_none());
}

#[test]
fn test_array_read_in_order() {
    let kind = kind_of::<[u32; 5]>();
    let array: [u32; 5] = [0, 1, 2, 3, 4];
    assert_eq!(read_u32s(kind.as_ref(), &array), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_array_key_always_fails() {
    let kind = kind_of::<[u32; 2]>();
    let array = [7u32, 8];
    kind.with_reader(&array, &mut |iter| {
        assert_eq!(iter.count(), 2);
        assert_eq!(iter.key().unwrap_err(), ContainerError::NotAssociative);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_array_write_overwrites_then_fills_capacity() {
    let kind = kind_of::<[u32; 3]>();
    let mut array = [9u32; 3];
    let result = kind.with_writer(&mut array, &mut |w| {
        w.append(&1u32)?;
        *w.append_empty()?.downcast_mut::<u32>().expect("u32") = 2;
        w.append(&3u32)?;
        w.append(&4u32)?;
        Ok(())
    });

    assert!(matches!(
        result,
        Err(Error::Container(ContainerError::CapacityExceeded { capacity: 3 }))
    ));
    assert_eq!(array, [1, 2, 3]);
}

#[test]
fn test_array_short_write_keeps_tail() {
    let kind = kind_of::<[u32; 4]>();
    let mut array = [5u32; 4];
    kind.with_writer(&mut array, &mut |w| {
        w.append(&1u32)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(array, [1, 5, 5, 5]);
}

#[test]
fn test_sequence_append() {
    let kind = kind_of::<Vec<u32>>();
    let mut items: Vec<u32> = Vec::new();
    kind.with_writer(&mut items, &mut |w| {
        for i in 0..5u32 {
            w.append(&i)?;
        }
        *w.append_empty()?.downcast_mut::<u32>().expect("u32") = 42;
        Ok(())
    })
    .unwrap();

    assert_eq!(items, vec![0, 1, 2, 3, 4, 42]);
    assert_eq!(read_u32s(kind.as_ref(), &items), items);
}

#[test]
fn test_sequence_rejects_keys() {
    let kind = kind_of::<Vec<u32>>();
    let mut items: Vec<u32> = Vec::new();
    kind.with_writer(&mut items, &mut |w| {
        assert_eq!(w.insert(&1u32, &2u32).unwrap_err(), ContainerError::NotAssociative);
        assert!(matches!(w.insert_empty(&1u32), Err(ContainerError::NotAssociative)));
        Ok(())
    })
    .unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_empty_sequence_reader() {
    let kind = kind_of::<Vec<u32>>();
    let items: Vec<u32> = Vec::new();
    kind.with_reader(&items, &mut |iter| {
        assert_eq!(iter.count(), 0);
        assert!(!iter.is_valid());
        assert_eq!(iter.value().unwrap_err(), ContainerError::IteratorExhausted);
        assert_eq!(iter.advance().unwrap_err(), ContainerError::IteratorExhausted);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_map_iterates_in_key_order() {
    let kind = kind_of::<BTreeMap<String, u32>>();
    let mut map: BTreeMap<String, u32> = BTreeMap::new();

    kind.with_writer(&mut map, &mut |w| {
        for (key, value) in [("c", 3u32), ("a", 1), ("b", 2)] {
            w.insert(&key.to_string(), &value)?;
        }
        Ok(())
    })
    .unwrap();

    let mut seen = Vec::new();
    kind.with_reader(&map, &mut |iter| {
        assert_eq!(iter.count(), 3);
        while iter.is_valid() {
            let key = iter.key()?.downcast_ref::<String>().expect("key").clone();
            let value = *iter.value()?.downcast_ref::<u32>().expect("value");
            seen.push((key, value));
            iter.advance()?;
        }
        assert_eq!(iter.key().unwrap_err(), ContainerError::IteratorExhausted);
        Ok(())
    })
    .unwrap();

    assert_eq!(
        seen,
        vec![("a".to_string(), 1), ("b".to_string(), 2), ("c".to_string(), 3)]
    );
}

#[test]
fn test_map_insert_empty_resets_existing() {
    let kind = kind_of::<BTreeMap<u32, Vec<u32>>>();
    let mut map = BTreeMap::from([(1u32, vec![1u32, 2, 3])]);

    kind.with_writer(&mut map, &mut |w| {
        let slot = w.insert_empty(&1u32)?;
        slot.downcast_mut::<Vec<u32>>().expect("vec").push(9);
        assert_eq!(w.append(&0u32).unwrap_err(), ContainerError::NotASequence);
        Ok(())
    })
    .unwrap();

    assert_eq!(map[&1], vec![9]);
}

#[test]
fn test_wrong_element_type() {
    let kind = kind_of::<Vec<u32>>();
    let mut items: Vec<u32> = Vec::new();
    kind.with_writer(&mut items, &mut |w| {
        assert!(matches!(
            w.append(&1u64),
            Err(ContainerError::ElementTypeMismatch { .. })
        ));
        Ok(())
    })
    .unwrap();

    let not_a_vec = 5u32;
    let err = kind.with_reader(&not_a_vec, &mut |_| Ok(())).unwrap_err();
    assert!(matches!(
        err,
        Error::Container(ContainerError::ElementTypeMismatch { .. })
    ));
}

#[test]
fn test_visitor_error_propagates() {
    let kind = kind_of::<Vec<u32>>();
    let items = vec![1u32];
    let err = kind
        .with_reader(&items, &mut |iter| {
            iter.advance()?;
            iter.advance()?;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Container(ContainerError::IteratorExhausted)
    ));
}

#[test]
fn test_array_writer_rejects_keys() {
    let kind = kind_of::<[u32; 2]>();
    let mut array = [1u32, 2];
    kind.with_writer(&mut array, &mut |w| {
        assert_eq!(w.insert(&0u32, &9u32).unwrap_err(), ContainerError::NotAssociative);
        assert!(matches!(w.insert_empty(&0u32), Err(ContainerError::NotAssociative)));
        Ok(())
    })
    .unwrap();
    assert_eq!(array, [1, 2]);
}

#[test]
fn test_map_insert_overwrites_duplicate_key() {
    let kind = kind_of::<BTreeMap<u32, String>>();
    let mut map = BTreeMap::from([(1u32, "old".to_string())]);
    kind.with_writer(&mut map, &mut |w| {
        w.insert(&1u32, &"new".to_string())?;
        w.insert(&2u32, &"two".to_string())?;
        Ok(())
    })
    .unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map[&1], "new");
}

#[test]
fn test_exhausted_iterators() {
    let map_kind = kind_of::<BTreeMap<u32, u32>>();
    let map = BTreeMap::from([(4u32, 40u32)]);
    map_kind
        .with_reader(&map, &mut |iter| {
            iter.advance()?;
            assert!(!iter.is_valid());
            assert_eq!(iter.value().unwrap_err(), ContainerError::IteratorExhausted);
            assert_eq!(iter.advance().unwrap_err(), ContainerError::IteratorExhausted);
            Ok(())
        })
        .unwrap();

    let seq_kind = kind_of::<Vec<u32>>();
    let items = vec![1u32];
    seq_kind
        .with_reader(&items, &mut |iter| {
            iter.advance()?;
            assert!(!iter.is_valid());
            assert_eq!(iter.key().unwrap_err(), ContainerError::NotAssociative);
            assert_eq!(iter.value().unwrap_err(), ContainerError::IteratorExhausted);
            Ok(())
        })
        .unwrap();
}
