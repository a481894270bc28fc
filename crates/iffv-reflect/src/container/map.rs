// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ordered maps `BTreeMap<K, V>`. Iteration follows key order.

use super::{
    downcast, downcast_mut, ContainerKind, ContainerShape, ReadIterator, ReadVisitor,
    WriteIterator, WriteVisitor,
};
use crate::error::{ContainerError, Result};
use crate::identity::{describe, Reflect, TypeInfo};
use std::any::Any;
use std::collections::{btree_map, BTreeMap};
use std::marker::PhantomData;
use std::mem::size_of;

/// Container behavior of `BTreeMap<K, V>`.
pub struct OrderedMapKind<K, V> {
    _marker: PhantomData<fn() -> BTreeMap<K, V>>,
}

impl<K, V> OrderedMapKind<K, V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K, V> Default for OrderedMapKind<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

struct MapReadIterator<'c, K, V> {
    iter: btree_map::Iter<'c, K, V>,
    current: Option<(&'c K, &'c V)>,
    count: usize,
}

impl<K: Any, V: Any> ReadIterator for MapReadIterator<'_, K, V> {
    fn count(&self) -> usize {
        self.count
    }

    fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    fn value(&self) -> std::result::Result<&dyn Any, ContainerError> {
        self.current
            .map(|(_, value)| value as &dyn Any)
            .ok_or(ContainerError::IteratorExhausted)
    }

    fn key(&self) -> std::result::Result<&dyn Any, ContainerError> {
        self.current
            .map(|(key, _)| key as &dyn Any)
            .ok_or(ContainerError::IteratorExhausted)
    }

    fn advance(&mut self) -> std::result::Result<(), ContainerError> {
        if self.current.is_none() {
            return Err(ContainerError::IteratorExhausted);
        }
        self.current = self.iter.next();
        Ok(())
    }
}

struct MapWriteIterator<'c, K, V> {
    map: &'c mut BTreeMap<K, V>,
}

impl<K, V> WriteIterator for MapWriteIterator<'_, K, V>
where
    K: Reflect + Ord + Clone,
    V: Reflect + Clone,
{
    fn append(&mut self, _value: &dyn Any) -> std::result::Result<(), ContainerError> {
        Err(ContainerError::NotASequence)
    }

    fn insert(&mut self, key: &dyn Any, value: &dyn Any) -> std::result::Result<(), ContainerError> {
        let key = downcast::<K>(key)?.clone();
        let value = downcast::<V>(value)?.clone();
        self.map.insert(key, value);
        Ok(())
    }

    fn append_empty(&mut self) -> std::result::Result<&mut dyn Any, ContainerError> {
        Err(ContainerError::NotASequence)
    }

    /// An existing entry under `key` is reset to the default value.
    fn insert_empty(&mut self, key: &dyn Any) -> std::result::Result<&mut dyn Any, ContainerError> {
        let key = downcast::<K>(key)?.clone();
        let slot = self.map.entry(key).or_default();
        *slot = V::default();
        Ok(slot)
    }
}

impl<K, V> ContainerKind for OrderedMapKind<K, V>
where
    K: Reflect + Ord + Clone,
    V: Reflect + Clone,
{
    fn shape(&self) -> ContainerShape {
        ContainerShape::OrderedMap
    }

    fn key_type(&self) -> Option<TypeInfo> {
        Some(describe::<K>())
    }

    fn value_type(&self) -> TypeInfo {
        describe::<V>()
    }

    fn read_iterator_size(&self) -> usize {
        size_of::<MapReadIterator<'static, K, V>>()
    }

    fn write_iterator_size(&self) -> usize {
        size_of::<MapWriteIterator<'static, K, V>>()
    }

    fn with_reader(&self, container: &dyn Any, visit: &mut ReadVisitor<'_>) -> Result<()> {
        let map = downcast::<BTreeMap<K, V>>(container)?;
        let mut iter = map.iter();
        let current = iter.next();
        let mut reader = MapReadIterator {
            iter,
            current,
            count: map.len(),
        };
        visit(&mut reader)
    }

    fn with_writer(&self, container: &mut dyn Any, visit: &mut WriteVisitor<'_>) -> Result<()> {
        let map = downcast_mut::<BTreeMap<K, V>>(container)?;
        let mut writer = MapWriteIterator { map };
        visit(&mut writer)
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + Ord + Clone,
    V: Reflect + Clone,
{
    fn container() -> Option<Box<dyn ContainerKind>> {
        Some(Box::new(OrderedMapKind::<K, V>::new()))
    }
}
