// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-length arrays `[E; N]`.

use super::{
    downcast, downcast_mut, ContainerKind, ContainerShape, ReadIterator, ReadVisitor,
    WriteIterator, WriteVisitor,
};
use crate::error::{ContainerError, Result};
use crate::identity::{describe, Reflect, TypeInfo};
use std::any::Any;
use std::marker::PhantomData;
use std::mem::size_of;

/// Container behavior of `[E; N]`.
pub struct ArrayKind<E, const N: usize> {
    _marker: PhantomData<fn() -> [E; N]>,
}

impl<E, const N: usize> ArrayKind<E, N> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E, const N: usize> Default for ArrayKind<E, N> {
    fn default() -> Self {
        Self::new()
    }
}

struct ArrayReadIterator<'c, E> {
    items: &'c [E],
    pos: usize,
}

impl<E: Any> ReadIterator for ArrayReadIterator<'_, E> {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn is_valid(&self) -> bool {
        self.pos < self.items.len()
    }

    fn value(&self) -> std::result::Result<&dyn Any, ContainerError> {
        self.items
            .get(self.pos)
            .map(|item| item as &dyn Any)
            .ok_or(ContainerError::IteratorExhausted)
    }

    fn key(&self) -> std::result::Result<&dyn Any, ContainerError> {
        Err(ContainerError::NotAssociative)
    }

    fn advance(&mut self) -> std::result::Result<(), ContainerError> {
        if !self.is_valid() {
            return Err(ContainerError::IteratorExhausted);
        }
        self.pos += 1;
        Ok(())
    }
}

/// Overwrites positions `0..N` in order.
struct ArrayWriteIterator<'c, E> {
    items: &'c mut [E],
    pos: usize,
}

impl<E> ArrayWriteIterator<'_, E> {
    fn next_slot(&mut self) -> std::result::Result<&mut E, ContainerError> {
        let capacity = self.items.len();
        let slot = self
            .items
            .get_mut(self.pos)
            .ok_or(ContainerError::CapacityExceeded { capacity })?;
        self.pos += 1;
        Ok(slot)
    }
}

impl<E: Reflect + Clone> WriteIterator for ArrayWriteIterator<'_, E> {
    fn append(&mut self, value: &dyn Any) -> std::result::Result<(), ContainerError> {
        let value = downcast::<E>(value)?.clone();
        *self.next_slot()? = value;
        Ok(())
    }

    fn insert(&mut self, _key: &dyn Any, _value: &dyn Any) -> std::result::Result<(), ContainerError> {
        Err(ContainerError::NotAssociative)
    }

    fn append_empty(&mut self) -> std::result::Result<&mut dyn Any, ContainerError> {
        let slot = self.next_slot()?;
        *slot = E::default();
        Ok(slot)
    }

    fn insert_empty(&mut self, _key: &dyn Any) -> std::result::Result<&mut dyn Any, ContainerError> {
        Err(ContainerError::NotAssociative)
    }
}

impl<E: Reflect + Clone, const N: usize> ContainerKind for ArrayKind<E, N> {
    fn shape(&self) -> ContainerShape {
        ContainerShape::FixedArray
    }

    fn key_type(&self) -> Option<TypeInfo> {
        None
    }

    fn value_type(&self) -> TypeInfo {
        describe::<E>()
    }

    fn read_iterator_size(&self) -> usize {
        size_of::<ArrayReadIterator<'static, E>>()
    }

    fn write_iterator_size(&self) -> usize {
        size_of::<ArrayWriteIterator<'static, E>>()
    }

    fn with_reader(&self, container: &dyn Any, visit: &mut ReadVisitor<'_>) -> Result<()> {
        let array = downcast::<[E; N]>(container)?;
        let mut iter = ArrayReadIterator {
            items: array.as_slice(),
            pos: 0,
        };
        visit(&mut iter)
    }

    fn with_writer(&self, container: &mut dyn Any, visit: &mut WriteVisitor<'_>) -> Result<()> {
        let array = downcast_mut::<[E; N]>(container)?;
        let mut iter = ArrayWriteIterator {
            items: array.as_mut_slice(),
            pos: 0,
        };
        visit(&mut iter)
    }
}

impl<E: Reflect + Clone, const N: usize> Reflect for [E; N]
where
    [E; N]: Default,
{
    fn container() -> Option<Box<dyn ContainerKind>> {
        Some(Box::new(ArrayKind::<E, N>::new()))
    }
}
