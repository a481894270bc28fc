// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Growable sequences `Vec<E>`.

use super::{
    downcast, downcast_mut, ContainerKind, ContainerShape, ReadIterator, ReadVisitor,
    WriteIterator, WriteVisitor,
};
use crate::error::{ContainerError, Result};
use crate::identity::{describe, Reflect, TypeInfo};
use std::any::Any;
use std::marker::PhantomData;
use std::mem::size_of;

/// Container behavior of `Vec<E>`.
pub struct SequenceKind<E> {
    _marker: PhantomData<fn() -> Vec<E>>,
}

impl<E> SequenceKind<E> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E> Default for SequenceKind<E> {
    fn default() -> Self {
        Self::new()
    }
}

struct SequenceReadIterator<'c, E> {
    iter: std::slice::Iter<'c, E>,
    current: Option<&'c E>,
    count: usize,
}

impl<'c, E> SequenceReadIterator<'c, E> {
    fn new(items: &'c [E]) -> Self {
        let mut iter = items.iter();
        let current = iter.next();
        Self {
            iter,
            current,
            count: items.len(),
        }
    }
}

impl<E: Any> ReadIterator for SequenceReadIterator<'_, E> {
    fn count(&self) -> usize {
        self.count
    }

    fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    fn value(&self) -> std::result::Result<&dyn Any, ContainerError> {
        self.current
            .map(|item| item as &dyn Any)
            .ok_or(ContainerError::IteratorExhausted)
    }

    fn key(&self) -> std::result::Result<&dyn Any, ContainerError> {
        Err(ContainerError::NotAssociative)
    }

    fn advance(&mut self) -> std::result::Result<(), ContainerError> {
        if self.current.is_none() {
            return Err(ContainerError::IteratorExhausted);
        }
        self.current = self.iter.next();
        Ok(())
    }
}

struct SequenceWriteIterator<'c, E> {
    items: &'c mut Vec<E>,
}

impl<E: Reflect + Clone> WriteIterator for SequenceWriteIterator<'_, E> {
    fn append(&mut self, value: &dyn Any) -> std::result::Result<(), ContainerError> {
        self.items.push(downcast::<E>(value)?.clone());
        Ok(())
    }

    fn insert(&mut self, _key: &dyn Any, _value: &dyn Any) -> std::result::Result<(), ContainerError> {
        Err(ContainerError::NotAssociative)
    }

    fn append_empty(&mut self) -> std::result::Result<&mut dyn Any, ContainerError> {
        self.items.push(E::default());
        let index = self.items.len() - 1;
        Ok(&mut self.items[index])
    }

    fn insert_empty(&mut self, _key: &dyn Any) -> std::result::Result<&mut dyn Any, ContainerError> {
        Err(ContainerError::NotAssociative)
    }
}

impl<E: Reflect + Clone> ContainerKind for SequenceKind<E> {
    fn shape(&self) -> ContainerShape {
        ContainerShape::Sequence
    }

    fn key_type(&self) -> Option<TypeInfo> {
        None
    }

    fn value_type(&self) -> TypeInfo {
        describe::<E>()
    }

    fn read_iterator_size(&self) -> usize {
        size_of::<SequenceReadIterator<'static, E>>()
    }

    fn write_iterator_size(&self) -> usize {
        size_of::<SequenceWriteIterator<'static, E>>()
    }

    fn with_reader(&self, container: &dyn Any, visit: &mut ReadVisitor<'_>) -> Result<()> {
        let items = downcast::<Vec<E>>(container)?;
        let mut iter = SequenceReadIterator::new(items.as_slice());
        visit(&mut iter)
    }

    fn with_writer(&self, container: &mut dyn Any, visit: &mut WriteVisitor<'_>) -> Result<()> {
        let items = downcast_mut::<Vec<E>>(container)?;
        let mut iter = SequenceWriteIterator { items };
        visit(&mut iter)
    }
}

impl<E: Reflect + Clone> Reflect for Vec<E> {
    fn container() -> Option<Box<dyn ContainerKind>> {
        Some(Box::new(SequenceKind::<E>::new()))
    }
}
