// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-erased container iteration.
//!
//! A [`ContainerKind`] knows how to walk one concrete collection type
//! (`[E; N]`, `Vec<E>`, `BTreeMap<K, V>`) through the [`ReadIterator`] and
//! [`WriteIterator`] interfaces without the caller knowing `E`, `K` or `V`.
//! Iterators are lent to a visitor closure for the duration of one walk, so
//! they never outlive the borrowed container.
//!
//! The set of kinds is open: implement [`ContainerKind`] and return it from
//! [`Reflect::container`](crate::Reflect::container) for a new collection.

mod array;
mod map;
mod sequence;

#[cfg(test)]
mod tests;

pub use array::ArrayKind;
pub use map::OrderedMapKind;
pub use sequence::SequenceKind;

use crate::error::{ContainerError, Result};
use crate::identity::TypeInfo;
use crate::registry::TypeHandle;
use std::any::Any;
use std::fmt;

/// Collection family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerShape {
    /// Fixed-length array; writes overwrite positions in order.
    FixedArray,
    /// Growable sequence; writes append.
    Sequence,
    /// Key-sorted associative map.
    OrderedMap,
}

/// Forward cursor over a container's elements.
pub trait ReadIterator {
    /// Number of elements in the container.
    fn count(&self) -> usize;

    /// True while the cursor is on an element.
    fn is_valid(&self) -> bool;

    /// Current element value.
    fn value(&self) -> std::result::Result<&dyn Any, ContainerError>;

    /// Current element key (maps only).
    fn key(&self) -> std::result::Result<&dyn Any, ContainerError>;

    /// Move to the next element.
    fn advance(&mut self) -> std::result::Result<(), ContainerError>;
}

/// Element sink of a container.
pub trait WriteIterator {
    /// Append a copy of `value`.
    fn append(&mut self, value: &dyn Any) -> std::result::Result<(), ContainerError>;

    /// Insert a copy of `key` -> `value`.
    fn insert(&mut self, key: &dyn Any, value: &dyn Any)
        -> std::result::Result<(), ContainerError>;

    /// Append a default element and return it for in-place filling.
    fn append_empty(&mut self) -> std::result::Result<&mut dyn Any, ContainerError>;

    /// Insert a default value under `key` and return it for in-place filling.
    fn insert_empty(&mut self, key: &dyn Any) -> std::result::Result<&mut dyn Any, ContainerError>;
}

/// Visitor receiving a read iterator.
pub type ReadVisitor<'v> = dyn FnMut(&mut dyn ReadIterator) -> Result<()> + 'v;

/// Visitor receiving a write iterator.
pub type WriteVisitor<'v> = dyn FnMut(&mut dyn WriteIterator) -> Result<()> + 'v;

/// Behavior of one concrete collection type.
pub trait ContainerKind: Send + Sync {
    fn shape(&self) -> ContainerShape;

    /// Key description (maps only).
    fn key_type(&self) -> Option<TypeInfo>;

    /// Element (or mapped value) description.
    fn value_type(&self) -> TypeInfo;

    /// Byte size of the read iterator state.
    fn read_iterator_size(&self) -> usize;

    /// Byte size of the write iterator state.
    fn write_iterator_size(&self) -> usize;

    /// Lend a read iterator over `container` to `visit`.
    fn with_reader(&self, container: &dyn Any, visit: &mut ReadVisitor<'_>) -> Result<()>;

    /// Lend a write iterator over `container` to `visit`.
    fn with_writer(&self, container: &mut dyn Any, visit: &mut WriteVisitor<'_>) -> Result<()>;
}

/// Registry-resolved element type of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSlot {
    pub ty: TypeHandle,
    pub is_pointer: bool,
}

/// Container behavior attached to a registered container type.
pub struct ContainerFactory {
    kind: Box<dyn ContainerKind>,
    key: Option<ElementSlot>,
    value: ElementSlot,
}

impl ContainerFactory {
    pub(crate) fn new(
        kind: Box<dyn ContainerKind>,
        key: Option<ElementSlot>,
        value: ElementSlot,
    ) -> Self {
        Self { kind, key, value }
    }

    pub fn kind(&self) -> &dyn ContainerKind {
        self.kind.as_ref()
    }

    pub fn shape(&self) -> ContainerShape {
        self.kind.shape()
    }

    /// Key element type, `None` for non-associative containers.
    pub fn key(&self) -> Option<ElementSlot> {
        self.key
    }

    pub fn value(&self) -> ElementSlot {
        self.value
    }

    pub fn is_associative(&self) -> bool {
        self.key.is_some()
    }
}

impl fmt::Debug for ContainerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerFactory")
            .field("shape", &self.kind.shape())
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

/// Downcast a container argument, reporting the expected type on failure.
fn downcast<T: Any>(value: &dyn Any) -> std::result::Result<&T, ContainerError> {
    value
        .downcast_ref::<T>()
        .ok_or(ContainerError::ElementTypeMismatch {
            expected: std::any::type_name::<T>(),
        })
}

fn downcast_mut<T: Any>(value: &mut dyn Any) -> std::result::Result<&mut T, ContainerError> {
    value
        .downcast_mut::<T>()
        .ok_or(ContainerError::ElementTypeMismatch {
            expected: std::any::type_name::<T>(),
        })
}
