// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compile-time type identity.
//!
//! [`describe`] turns a static Rust type into a [`TypeInfo`]: hashed name,
//! pointer flag, byte size, plus the hooks the registry needs to build a
//! runtime entry for it (default constructor, container behavior, raw byte
//! codec). Pointer wrappers describe as their pointee with `is_pointer` set,
//! so `T` and `Box<T>` land on the same registry entry.

use crate::container::ContainerKind;
use crate::leaf::RawCodec;
use crate::name::Name;
use std::any::{type_name, Any};
use std::fmt;
use std::mem::size_of;

/// Default constructor producing an owned, type-erased value.
pub type ConstructFn = fn() -> Box<dyn Any>;

/// Container behavior factory.
pub type ContainerFn = fn() -> Option<Box<dyn ContainerKind>>;

/// A type that can be described, registered and serialized.
///
/// The default methods describe a plain record: named after
/// `std::any::type_name`, no container behavior, no raw byte codec. Records
/// only need an empty impl; their fields are registered at runtime.
pub trait Reflect: Any + Default {
    /// Identity of `Self`.
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>()
    }

    /// Container behavior, for element collections.
    fn container() -> Option<Box<dyn ContainerKind>> {
        None
    }

    /// Byte-copy codec, for plain-data leaves.
    fn raw_codec() -> Option<RawCodec> {
        None
    }
}

/// Describe `T`.
pub fn describe<T: Reflect>() -> TypeInfo {
    T::type_info()
}

/// Box a default `T` behind `dyn Any`.
pub fn construct_default<T: Reflect>() -> Box<dyn Any> {
    Box::<T>::default()
}

/// Static description of a type.
///
/// Equality compares (name hash, pointer flag, size) only.
#[derive(Clone)]
pub struct TypeInfo {
    pub name: Name,
    pub is_pointer: bool,
    pub size: usize,
    value_size: usize,
    construct: Option<ConstructFn>,
    container: Option<ContainerFn>,
    raw: Option<RawCodec>,
}

impl TypeInfo {
    /// Description of a value type.
    pub fn of<T: Reflect>() -> Self {
        Self {
            name: Name::new(type_name::<T>()),
            is_pointer: false,
            size: size_of::<T>(),
            value_size: size_of::<T>(),
            construct: Some(construct_default::<T>),
            container: Some(T::container),
            raw: T::raw_codec(),
        }
    }

    /// Pointer-to-`T` flavor of `T`'s description.
    pub fn pointer_to<T: Reflect>(pointer_size: usize) -> Self {
        Self {
            is_pointer: true,
            size: pointer_size,
            ..Self::of::<T>()
        }
    }

    /// Sentinel meaning "no type".
    pub const fn none() -> Self {
        Self {
            name: Name::from_hash(0),
            is_pointer: false,
            size: 0,
            value_size: 0,
            construct: None,
            container: None,
            raw: None,
        }
    }

    pub fn is_none(&self) -> bool {
        self.name.text().is_empty() && self.construct.is_none()
    }

    /// Size of the pointee for pointers, of the value otherwise.
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    pub fn constructor(&self) -> Option<ConstructFn> {
        self.construct
    }

    /// Fresh container behavior object, if the type is a container.
    pub fn container_kind(&self) -> Option<Box<dyn ContainerKind>> {
        self.container.and_then(|factory| factory())
    }

    pub fn raw_codec(&self) -> Option<RawCodec> {
        self.raw
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.is_pointer == other.is_pointer && self.size == other.size
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name.text())
            .field("hash", &format_args!("{:#010x}", self.name.hash()))
            .field("is_pointer", &self.is_pointer)
            .field("size", &self.size)
            .finish()
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::pointer_to::<T>(size_of::<Box<T>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        _a: u64,
    }

    impl Reflect for Sample {}

    #[test]
    fn test_describe_value() {
        let info = describe::<Sample>();
        assert!(info.name.text().ends_with("Sample"));
        assert!(!info.is_pointer);
        assert_eq!(info.size, 8);
        assert!(info.container_kind().is_none());
        assert!(info.raw_codec().is_none());
        assert_eq!(info, describe::<Sample>());
    }

    #[test]
    fn test_pointer_shares_name_with_pointee() {
        let value = describe::<Sample>();
        let pointer = describe::<Box<Sample>>();
        assert!(pointer.is_pointer);
        assert_eq!(pointer.name, value.name);
        assert_eq!(pointer.value_size(), value.size);
        assert_ne!(pointer, value);
    }

    #[test]
    fn test_none_sentinel() {
        let none = TypeInfo::none();
        assert!(none.is_none());
        assert!(!describe::<Sample>().is_none());
        assert!(none.constructor().is_none());
    }

    #[test]
    fn test_construct_default() {
        let boxed = construct_default::<Sample>();
        assert!(boxed.downcast_ref::<Sample>().is_some());
    }
}
