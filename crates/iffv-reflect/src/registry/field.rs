// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field and base-type registration records.

use super::TypeHandle;
use crate::config::DEFAULT_FIELD_VERSION;
use crate::format::{CodecTable, CustomCodec, Format};
use crate::identity::{describe, Reflect, TypeInfo};
use crate::name::Name;
use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Field attribute flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct FieldAttr(pub u32);

impl FieldAttr {
    /// Not persisted by the binary codec.
    pub const TRANSIENT: Self = Self(0x0001);

    /// Empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check if flag is set
    pub const fn contains(self, flag: Self) -> bool {
        (self.0 & flag.0) == flag.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Type-erased projection from an owner object to one of its parts
/// (a field or an embedded base).
pub trait MemberAccess: Send + Sync {
    /// Type name of the owner this accessor reads.
    fn owner(&self) -> &'static str;

    /// `None` when `object` is not the owner type.
    fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any>;

    fn get_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct Accessor<S, T, G, M> {
    get: G,
    get_mut: M,
    _marker: PhantomData<fn(&S) -> &T>,
}

impl<S, T, G, M> MemberAccess for Accessor<S, T, G, M>
where
    S: Any,
    T: Any,
    G: Fn(&S) -> &T + Send + Sync,
    M: Fn(&mut S) -> &mut T + Send + Sync,
{
    fn owner(&self) -> &'static str {
        type_name::<S>()
    }

    fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        let owner = object.downcast_ref::<S>()?;
        Some((self.get)(owner))
    }

    fn get_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let owner = object.downcast_mut::<S>()?;
        Some((self.get_mut)(owner))
    }
}

fn boxed_accessor<S, T, G, M>(get: G, get_mut: M) -> Box<dyn MemberAccess>
where
    S: Any,
    T: Any,
    G: Fn(&S) -> &T + Send + Sync + 'static,
    M: Fn(&mut S) -> &mut T + Send + Sync + 'static,
{
    Box::new(Accessor {
        get,
        get_mut,
        _marker: PhantomData,
    })
}

/// Field registration record, consumed by
/// [`TypeRegistry::set_fields`](super::TypeRegistry::set_fields).
///
/// ```ignore
/// FieldInfo::new("x", |v: &Vec2| &v.x, |v: &mut Vec2| &mut v.x).version(2)
/// ```
pub struct FieldInfo {
    pub(super) name: Name,
    pub(super) type_info: TypeInfo,
    pub(super) access: Box<dyn MemberAccess>,
    pub(super) version: u32,
    pub(super) attributes: FieldAttr,
    pub(super) codecs: CodecTable,
}

impl FieldInfo {
    /// Describe field `name` of `S`, of type `T`, through a pair of
    /// accessors.
    pub fn new<S, T, G, M>(name: impl Into<Cow<'static, str>>, get: G, get_mut: M) -> Self
    where
        S: Any,
        T: Reflect,
        G: Fn(&S) -> &T + Send + Sync + 'static,
        M: Fn(&mut S) -> &mut T + Send + Sync + 'static,
    {
        Self {
            name: Name::new(name),
            type_info: describe::<T>(),
            access: boxed_accessor(get, get_mut),
            version: DEFAULT_FIELD_VERSION,
            attributes: FieldAttr::empty(),
            codecs: CodecTable::default(),
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn attributes(mut self, attributes: FieldAttr) -> Self {
        self.attributes = self.attributes.union(attributes);
        self
    }

    pub fn transient(self) -> Self {
        self.attributes(FieldAttr::TRANSIENT)
    }

    /// Field-level codec override for `format`.
    pub fn codec(mut self, format: Format, codec: CustomCodec) -> Self {
        self.codecs.set(format, codec);
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name.text())
            .field("type_info", &self.type_info)
            .field("version", &self.version)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Registered field of a type.
pub struct Field {
    name: Name,
    ty: TypeHandle,
    is_pointer: bool,
    size: usize,
    access: Box<dyn MemberAccess>,
    version: u32,
    attributes: FieldAttr,
    codecs: CodecTable,
}

impl Field {
    pub(super) fn new(info: FieldInfo, ty: TypeHandle) -> Self {
        Self {
            name: info.name,
            ty,
            is_pointer: info.type_info.is_pointer,
            size: info.type_info.size,
            access: info.access,
            version: info.version,
            attributes: info.attributes,
            codecs: info.codecs,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Registry entry of the field's value type (the pointee for pointers).
    pub fn ty(&self) -> TypeHandle {
        self.ty
    }

    pub fn is_pointer(&self) -> bool {
        self.is_pointer
    }

    /// Byte size of the field as declared.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn attributes(&self) -> FieldAttr {
        self.attributes
    }

    pub fn is_transient(&self) -> bool {
        self.attributes.contains(FieldAttr::TRANSIENT)
    }

    pub fn codec(&self, format: Format) -> Option<&CustomCodec> {
        self.codecs.get(format)
    }

    pub fn set_codec(&mut self, format: Format, codec: CustomCodec) {
        self.codecs.set(format, codec);
    }

    /// Borrow this field out of an owner object.
    pub fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        self.access.get(object)
    }

    pub fn get_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.access.get_mut(object)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name.text())
            .field("hash", &format_args!("{:#010x}", self.name.hash()))
            .field("ty", &self.ty)
            .field("is_pointer", &self.is_pointer)
            .field("version", &self.version)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Base-type registration record: projects a derived object onto its
/// embedded base.
pub struct BaseInfo {
    pub(super) type_info: TypeInfo,
    pub(super) access: Box<dyn MemberAccess>,
}

impl BaseInfo {
    pub fn new<D, B, G, M>(get: G, get_mut: M) -> Self
    where
        D: Any,
        B: Reflect,
        G: Fn(&D) -> &B + Send + Sync + 'static,
        M: Fn(&mut D) -> &mut B + Send + Sync + 'static,
    {
        Self {
            type_info: describe::<B>(),
            access: boxed_accessor(get, get_mut),
        }
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }
}

/// Registered base-type link.
pub struct BaseLink {
    ty: TypeHandle,
    access: Box<dyn MemberAccess>,
}

impl BaseLink {
    pub(super) fn new(info: BaseInfo, ty: TypeHandle) -> Self {
        Self {
            ty,
            access: info.access,
        }
    }

    pub fn ty(&self) -> TypeHandle {
        self.ty
    }

    pub fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        self.access.get(object)
    }

    pub fn get_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.access.get_mut(object)
    }
}

impl fmt::Debug for BaseLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseLink")
            .field("ty", &self.ty)
            .field("owner", &self.access.owner())
            .finish()
    }
}
