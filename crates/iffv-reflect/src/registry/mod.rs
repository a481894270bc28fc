// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type/field registry.
//!
//! The [`TypeRegistry`] owns one [`Type`] per distinct described type. Entries
//! are created lazily from a [`TypeInfo`], live as long as the registry and
//! are addressed by [`TypeHandle`]. Nothing is global: build a registry,
//! register fields and bases, then hand it to the codec by shared reference.
//!
//! ```ignore
//! let mut registry = TypeRegistry::new();
//! registry.set_type_fields::<Vec2>(vec![
//!     FieldInfo::new("x", |v: &Vec2| &v.x, |v: &mut Vec2| &mut v.x),
//!     FieldInfo::new("y", |v: &Vec2| &v.y, |v: &mut Vec2| &mut v.y),
//! ])?;
//! ```
//!
//! Field tables are keyed by field-name hash, so a derived type's fields, its
//! base's fields and the link between them can be registered in any order.

mod field;
mod ty;

pub use field::{BaseInfo, BaseLink, Field, FieldAttr, FieldInfo, MemberAccess};
pub use ty::Type;

use crate::config::RegistryConfig;
use crate::container::{ContainerFactory, ContainerKind, ElementSlot};
use crate::error::RegistryError;
use crate::format::{CustomCodec, Format};
use crate::identity::{describe, Reflect, TypeInfo};
use crate::leaf::STRING_CODEC;
use crate::name::hash_name;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::trace;

/// Index of a [`Type`] inside its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(u32);

impl TypeHandle {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// Registry of runtime type entries.
pub struct TypeRegistry {
    config: RegistryConfig,
    types: Vec<Type>,
    by_name: HashMap<String, TypeHandle>,
}

impl TypeRegistry {
    /// Registry with the default configuration and built-in codecs.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let mut registry = Self {
            config,
            types: Vec::new(),
            by_name: HashMap::new(),
        };
        if registry.config.builtin_codecs {
            let installed = registry.install_builtin_codecs();
            debug_assert!(installed.is_ok(), "String codecs: {installed:?}");
        }
        registry
    }

    fn install_builtin_codecs(&mut self) -> Result<(), RegistryError> {
        let string = self.get_or_create(&describe::<String>())?;
        for format in [Format::Plain, Format::Iffv] {
            string.set_codec(format, STRING_CODEC);
        }
        Ok(())
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All entries, in creation order.
    pub fn types(&self) -> impl Iterator<Item = (TypeHandle, &Type)> + '_ {
        self.types
            .iter()
            .enumerate()
            .map(|(index, ty)| (TypeHandle(index as u32), ty))
    }

    /// Entry behind `handle`.
    ///
    /// Handles are only minted by this registry and entries are never
    /// removed, so any handle it returned stays valid.
    pub fn type_at(&self, handle: TypeHandle) -> &Type {
        &self.types[handle.index()]
    }

    /// Entry behind a handle of unknown origin.
    pub fn checked_type_at(&self, handle: TypeHandle) -> Result<&Type, RegistryError> {
        self.types
            .get(handle.index())
            .ok_or_else(|| RegistryError::TypeNotRegistered {
                name: handle.to_string(),
            })
    }

    /// Handle of an existing entry.
    pub fn lookup(&self, info: &TypeInfo) -> Option<TypeHandle> {
        self.by_name.get(info.name.text()).copied()
    }

    /// Strict lookup.
    pub fn get(&self, info: &TypeInfo) -> Result<&Type, RegistryError> {
        self.handle(info).map(|handle| self.type_at(handle))
    }

    /// Strict handle lookup.
    pub fn handle(&self, info: &TypeInfo) -> Result<TypeHandle, RegistryError> {
        self.lookup(info)
            .ok_or_else(|| RegistryError::TypeNotRegistered {
                name: display_name(info),
            })
    }

    /// Non-strict lookup: creates the entry on miss.
    pub fn get_or_create(&mut self, info: &TypeInfo) -> Result<&mut Type, RegistryError> {
        let handle = self.resolve(info)?;
        Ok(&mut self.types[handle.index()])
    }

    /// Handle of the entry for `info`, creating it on miss.
    pub fn resolve(&mut self, info: &TypeInfo) -> Result<TypeHandle, RegistryError> {
        if info.is_none() {
            return Err(RegistryError::TypeNotRegistered {
                name: display_name(info),
            });
        }
        match self.lookup(info) {
            Some(handle) => Ok(handle),
            None => self.create(info),
        }
    }

    fn create(&mut self, info: &TypeInfo) -> Result<TypeHandle, RegistryError> {
        let container = match info.container_kind() {
            Some(kind) => Some(self.container_factory(kind)?),
            None => None,
        };

        let handle = TypeHandle(self.types.len() as u32);
        self.types.push(Type::new(info, container));
        self.by_name.insert(info.name.text().to_string(), handle);
        trace!(
            "Registered type {} as {} (hash {:#010x})",
            info.name,
            handle,
            info.name.hash()
        );
        Ok(handle)
    }

    fn container_factory(
        &mut self,
        kind: Box<dyn ContainerKind>,
    ) -> Result<ContainerFactory, RegistryError> {
        let key = match kind.key_type() {
            Some(info) => Some(ElementSlot {
                ty: self.resolve(&info)?,
                is_pointer: info.is_pointer,
            }),
            None => None,
        };
        let value_info = kind.value_type();
        let value = ElementSlot {
            ty: self.resolve(&value_info)?,
            is_pointer: value_info.is_pointer,
        };
        Ok(ContainerFactory::new(kind, key, value))
    }

    /// Replace the field table of `info`'s entry.
    ///
    /// Element types are resolved eagerly. The previous table is discarded
    /// even when the new one is empty.
    pub fn set_fields(
        &mut self,
        info: &TypeInfo,
        fields: Vec<FieldInfo>,
    ) -> Result<&mut Type, RegistryError> {
        let handle = self.resolve(info)?;
        let type_name = info.name.text();

        let mut table: BTreeMap<u32, Field> = BTreeMap::new();
        for field_info in fields {
            let owner = field_info.access.owner();
            if owner != type_name {
                return Err(RegistryError::AccessorMismatch {
                    type_name: type_name.to_string(),
                    field: field_info.name.to_string(),
                    owner,
                });
            }

            let hash = field_info.name.hash();
            if let Some(existing) = table.get(&hash) {
                return Err(RegistryError::FieldHashCollision {
                    type_name: type_name.to_string(),
                    first: existing.name().to_string(),
                    second: field_info.name.to_string(),
                    hash,
                });
            }

            let element = self.resolve(&field_info.type_info)?;
            table.insert(hash, Field::new(field_info, element));
        }

        trace!("Set {} fields on {}", table.len(), info.name);
        let ty = &mut self.types[handle.index()];
        ty.fields = table;
        Ok(ty)
    }

    /// Link `base` as a base type of `derived`.
    pub fn inherits(&mut self, derived: &TypeInfo, base: BaseInfo) -> Result<(), RegistryError> {
        let owner = base.access.owner();
        if owner != derived.name.text() {
            return Err(RegistryError::AccessorMismatch {
                type_name: derived.name.to_string(),
                field: base.type_info.name.to_string(),
                owner,
            });
        }

        let handle = self.resolve(derived)?;
        let base_handle = self.resolve(&base.type_info)?;

        let capacity = self.config.max_base_types;
        let ty = &mut self.types[handle.index()];
        if ty.bases.len() >= capacity {
            return Err(RegistryError::BaseTypeCapacityExceeded {
                type_name: derived.name.to_string(),
                capacity,
            });
        }
        ty.bases.push(BaseLink::new(base, base_handle));
        trace!("{} inherits {}", derived.name, self.types[base_handle.index()].name());
        Ok(())
    }

    /// Install a type-level codec override.
    pub fn set_type_codec(
        &mut self,
        info: &TypeInfo,
        format: Format,
        codec: CustomCodec,
    ) -> Result<(), RegistryError> {
        self.get_or_create(info)?.set_codec(format, codec);
        Ok(())
    }

    /// Install a field-level codec override on an already registered field.
    pub fn set_field_codec(
        &mut self,
        info: &TypeInfo,
        field: &str,
        format: Format,
        codec: CustomCodec,
    ) -> Result<(), RegistryError> {
        let handle = self.handle(info)?;
        let ty = &mut self.types[handle.index()];
        match ty.fields.get_mut(&hash_name(field)) {
            Some(entry) if entry.name().text() == field => {
                entry.set_codec(format, codec);
                Ok(())
            }
            _ => Err(RegistryError::FieldNotRegistered {
                type_name: info.name.to_string(),
                field: field.to_string(),
            }),
        }
    }

    /// Entry of `T`, created on miss.
    pub fn register<T: Reflect>(&mut self) -> Result<TypeHandle, RegistryError> {
        self.resolve(&describe::<T>())
    }

    /// Strict lookup of `T`.
    pub fn type_of<T: Reflect>(&self) -> Result<&Type, RegistryError> {
        self.get(&describe::<T>())
    }

    /// [`set_fields`](Self::set_fields) for `T`.
    pub fn set_type_fields<T: Reflect>(
        &mut self,
        fields: Vec<FieldInfo>,
    ) -> Result<&mut Type, RegistryError> {
        self.set_fields(&describe::<T>(), fields)
    }

    /// [`inherits`](Self::inherits) for `D` embedding base `B`.
    pub fn inherit<D, B, G, M>(&mut self, get: G, get_mut: M) -> Result<(), RegistryError>
    where
        D: Reflect,
        B: Reflect,
        G: Fn(&D) -> &B + Send + Sync + 'static,
        M: Fn(&mut D) -> &mut B + Send + Sync + 'static,
    {
        self.inherits(&describe::<D>(), BaseInfo::new(get, get_mut))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("config", &self.config)
            .field("types", &self.types.len())
            .finish()
    }
}

fn display_name(info: &TypeInfo) -> String {
    if info.is_none() {
        "<none>".to_string()
    } else {
        info.name.to_string()
    }
}
