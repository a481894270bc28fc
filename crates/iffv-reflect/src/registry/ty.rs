// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type entries.

use super::field::{BaseLink, Field};
use crate::container::ContainerFactory;
use crate::error::RegistryError;
use crate::format::{CodecTable, CustomCodec, Format};
use crate::identity::{ConstructFn, TypeInfo};
use crate::leaf::RawCodec;
use crate::name::{hash_name, Name};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// Registered type: identity, field table ordered by name hash, base links
/// and codec overrides.
pub struct Type {
    name: Name,
    size: usize,
    construct: Option<ConstructFn>,
    raw: Option<RawCodec>,
    container: Option<ContainerFactory>,
    pub(super) fields: BTreeMap<u32, Field>,
    pub(super) bases: Vec<BaseLink>,
    codecs: CodecTable,
}

impl Type {
    pub(super) fn new(info: &TypeInfo, container: Option<ContainerFactory>) -> Self {
        Self {
            name: info.name.clone(),
            size: info.value_size(),
            construct: info.constructor(),
            raw: info.raw_codec(),
            container,
            fields: BTreeMap::new(),
            bases: Vec::new(),
            codecs: CodecTable::default(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Byte size of a value of this type.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Fields in ascending name-hash order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.values()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Look a field up by its name hash.
    pub fn field_by_hash(&self, hash: u32) -> Option<&Field> {
        self.fields.get(&hash)
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields
            .get(&hash_name(name))
            .filter(|field| field.name().text() == name)
    }

    /// Strict field lookup.
    pub fn field(&self, name: &str) -> Result<&Field, RegistryError> {
        self.find_field(name)
            .ok_or_else(|| RegistryError::FieldNotRegistered {
                type_name: self.name.to_string(),
                field: name.to_string(),
            })
    }

    pub fn bases(&self) -> &[BaseLink] {
        &self.bases
    }

    pub fn container(&self) -> Option<&ContainerFactory> {
        self.container.as_ref()
    }

    pub fn raw_codec(&self) -> Option<&RawCodec> {
        self.raw.as_ref()
    }

    /// Type-level codec override for `format`.
    pub fn codec(&self, format: Format) -> Option<&CustomCodec> {
        self.codecs.get(format)
    }

    pub(super) fn set_codec(&mut self, format: Format, codec: CustomCodec) {
        self.codecs.set(format, codec);
    }

    /// No registered fields and no bases.
    pub fn is_leaf(&self) -> bool {
        self.fields.is_empty() && self.bases.is_empty()
    }

    /// Default-construct a value of this type.
    pub fn construct(&self) -> Option<Box<dyn Any>> {
        self.construct.map(|construct| construct())
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name.text())
            .field("size", &self.size)
            .field("container", &self.container)
            .field("fields", &self.fields.values().collect::<Vec<_>>())
            .field("bases", &self.bases)
            .finish()
    }
}
