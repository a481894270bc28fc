// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serialization formats and custom codec slots.

use crate::error::CodecError;
use std::any::Any;
use std::io::{Read, Write};

/// Serialization method.
///
/// `Text` only exists as an override slot; the binary codec refuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Fields back to back in hash order, no framing.
    Plain,
    /// Field count + a header per field (hash, version, data size).
    Iffv,
    /// Reserved for a textual format.
    Text,
}

impl Format {
    /// Number of override slots per type or field.
    pub const COUNT: usize = 3;

    const fn slot(self) -> usize {
        match self {
            Format::Plain => 0,
            Format::Iffv => 1,
            Format::Text => 2,
        }
    }
}

/// Writes one value. The `u32` argument is the version of the field being
/// written (the default field version for collection elements and roots).
pub type SaveFn = fn(&mut dyn Write, u32, &dyn Any) -> Result<(), CodecError>;

/// Reads one value into an existing slot.
pub type LoadFn = fn(&mut dyn Read, u32, &mut dyn Any) -> Result<(), CodecError>;

/// User-supplied save/load pair replacing the default encoding of a type or
/// of a single field.
#[derive(Debug, Clone, Copy)]
pub struct CustomCodec {
    pub save: SaveFn,
    pub load: LoadFn,
}

impl CustomCodec {
    pub const fn new(save: SaveFn, load: LoadFn) -> Self {
        Self { save, load }
    }
}

/// One optional [`CustomCodec`] per [`Format`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecTable([Option<CustomCodec>; Format::COUNT]);

impl CodecTable {
    pub fn get(&self, format: Format) -> Option<&CustomCodec> {
        self.0[format.slot()].as_ref()
    }

    pub fn set(&mut self, format: Format, codec: CustomCodec) {
        self.0[format.slot()] = Some(codec);
    }

    pub fn clear(&mut self, format: Format) {
        self.0[format.slot()] = None;
    }
}
