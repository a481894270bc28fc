// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type reflection + versioned binary serialization.
//!
//! - [`Reflect`] / [`describe`]: compile-time identity of a type
//! - [`container`]: type-erased iteration over arrays, sequences, maps
//! - [`TypeRegistry`]: runtime field tables, base links, codec overrides
//! - [`codec`]: PLAIN and IFFV binary formats over any seekable stream
//!
//! # Quick Start
//!
//! ```ignore
//! use iffv_reflect::{codec, FieldInfo, Format, Reflect, TypeRegistry};
//!
//! #[derive(Default)]
//! struct Vec2 { x: f32, y: f32 }
//! impl Reflect for Vec2 {}
//!
//! let mut registry = TypeRegistry::new();
//! registry.set_type_fields::<Vec2>(vec![
//!     FieldInfo::new("x", |v: &Vec2| &v.x, |v: &mut Vec2| &mut v.x),
//!     FieldInfo::new("y", |v: &Vec2| &v.y, |v: &mut Vec2| &mut v.y),
//! ])?;
//!
//! let bytes = codec::to_bytes(&registry, Format::Iffv, &Vec2 { x: 1.0, y: 2.0 })?;
//! let back: Vec2 = codec::from_bytes(&registry, Format::Iffv, &bytes)?;
//! ```
//!
//! # Format Comparison
//!
//! | Feature | PLAIN | IFFV |
//! |---------|-------|------|
//! | Field framing | [X] | [OK] |
//! | Added/removed fields | [X] | [OK] |
//! | Per-field versions | [X] | [OK] |
//! | Size overhead | none | 4 + 12 per field |

pub mod codec;
pub mod config;
pub mod container;
pub mod error;
pub mod format;
pub mod identity;
pub mod leaf;
pub mod name;
pub mod registry;

pub use codec::{decode, encode, from_bytes, inspect_iffv, to_bytes, FieldHeader};
pub use config::{CodecConfig, RegistryConfig};
pub use container::{ContainerKind, ContainerShape, ReadIterator, WriteIterator};
pub use error::{CodecError, ContainerError, Error, RegistryError, Result};
pub use format::{CustomCodec, Format};
pub use identity::{describe, Reflect, TypeInfo};
pub use name::{hash_name, Name};
pub use registry::{BaseInfo, Field, FieldAttr, FieldInfo, Type, TypeHandle, TypeRegistry};
