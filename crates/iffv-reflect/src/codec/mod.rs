// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary codec.
//!
//! Two wire formats share one walker:
//!
//! - [`Format::Plain`]: payloads back to back, fields in ascending name-hash
//!   order. Compact, but reader and writer must agree on the exact schema.
//! - [`Format::Iffv`]: each object starts with a field count and each field
//!   carries a [`FieldHeader`]. Readers skip fields they do not know, fields
//!   whose version differs from theirs, and resynchronize when a payload
//!   consumes a different byte count than its header declares.
//!
//! Framing integers (field counts, headers, collection counts) are
//! little-endian; scalar payloads are native-endian byte copies.
//!
//! # Example
//!
//! ```ignore
//! let bytes = codec::to_bytes(&registry, Format::Iffv, &value)?;
//! let back: Vec2 = codec::from_bytes(&registry, Format::Iffv, &bytes)?;
//! ```

mod header;
mod walker;


pub use header::{inspect_iffv, FieldEntry, FieldHeader, ObjectBlock};

use crate::config::CodecConfig;
use crate::error::Result;
use crate::format::Format;
use crate::identity::{describe, Reflect};
use crate::registry::{TypeHandle, TypeRegistry};
use std::any::Any;
use std::io::{Cursor, Read, Seek, Write};
use tracing::debug;
use walker::{Decoder, Encoder};

/// Encode `value` into `out`. `T` must be registered.
pub fn encode<T: Reflect, W: Write + Seek>(
    registry: &TypeRegistry,
    format: Format,
    value: &T,
    out: &mut W,
) -> Result<()> {
    encode_with_config(registry, format, CodecConfig::default(), value, out)
}

pub fn encode_with_config<T: Reflect, W: Write + Seek>(
    registry: &TypeRegistry,
    format: Format,
    config: CodecConfig,
    value: &T,
    out: &mut W,
) -> Result<()> {
    let handle = registry.handle(&describe::<T>())?;
    encode_object(registry, format, config, handle, value, out)
}

/// Encode a type-erased object of the registered type `handle`.
pub fn encode_object<W: Write + Seek>(
    registry: &TypeRegistry,
    format: Format,
    config: CodecConfig,
    handle: TypeHandle,
    object: &dyn Any,
    out: &mut W,
) -> Result<()> {
    let root = registry.checked_type_at(handle)?;
    debug!("Encoding {} as {:?}", root.name(), format);
    let mut encoder = Encoder::new(registry, format, config, out)?;
    encoder.save_object(handle, object)
}

/// Decode a fresh, default-constructed `T` from `input`.
pub fn decode<T: Reflect, R: Read + Seek>(
    registry: &TypeRegistry,
    format: Format,
    input: &mut R,
) -> Result<T> {
    decode_with_config(registry, format, CodecConfig::default(), input)
}

pub fn decode_with_config<T: Reflect, R: Read + Seek>(
    registry: &TypeRegistry,
    format: Format,
    config: CodecConfig,
    input: &mut R,
) -> Result<T> {
    let mut value = T::default();
    decode_into_with_config(registry, format, config, &mut value, input)?;
    Ok(value)
}

/// Decode into an existing value.
///
/// Fields absent from the stream keep their current value. Sequences and
/// maps are appended to rather than cleared.
pub fn decode_into<T: Reflect, R: Read + Seek>(
    registry: &TypeRegistry,
    format: Format,
    value: &mut T,
    input: &mut R,
) -> Result<()> {
    decode_into_with_config(registry, format, CodecConfig::default(), value, input)
}

pub fn decode_into_with_config<T: Reflect, R: Read + Seek>(
    registry: &TypeRegistry,
    format: Format,
    config: CodecConfig,
    value: &mut T,
    input: &mut R,
) -> Result<()> {
    let handle = registry.handle(&describe::<T>())?;
    decode_object(registry, format, config, handle, value, input)
}

/// Decode into a type-erased object of the registered type `handle`.
pub fn decode_object<R: Read + Seek>(
    registry: &TypeRegistry,
    format: Format,
    config: CodecConfig,
    handle: TypeHandle,
    object: &mut dyn Any,
    input: &mut R,
) -> Result<()> {
    let root = registry.checked_type_at(handle)?;
    debug!("Decoding {} as {:?}", root.name(), format);
    let mut decoder = Decoder::new(registry, format, config, input)?;
    decoder.load_object(handle, object)
}

/// Encode into a new buffer.
pub fn to_bytes<T: Reflect>(registry: &TypeRegistry, format: Format, value: &T) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    encode(registry, format, value, &mut out)?;
    Ok(out.into_inner())
}

/// Decode from a byte slice.
pub fn from_bytes<T: Reflect>(registry: &TypeRegistry, format: Format, bytes: &[u8]) -> Result<T> {
    decode(registry, format, &mut Cursor::new(bytes))
}
