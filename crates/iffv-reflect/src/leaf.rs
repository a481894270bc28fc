// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Leaf (plain-data) types.
//!
//! Scalars carry a [`RawCodec`] that copies their native-endian bytes.
//! `String` is a leaf without one: the registry installs a length-prefixed
//! UTF-8 codec for it unless the built-in codecs are disabled.

use crate::error::CodecError;
use crate::format::CustomCodec;
use crate::identity::Reflect;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::any::{type_name, Any};
use std::io::{Read, Write};

/// Largest scalar width handled by [`NativeBytes`].
const MAX_SCALAR_WIDTH: usize = 16;

/// Raw byte codec of a plain-data leaf.
#[derive(Debug, Clone, Copy)]
pub struct RawCodec {
    pub width: usize,
    pub save: fn(&dyn Any, &mut dyn Write) -> Result<(), CodecError>,
    pub load: fn(&mut dyn Any, &mut dyn Read) -> Result<(), CodecError>,
}

impl RawCodec {
    /// Native-endian byte copy of `T`.
    pub fn native<T: NativeBytes>() -> Self {
        Self {
            width: T::WIDTH,
            save: save_native::<T>,
            load: load_native::<T>,
        }
    }
}

/// Scalar with a fixed native-endian byte image.
pub trait NativeBytes: Reflect + Copy {
    const WIDTH: usize;

    fn write_ne(&self, out: &mut [u8]);

    /// `None` when the bytes are not a valid `Self`.
    fn read_ne(bytes: &[u8]) -> Option<Self>;
}

fn save_native<T: NativeBytes>(value: &dyn Any, out: &mut dyn Write) -> Result<(), CodecError> {
    let value = value
        .downcast_ref::<T>()
        .ok_or_else(|| CodecError::ObjectTypeMismatch {
            expected: type_name::<T>().to_string(),
        })?;
    let mut buf = [0u8; MAX_SCALAR_WIDTH];
    value.write_ne(&mut buf[..T::WIDTH]);
    out.write_all(&buf[..T::WIDTH])?;
    Ok(())
}

fn load_native<T: NativeBytes>(slot: &mut dyn Any, input: &mut dyn Read) -> Result<(), CodecError> {
    let slot = slot
        .downcast_mut::<T>()
        .ok_or_else(|| CodecError::ObjectTypeMismatch {
            expected: type_name::<T>().to_string(),
        })?;
    let mut buf = [0u8; MAX_SCALAR_WIDTH];
    input.read_exact(&mut buf[..T::WIDTH])?;
    *slot = T::read_ne(&buf[..T::WIDTH])
        .ok_or_else(|| CodecError::InvalidData(format!("bad {} bytes", type_name::<T>())))?;
    Ok(())
}

macro_rules! impl_native_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl NativeBytes for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn write_ne(&self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }

                fn read_ne(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$ty>::from_ne_bytes)
                }
            }

            impl Reflect for $ty {
                fn raw_codec() -> Option<RawCodec> {
                    Some(RawCodec::native::<$ty>())
                }
            }
        )*
    };
}

impl_native_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl NativeBytes for bool {
    const WIDTH: usize = 1;

    fn write_ne(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    fn read_ne(bytes: &[u8]) -> Option<Self> {
        match bytes.first() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        }
    }
}

impl Reflect for bool {
    fn raw_codec() -> Option<RawCodec> {
        Some(RawCodec::native::<bool>())
    }
}

impl NativeBytes for char {
    const WIDTH: usize = 4;

    fn write_ne(&self, out: &mut [u8]) {
        out.copy_from_slice(&u32::from(*self).to_ne_bytes());
    }

    fn read_ne(bytes: &[u8]) -> Option<Self> {
        let bits = u32::from_ne_bytes(bytes.try_into().ok()?);
        char::from_u32(bits)
    }
}

impl Reflect for char {
    fn raw_codec() -> Option<RawCodec> {
        Some(RawCodec::native::<char>())
    }
}

impl Reflect for String {}

/// Built-in `String` codec: u32 little-endian byte length + UTF-8 bytes.
pub const STRING_CODEC: CustomCodec = CustomCodec::new(save_string, load_string);

fn save_string(out: &mut dyn Write, _version: u32, value: &dyn Any) -> Result<(), CodecError> {
    let text = value
        .downcast_ref::<String>()
        .ok_or_else(|| CodecError::ObjectTypeMismatch {
            expected: "String".to_string(),
        })?;
    let len = u32::try_from(text.len())
        .map_err(|_| CodecError::InvalidData(format!("string of {} bytes", text.len())))?;
    out.write_u32::<LittleEndian>(len)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

fn load_string(input: &mut dyn Read, _version: u32, slot: &mut dyn Any) -> Result<(), CodecError> {
    let slot = slot
        .downcast_mut::<String>()
        .ok_or_else(|| CodecError::ObjectTypeMismatch {
            expected: "String".to_string(),
        })?;
    let len = input.read_u32::<LittleEndian>()? as usize;
    let mut bytes = Vec::new();
    input.take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(CodecError::InvalidData(format!(
            "string truncated at {} of {} bytes",
            bytes.len(),
            len
        )));
    }
    *slot = String::from_utf8(bytes).map_err(|e| CodecError::InvalidData(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip<T: NativeBytes + PartialEq + std::fmt::Debug>(value: T) {
        let codec = RawCodec::native::<T>();
        let mut out = Vec::new();
        (codec.save)(&value, &mut out).unwrap();
        assert_eq!(out.len(), codec.width);

        let mut back = T::default();
        (codec.load)(&mut back, &mut Cursor::new(out)).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_scalars_are_native_endian() {
        let codec = RawCodec::native::<u32>();
        let mut out = Vec::new();
        (codec.save)(&0x0102_0304u32, &mut out).unwrap();
        assert_eq!(out, 0x0102_0304u32.to_ne_bytes());

        roundtrip(-7i16);
        roundtrip(1.5f64);
        roundtrip(true);
        roundtrip('λ');
    }

    #[test]
    fn test_invalid_bool_rejected() {
        let codec = RawCodec::native::<bool>();
        let mut slot = false;
        let err = (codec.load)(&mut slot, &mut Cursor::new(vec![2u8])).unwrap_err();
        assert!(matches!(err, CodecError::InvalidData(_)));
    }

    #[test]
    fn test_wrong_slot_type() {
        let codec = RawCodec::native::<u16>();
        let mut out = Vec::new();
        let err = (codec.save)(&1u32, &mut out).unwrap_err();
        assert!(matches!(err, CodecError::ObjectTypeMismatch { .. }));
    }

    #[test]
    fn test_string_codec() {
        let mut out = Vec::new();
        (STRING_CODEC.save)(&mut out, 1, &String::from("héllo")).unwrap();
        assert_eq!(&out[..4], &6u32.to_le_bytes());

        let mut back = String::new();
        (STRING_CODEC.load)(&mut Cursor::new(out), 1, &mut back).unwrap();
        assert_eq!(back, "héllo");
    }

    #[test]
    fn test_string_truncated() {
        let mut data = 10u32.to_le_bytes().to_vec();
        data.extend_from_slice(b"abc");
        let mut back = String::new();
        let err = (STRING_CODEC.load)(&mut Cursor::new(data), 1, &mut back).unwrap_err();
        assert!(matches!(err, CodecError::InvalidData(_)));
    }
}
