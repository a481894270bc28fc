// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! IFFV framing.
//!
//! # Object block
//!
//! ```text
//! +------------------------------------------------------------+
//! | field_count (i32 LE)                                        |
//! +------------------------------------------------------------+
//! | name_hash (u32 LE) | version (u32 LE) | data_size (u32 LE) |
//! | payload (data_size bytes)                                   |
//! +------------------------------------------------------------+
//! | ... field_count entries ...                                 |
//! +------------------------------------------------------------+
//! | base type object blocks, in link order                      |
//! +------------------------------------------------------------+
//! ```
//!
//! `data_size` is written as a placeholder and patched once the payload is
//! out, so the output stream must be seekable.

use crate::error::CodecError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Per-field IFFV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldHeader {
    pub name_hash: u32,
    pub version: u32,
    /// Payload bytes following the header.
    pub data_size: u32,
}

impl FieldHeader {
    /// Encoded header size.
    pub const SIZE: u64 = 12;

    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_u32::<LittleEndian>(self.name_hash)?;
        out.write_u32::<LittleEndian>(self.version)?;
        out.write_u32::<LittleEndian>(self.data_size)
    }

    pub fn read<R: Read>(input: &mut R) -> io::Result<Self> {
        Ok(Self {
            name_hash: input.read_u32::<LittleEndian>()?,
            version: input.read_u32::<LittleEndian>()?,
            data_size: input.read_u32::<LittleEndian>()?,
        })
    }
}

/// Header written ahead of its payload, awaiting the final size.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingHeader {
    payload_start: u64,
}

impl PendingHeader {
    /// Write a header with a zero size and remember where the payload starts.
    pub(crate) fn begin<W: Write + Seek>(
        out: &mut W,
        name_hash: u32,
        version: u32,
    ) -> io::Result<Self> {
        FieldHeader {
            name_hash,
            version,
            data_size: 0,
        }
        .write(out)?;
        Ok(Self {
            payload_start: out.stream_position()?,
        })
    }

    /// Backpatch the size slot with the bytes written since `begin`.
    pub(crate) fn finish<W: Write + Seek>(self, out: &mut W) -> Result<u32, CodecError> {
        let end = out.stream_position()?;
        let size = u32::try_from(end - self.payload_start).map_err(|_| {
            CodecError::InvalidData(format!(
                "field payload of {} bytes",
                end - self.payload_start
            ))
        })?;
        out.seek(SeekFrom::Start(self.payload_start - 4))?;
        out.write_u32::<LittleEndian>(size)?;
        out.seek(SeekFrom::Start(end))?;
        Ok(size)
    }
}

/// One field entry found by [`inspect_iffv`].
#[derive(Debug, Clone, Serialize)]
pub struct FieldEntry {
    pub header: FieldHeader,
    /// Stream offset of the payload.
    pub payload_offset: u64,
}

/// One object block found by [`inspect_iffv`].
#[derive(Debug, Clone, Serialize)]
pub struct ObjectBlock {
    /// Stream offset of the field count.
    pub offset: u64,
    pub fields: Vec<FieldEntry>,
}

/// Walk consecutive IFFV object blocks without any type information.
///
/// Only the top level of each block is listed: nested objects and base
/// blocks are opaque. A base block following its derived block shows up as
/// the next block. Stops cleanly at end of stream.
pub fn inspect_iffv<R: Read + Seek>(input: &mut R) -> Result<Vec<ObjectBlock>, CodecError> {
    let start = input.stream_position()?;
    let end = input.seek(SeekFrom::End(0))?;
    input.seek(SeekFrom::Start(start))?;

    let mut blocks = Vec::new();
    let mut offset = start;
    while offset < end {
        let count = input.read_i32::<LittleEndian>()?;
        if count < 0 {
            return Err(CodecError::InvalidData(format!(
                "negative field count {count} at offset {offset}"
            )));
        }

        let mut fields = Vec::with_capacity(count.min(1024) as usize);
        for _ in 0..count {
            let header = FieldHeader::read(input)?;
            let payload_offset = input.stream_position()?;
            let next = payload_offset + u64::from(header.data_size);
            if next > end {
                return Err(CodecError::InvalidData(format!(
                    "field {:#010x} runs past end of stream",
                    header.name_hash
                )));
            }
            input.seek(SeekFrom::Start(next))?;
            fields.push(FieldEntry {
                header,
                payload_offset,
            });
        }

        blocks.push(ObjectBlock { offset, fields });
        offset = input.stream_position()?;
    }
    Ok(blocks)
}
