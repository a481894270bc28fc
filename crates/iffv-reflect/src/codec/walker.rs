// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive object walker.
//!
//! Every value goes through the same selection chain:
//!
//! 1. pointer slot: empty payload, slot left untouched
//! 2. custom codec: field-level override, else type-level override
//! 3. container: u32 LE count, then key/value or value payloads
//! 4. leaf (no fields): raw native-endian bytes
//! 5. record: fields in hash order, then base-type blocks

use super::header::{FieldHeader, PendingHeader};
use crate::config::CodecConfig;
use crate::container::{ContainerFactory, ElementSlot};
use crate::error::{CodecError, Error, Result};
use crate::format::Format;
use crate::registry::{Field, Type, TypeHandle, TypeRegistry};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::any::Any;
use std::io::{Read, Seek, SeekFrom, Take, Write};
use tracing::{debug, trace, warn};

fn binary_format(format: Format) -> std::result::Result<Format, CodecError> {
    match format {
        Format::Plain | Format::Iffv => Ok(format),
        Format::Text => Err(CodecError::UnsupportedFormat(format)),
    }
}

fn type_mismatch(ty: &Type) -> CodecError {
    CodecError::ObjectTypeMismatch {
        expected: ty.name().to_string(),
    }
}

fn not_plain_data(ty: &Type) -> CodecError {
    CodecError::NotPlainData {
        type_name: ty.name().to_string(),
    }
}

/// Payload errors a matched IFFV field absorbs: the stored bytes do not have
/// the registered shape.
fn is_payload_mismatch(err: &Error) -> bool {
    matches!(
        err,
        Error::Container(_)
            | Error::Codec(
                CodecError::Io(_)
                    | CodecError::InvalidData(_)
                    | CodecError::CollectionTooLarge { .. }
            )
    )
}

/// Nesting guard shared by both walkers.
#[derive(Debug)]
struct Depth {
    current: usize,
    limit: usize,
}

impl Depth {
    fn new(limit: usize) -> Self {
        Self { current: 0, limit }
    }

    fn enter(&mut self) -> std::result::Result<(), CodecError> {
        if self.current >= self.limit {
            return Err(CodecError::DepthExceeded { limit: self.limit });
        }
        self.current += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

pub(crate) struct Encoder<'a, W> {
    registry: &'a TypeRegistry,
    format: Format,
    out: &'a mut W,
    depth: Depth,
}

impl<'a, W: Write + Seek> Encoder<'a, W> {
    pub(crate) fn new(
        registry: &'a TypeRegistry,
        format: Format,
        config: CodecConfig,
        out: &'a mut W,
    ) -> std::result::Result<Self, CodecError> {
        Ok(Self {
            registry,
            format: binary_format(format)?,
            out,
            depth: Depth::new(config.max_depth),
        })
    }

    pub(crate) fn save_object(&mut self, handle: TypeHandle, object: &dyn Any) -> Result<()> {
        self.depth.enter()?;
        let result = self.save_record(handle, object);
        self.depth.leave();
        result
    }

    fn save_record(&mut self, handle: TypeHandle, object: &dyn Any) -> Result<()> {
        let registry = self.registry;
        let ty = registry.type_at(handle);

        if self.format == Format::Iffv {
            let count = ty.fields().filter(|field| !field.is_transient()).count();
            let count = i32::try_from(count)
                .map_err(|_| CodecError::InvalidData(format!("{count} fields")))?;
            self.out.write_i32::<LittleEndian>(count)?;
        }

        for field in ty.fields().filter(|field| !field.is_transient()) {
            let value = field.get(object).ok_or_else(|| type_mismatch(ty))?;
            if self.format == Format::Iffv {
                let pending =
                    PendingHeader::begin(&mut *self.out, field.name().hash(), field.version())?;
                self.save_field(field, value)?;
                let size = pending.finish(&mut *self.out)?;
                trace!("Wrote {}.{} ({} bytes)", ty.name(), field.name(), size);
            } else {
                self.save_field(field, value)?;
            }
        }

        for base in ty.bases() {
            let part = base.get(object).ok_or_else(|| type_mismatch(ty))?;
            self.save_object(base.ty(), part)?;
        }
        Ok(())
    }

    fn save_field(&mut self, field: &Field, value: &dyn Any) -> Result<()> {
        if field.is_pointer() {
            debug!("Pointer field {} written as empty payload", field.name());
            return Ok(());
        }
        match field.codec(self.format) {
            Some(codec) => {
                (codec.save)(&mut *self.out, field.version(), value)?;
                Ok(())
            }
            None => self.save_payload(field.ty(), value, field.version()),
        }
    }

    fn save_element(&mut self, slot: ElementSlot, value: &dyn Any, version: u32) -> Result<()> {
        if slot.is_pointer {
            return Ok(());
        }
        self.save_payload(slot.ty, value, version)
    }

    fn save_payload(&mut self, handle: TypeHandle, value: &dyn Any, version: u32) -> Result<()> {
        let registry = self.registry;
        let ty = registry.type_at(handle);

        if let Some(codec) = ty.codec(self.format) {
            (codec.save)(&mut *self.out, version, value)?;
        } else if let Some(factory) = ty.container() {
            self.save_collection(factory, value, version)?;
        } else if ty.is_leaf() {
            let raw = ty.raw_codec().ok_or_else(|| not_plain_data(ty))?;
            (raw.save)(value, &mut *self.out)?;
        } else {
            self.save_object(handle, value)?;
        }
        Ok(())
    }

    fn save_collection(
        &mut self,
        factory: &ContainerFactory,
        container: &dyn Any,
        version: u32,
    ) -> Result<()> {
        self.depth.enter()?;
        let result = factory.kind().with_reader(container, &mut |iter| {
            let count = u32::try_from(iter.count()).map_err(|_| CodecError::CollectionTooLarge {
                count: iter.count() as u64,
                limit: u32::MAX,
            })?;
            self.out.write_u32::<LittleEndian>(count)?;

            while iter.is_valid() {
                if let Some(key) = factory.key() {
                    self.save_element(key, iter.key()?, version)?;
                }
                self.save_element(factory.value(), iter.value()?, version)?;
                iter.advance()?;
            }
            Ok(())
        });
        self.depth.leave();
        result
    }
}

pub(crate) struct Decoder<'a, R> {
    registry: &'a TypeRegistry,
    format: Format,
    config: CodecConfig,
    input: &'a mut R,
    depth: Depth,
    /// End offset of the IFFV field being decoded.
    field_end: Option<u64>,
}

impl<'a, R: Read + Seek> Decoder<'a, R> {
    pub(crate) fn new(
        registry: &'a TypeRegistry,
        format: Format,
        config: CodecConfig,
        input: &'a mut R,
    ) -> std::result::Result<Self, CodecError> {
        Ok(Self {
            registry,
            format: binary_format(format)?,
            config,
            input,
            depth: Depth::new(config.max_depth),
            field_end: None,
        })
    }

    pub(crate) fn load_object(&mut self, handle: TypeHandle, object: &mut dyn Any) -> Result<()> {
        self.depth.enter()?;
        let result = self.load_record(handle, object);
        self.depth.leave();
        result
    }

    fn load_record(&mut self, handle: TypeHandle, object: &mut dyn Any) -> Result<()> {
        let registry = self.registry;
        let ty = registry.type_at(handle);

        if self.format == Format::Iffv {
            self.load_tagged_fields(ty, object)?;
        } else {
            for field in ty.fields().filter(|field| !field.is_transient()) {
                let slot = field.get_mut(object).ok_or_else(|| type_mismatch(ty))?;
                self.load_field(field, slot)?;
            }
        }

        for base in ty.bases() {
            let part = base.get_mut(object).ok_or_else(|| type_mismatch(ty))?;
            self.load_object(base.ty(), part)?;
        }
        Ok(())
    }

    /// Match IFFV entries to registered fields by hash and version, skipping
    /// whatever does not match.
    fn load_tagged_fields(&mut self, ty: &Type, object: &mut dyn Any) -> Result<()> {
        let count = self.input.read_i32::<LittleEndian>()?;
        if count < 0 {
            return Err(
                CodecError::InvalidData(format!("negative field count {count} for {}", ty.name()))
                    .into(),
            );
        }

        for _ in 0..count {
            let header = FieldHeader::read(&mut *self.input)?;
            match ty.field_by_hash(header.name_hash) {
                Some(field) if field.version() == header.version && !field.is_transient() => {
                    let start = self.input.stream_position()?;
                    let expected = start + u64::from(header.data_size);
                    let slot = field.get_mut(object).ok_or_else(|| type_mismatch(ty))?;

                    let outer = self.field_end.replace(expected);
                    let loaded = self.load_field(field, slot);
                    self.field_end = outer;

                    match loaded {
                        Ok(()) => {
                            let end = self.input.stream_position()?;
                            if end != expected {
                                warn!(
                                    "Field {}.{} consumed {} bytes, header says {}; resyncing",
                                    ty.name(),
                                    field.name(),
                                    end as i64 - start as i64,
                                    header.data_size
                                );
                                self.input.seek(SeekFrom::Start(expected))?;
                            }
                        }
                        Err(err) if is_payload_mismatch(&err) => {
                            warn!(
                                "Field {}.{} does not match its {} stored bytes ({}); resyncing",
                                ty.name(),
                                field.name(),
                                header.data_size,
                                err
                            );
                            self.input.seek(SeekFrom::Start(expected))?;
                        }
                        Err(err) => return Err(err),
                    }
                }
                Some(field) => {
                    debug!(
                        "Skipping {}.{} (stored version {}, registered {}{})",
                        ty.name(),
                        field.name(),
                        header.version,
                        field.version(),
                        if field.is_transient() { ", transient" } else { "" }
                    );
                    self.skip(&header)?;
                }
                None => {
                    debug!(
                        "Skipping unknown field {:#010x} of {}",
                        header.name_hash,
                        ty.name()
                    );
                    self.skip(&header)?;
                }
            }
        }
        Ok(())
    }

    /// Input for one payload read, bounded by the enclosing IFFV field.
    fn bounded(&mut self) -> Result<Take<&mut R>> {
        let remaining = match self.field_end {
            Some(end) => end.saturating_sub(self.input.stream_position()?),
            None => u64::MAX,
        };
        Ok((&mut *self.input).take(remaining))
    }

    fn skip(&mut self, header: &FieldHeader) -> Result<()> {
        self.input
            .seek(SeekFrom::Current(i64::from(header.data_size)))?;
        Ok(())
    }

    fn load_field(&mut self, field: &Field, slot: &mut dyn Any) -> Result<()> {
        if field.is_pointer() {
            debug!("Pointer field {} left untouched", field.name());
            return Ok(());
        }
        match field.codec(self.format) {
            Some(codec) => {
                (codec.load)(&mut self.bounded()?, field.version(), slot)?;
                Ok(())
            }
            None => self.load_payload(field.ty(), slot, field.version()),
        }
    }

    fn load_element(&mut self, slot: ElementSlot, value: &mut dyn Any, version: u32) -> Result<()> {
        if slot.is_pointer {
            return Ok(());
        }
        self.load_payload(slot.ty, value, version)
    }

    fn load_payload(&mut self, handle: TypeHandle, slot: &mut dyn Any, version: u32) -> Result<()> {
        let registry = self.registry;
        let ty = registry.type_at(handle);

        if let Some(codec) = ty.codec(self.format) {
            (codec.load)(&mut self.bounded()?, version, slot)?;
        } else if let Some(factory) = ty.container() {
            self.load_collection(factory, slot, version)?;
        } else if ty.is_leaf() {
            let raw = ty.raw_codec().ok_or_else(|| not_plain_data(ty))?;
            (raw.load)(slot, &mut self.bounded()?)?;
        } else {
            self.load_object(handle, slot)?;
        }
        Ok(())
    }

    fn load_collection(
        &mut self,
        factory: &ContainerFactory,
        container: &mut dyn Any,
        version: u32,
    ) -> Result<()> {
        let count = self.bounded()?.read_u32::<LittleEndian>()?;
        if count > self.config.max_collection_len {
            return Err(CodecError::CollectionTooLarge {
                count: u64::from(count),
                limit: self.config.max_collection_len,
            }
            .into());
        }

        let registry = self.registry;
        self.depth.enter()?;
        let result = factory.kind().with_writer(container, &mut |writer| {
            match factory.key() {
                Some(key_slot) => {
                    let key_type = registry.type_at(key_slot.ty);
                    for _ in 0..count {
                        let mut key =
                            key_type
                                .construct()
                                .ok_or_else(|| CodecError::NotConstructible {
                                    type_name: key_type.name().to_string(),
                                })?;
                        self.load_element(key_slot, &mut *key, version)?;
                        let value = writer.insert_empty(&*key)?;
                        self.load_element(factory.value(), value, version)?;
                    }
                }
                None => {
                    for _ in 0..count {
                        let value = writer.append_empty()?;
                        self.load_element(factory.value(), value, version)?;
                    }
                }
            }
            Ok(())
        });
        self.depth.leave();
        result
    }
}
