// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types.
//!
//! Registry and container errors report contract violations by the calling
//! code (a type that was never registered, an iterator used past its end).
//! Codec errors cover stream failures and payloads the codec cannot express.
//! Unknown or outdated IFFV fields are not errors at all.

use crate::format::Format;
use std::io;
use thiserror::Error;

/// Type/field registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Type not registered: {name}")]
    TypeNotRegistered { name: String },

    #[error("Field {field} not registered on type {type_name}")]
    FieldNotRegistered { type_name: String, field: String },

    #[error("Type {type_name} already has {capacity} base types")]
    BaseTypeCapacityExceeded { type_name: String, capacity: usize },

    #[error("Fields {first} and {second} of {type_name} share hash {hash:#010x}")]
    FieldHashCollision {
        type_name: String,
        first: String,
        second: String,
        hash: u32,
    },

    #[error("Accessor for {field} reads {owner}, not {type_name}")]
    AccessorMismatch {
        type_name: String,
        field: String,
        owner: &'static str,
    },
}

/// Container abstraction contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("Iterator exhausted")]
    IteratorExhausted,

    #[error("Container has no keys")]
    NotAssociative,

    #[error("Container does not support positional append")]
    NotASequence,

    #[error("Fixed container capacity {capacity} exceeded")]
    CapacityExceeded { capacity: usize },

    #[error("Element is not a {expected}")]
    ElementTypeMismatch { expected: &'static str },
}

/// Binary codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("No binary codec for format {0:?}")]
    UnsupportedFormat(Format),

    #[error("Type {type_name} has no fields, no container and no raw byte codec")]
    NotPlainData { type_name: String },

    #[error("Type {type_name} cannot be default-constructed")]
    NotConstructible { type_name: String },

    #[error("Object is not a {expected}")]
    ObjectTypeMismatch { expected: String },

    #[error("Collection count {count} exceeds limit {limit}")]
    CollectionTooLarge { count: u64, limit: u32 },

    #[error("Object nesting exceeds depth {limit}")]
    DepthExceeded { limit: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Codec(CodecError::Io(e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
