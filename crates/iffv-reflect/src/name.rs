// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hashed names.
//!
//! A [`Name`] pairs display text with a 32-bit CRC-32 hash. Equality,
//! ordering and hashing look at the hash only: the hash is what travels on
//! the wire (IFFV field headers) and what orders a type's field table.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Display text + 32-bit hash identity pair.
#[derive(Debug, Clone)]
pub struct Name {
    text: Cow<'static, str>,
    hash: u32,
}

impl Name {
    /// Create a name, hashing its text.
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        let text = text.into();
        let hash = hash_name(&text);
        Self { text, hash }
    }

    /// Create a name known only by its hash (e.g. read back from a header).
    pub const fn from_hash(hash: u32) -> Self {
        Self {
            text: Cow::Borrowed(""),
            hash,
        }
    }

    /// Display text (empty for hash-only names).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 32-bit wire hash.
    pub const fn hash(&self) -> u32 {
        self.hash
    }
}

/// CRC-32 (IEEE) of the UTF-8 bytes of `text`.
pub fn hash_name(text: &str) -> u32 {
    crc32fast::hash(text.as_bytes())
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Name {}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "#{:08x}", self.hash)
        } else {
            f.write_str(&self.text)
        }
    }
}

impl From<&'static str> for Name {
    fn from(text: &'static str) -> Self {
        Self::new(text)
    }
}
