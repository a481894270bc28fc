// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry and codec configuration.
//!
//! Constants live here and nowhere else; `RegistryConfig` and `CodecConfig`
//! carry the runtime-tunable limits.

/// Version assigned to a field unless the registration overrides it.
pub const DEFAULT_FIELD_VERSION: u32 = 1;

/// Default number of base types a type may inherit from.
pub const MAX_BASE_TYPES: usize = 3;

/// Largest collection count accepted while decoding.
pub const DEFAULT_MAX_COLLECTION_LEN: u32 = 1 << 24;

/// Deepest object nesting walked by the codec.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Type registry configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum number of base-type links per type.
    pub max_base_types: usize,

    /// Install the built-in `String` codecs on construction.
    pub builtin_codecs: bool,
}

impl RegistryConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self {
            max_base_types: MAX_BASE_TYPES,
            builtin_codecs: true,
        }
    }

    /// Set the base-type capacity.
    pub fn max_base_types(mut self, max: usize) -> Self {
        self.max_base_types = max;
        self
    }

    /// Enable or disable the built-in codecs.
    pub fn builtin_codecs(mut self, enabled: bool) -> Self {
        self.builtin_codecs = enabled;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Codec limits applied while walking an object graph.
#[derive(Debug, Clone, Copy)]
pub struct CodecConfig {
    /// Reject decoded collection counts above this value.
    pub max_collection_len: u32,

    /// Reject object graphs nested deeper than this.
    pub max_depth: usize,
}

impl CodecConfig {
    /// Create a config with defaults.
    pub const fn new() -> Self {
        Self {
            max_collection_len: DEFAULT_MAX_COLLECTION_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the collection count limit.
    pub const fn max_collection_len(mut self, max: u32) -> Self {
        self.max_collection_len = max;
        self
    }

    /// Set the nesting limit.
    pub const fn max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_config_builder() {
        let config = RegistryConfig::new().max_base_types(5).builtin_codecs(false);
        assert_eq!(config.max_base_types, 5);
        assert!(!config.builtin_codecs);
        assert_eq!(RegistryConfig::default().max_base_types, MAX_BASE_TYPES);
    }

    #[test]
    fn test_codec_config_builder() {
        let config = CodecConfig::new().max_collection_len(16).max_depth(4);
        assert_eq!(config.max_collection_len, 16);
        assert_eq!(config.max_depth, 4);
    }
}
