//! Configuration for the record codec
//!
//! Centralized configuration with sensible defaults.

/// Codec configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Layout Configuration
    // -------------------------------------------------------------------------
    /// How `totalSize` is computed for fixed-width value types
    pub padding: PaddingMode,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    /// Largest key accepted on encode, decode and stream read (in bytes)
    pub max_key_size: usize,

    /// Largest length-prefixed value accepted (in bytes)
    pub max_value_size: usize,
}

/// Sizing rule for the `totalSize` header field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// `keyLength + 1 + V + 12` for every type. Fixed-width values leave a
    /// zeroed 4-byte gap at the end of the record, byte-compatible with
    /// existing data.
    #[default]
    Preserve,

    /// `totalSize` is exactly the number of bytes written. Readers of this
    /// crate accept both layouts, older readers that assume the gap do not.
    Compact,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            padding: PaddingMode::Preserve,
            max_key_size: 1024 * 1024,       // 1 MB
            max_value_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the padding mode
    pub fn padding(mut self, mode: PaddingMode) -> Self {
        self.config.padding = mode;
        self
    }

    /// Set the maximum key size (in bytes)
    pub fn max_key_size(mut self, size: usize) -> Self {
        self.config.max_key_size = size;
        self
    }

    /// Set the maximum value size (in bytes)
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
