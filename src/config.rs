// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Codec and pipeline configuration.
//!
//! Both structs deserialize from TOML with every field optional:
//!
//! ```toml
//! encode_workers = 4
//! decode_workers = 8
//!
//! [steg]
//! use_header = true
//! use_transparent = false
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default worker count for either direction of the frame pipeline.
pub const DEFAULT_WORKERS: usize = 8;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML syntax or type error.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Parsed values are out of range.
    #[error("invalid config: {0}")]
    Validation(String),
}

/// Options for a single-carrier codec session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegConfig {
    /// Write and expect the 8-byte signature + length header.
    pub use_header: bool,
    /// Also use fully transparent pixels. Off by default, so transparent
    /// areas stay byte-identical.
    pub use_transparent: bool,
}

impl Default for StegConfig {
    fn default() -> Self {
        Self { use_header: true, use_transparent: false }
    }
}

impl StegConfig {
    pub fn with_header(mut self, use_header: bool) -> Self {
        self.use_header = use_header;
        self
    }

    pub fn with_transparent(mut self, use_transparent: bool) -> Self {
        self.use_transparent = use_transparent;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

/// Options for the frame-parallel pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Worker threads for encoding. 1 processes frames sequentially on the
    /// caller's thread.
    pub encode_workers: usize,
    /// Worker threads for decoding and detection.
    pub decode_workers: usize,
    /// Per-frame codec options.
    pub steg: StegConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { encode_workers: DEFAULT_WORKERS, decode_workers: DEFAULT_WORKERS, steg: StegConfig::default() }
    }
}

impl PipelineConfig {
    /// Same worker count in both directions.
    pub fn with_workers(self, workers: usize) -> Self {
        self.with_encode_workers(workers).with_decode_workers(workers)
    }

    pub fn with_encode_workers(mut self, workers: usize) -> Self {
        self.encode_workers = workers;
        self
    }

    pub fn with_decode_workers(mut self, workers: usize) -> Self {
        self.decode_workers = workers;
        self
    }

    pub fn with_steg(mut self, steg: StegConfig) -> Self {
        self.steg = steg;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.encode_workers == 0 {
            return Err(ConfigError::Validation("encode_workers must be at least 1".into()));
        }
        if self.decode_workers == 0 {
            return Err(ConfigError::Validation("decode_workers must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let steg = StegConfig::default();
        assert!(steg.use_header);
        assert!(!steg.use_transparent);
        assert_eq!(PipelineConfig::default().encode_workers, 8);
        assert_eq!(PipelineConfig::default().decode_workers, 8);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(StegConfig::from_toml_str("").unwrap(), StegConfig::default());
        assert_eq!(PipelineConfig::from_toml_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn partial_toml() {
        let config = PipelineConfig::from_toml_str("decode_workers = 2\n[steg]\nuse_header = false\n").unwrap();
        assert_eq!(config.encode_workers, DEFAULT_WORKERS);
        assert_eq!(config.decode_workers, 2);
        assert!(!config.steg.use_header);
        assert!(!config.steg.use_transparent);
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(PipelineConfig::from_toml_str("encode_workers = 0"), Err(ConfigError::Validation(_))));
        assert!(matches!(PipelineConfig::from_toml_str("decode_workers = 0"), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn bad_toml_rejected() {
        assert!(matches!(StegConfig::from_toml_str("use_header = \"yes\""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn builders() {
        let config = PipelineConfig::default()
            .with_workers(3)
            .with_decode_workers(5)
            .with_steg(StegConfig::default().with_header(false).with_transparent(true));
        assert_eq!((config.encode_workers, config.decode_workers), (3, 5));
        assert_eq!(config.steg, StegConfig { use_header: false, use_transparent: true });
    }
}
