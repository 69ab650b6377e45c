//! Configuration for memory geometry: cache dimensions and backing memory
//! size. Loaded from a TOML file via [`Config::from_path`] or built with
//! [`Default`]/direct struct literals for programmatic use (tests, embedders).

use serde::Deserialize;
use std::path::Path;

use crate::common::error::SimError;

const DEFAULT_INTERFACE_SIZE: usize = 4;
const DEFAULT_LINE_SIZE: usize = 16;
const DEFAULT_SET_SIZE: usize = 64;
const DEFAULT_MEMORY_WORDS: usize = 1 << 16;

/// Top-level simulator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub icache: CacheConfig,

    #[serde(default)]
    pub dcache: CacheConfig,

    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            icache: CacheConfig::default(),
            dcache: CacheConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

impl Config {
    /// Loads and validates a configuration from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every cache geometry is representable and that the
    /// backing memory is nonempty.
    pub fn validate(&self) -> Result<(), SimError> {
        self.icache.validate()?;
        self.dcache.validate()?;
        if self.memory.words == 0 {
            return Err(SimError::InvalidMemorySize);
        }
        Ok(())
    }
}

/// Geometry for one set-associative cache instance. Associativity is fixed
/// at 4 ways, matching the source hardware; only the dimensions below vary.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CacheConfig {
    /// Bytes transferred per access to the next level (e.g. 4 for one word).
    #[serde(default = "default_interface_size")]
    pub interface_size: usize,

    /// Bytes per cache line. Must be a power of two and `>= interface_size`.
    #[serde(default = "default_line_size")]
    pub line_size: usize,

    /// Number of sets. Must be a power of two.
    #[serde(default = "default_set_size")]
    pub set_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            interface_size: DEFAULT_INTERFACE_SIZE,
            line_size: DEFAULT_LINE_SIZE,
            set_size: DEFAULT_SET_SIZE,
        }
    }
}

impl CacheConfig {
    /// Rejects geometries the cache cannot represent: any dimension that
    /// isn't a power of two, or a line smaller than one transfer unit.
    pub fn validate(&self) -> Result<(), SimError> {
        let ok = self.interface_size.is_power_of_two()
            && self.line_size.is_power_of_two()
            && self.set_size.is_power_of_two()
            && self.line_size >= self.interface_size;
        if ok {
            Ok(())
        } else {
            Err(SimError::InvalidCacheGeometry {
                interface_size: self.interface_size,
                line_size: self.line_size,
                set_size: self.set_size,
            })
        }
    }

    /// Number of sub-line transfers needed to fill or write back one line.
    pub fn words_per_transfer(&self) -> usize {
        self.line_size / self.interface_size
    }
}

fn default_interface_size() -> usize {
    DEFAULT_INTERFACE_SIZE
}

fn default_line_size() -> usize {
    DEFAULT_LINE_SIZE
}

fn default_set_size() -> usize {
    DEFAULT_SET_SIZE
}

/// Backing memory configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MemoryConfig {
    /// Number of 32-bit words in the flat backing array.
    #[serde(default = "default_memory_words")]
    pub words: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            words: DEFAULT_MEMORY_WORDS,
        }
    }
}

fn default_memory_words() -> usize {
    DEFAULT_MEMORY_WORDS
}
