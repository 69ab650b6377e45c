//! Error types for the simulator's construction-time API surface.
//!
//! The running pipeline has no error surface of its own (see the crate's
//! design notes): undefined instructions are nops, misaligned accesses are
//! defined by their low address bits, and the cache always eventually
//! completes. The only place a caller can go wrong is at construction time,
//! by asking for a cache geometry or memory size that cannot be built.

use std::fmt;

/// Errors reported by fallible constructors (`Config`, `Cache`, `Simulator`).
#[derive(Debug)]
pub enum SimError {
    /// A cache dimension (`interface_size`, `line_size`, `set_size`) was not
    /// a power of two, or `line_size` was smaller than `interface_size`.
    InvalidCacheGeometry {
        interface_size: usize,
        line_size: usize,
        set_size: usize,
    },

    /// The requested backing memory size was zero.
    InvalidMemorySize,

    /// The configuration file could not be parsed as TOML.
    ConfigParse(toml::de::Error),

    /// The configuration file could not be read from disk.
    ConfigIo(std::io::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidCacheGeometry {
                interface_size,
                line_size,
                set_size,
            } => write!(
                f,
                "invalid cache geometry: interface_size={interface_size}, line_size={line_size}, set_size={set_size} (all must be powers of two, line_size >= interface_size)"
            ),
            SimError::InvalidMemorySize => write!(f, "backing memory size must be nonzero"),
            SimError::ConfigParse(e) => write!(f, "failed to parse config: {e}"),
            SimError::ConfigIo(e) => write!(f, "failed to read config file: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::ConfigParse(e) => Some(e),
            SimError::ConfigIo(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::ConfigParse(e)
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::ConfigIo(e)
    }
}
