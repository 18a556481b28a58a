//! Error types for locobj-common.

use thiserror::Error;

/// Common error type for object data reading.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A sentinel-terminated run reached the end of the buffer.
    #[error("sentinel {sentinel:#04x} not found in the remaining {scanned} bytes")]
    MissingSentinel { sentinel: u8, scanned: usize },

    /// Missing null terminator in string.
    #[error("string missing null terminator")]
    MissingNullTerminator,

    /// Every id of a fixed-width id space is in use.
    #[error("all {capacity} ids are in use")]
    IdsExhausted { capacity: usize },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
