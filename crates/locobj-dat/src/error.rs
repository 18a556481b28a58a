//! Error types for the object file crate.

use thiserror::Error;

/// Errors that can occur when reading object files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] locobj_common::Error),

    /// Unknown chunk encoding byte.
    #[error("invalid chunk encoding: {0}")]
    InvalidEncoding(u8),

    /// A back-reference pointed before the start of the output.
    #[error("back-reference of {distance} bytes at output offset {position}")]
    BackReference { distance: usize, position: usize },

    /// The declared payload length runs past the end of the file.
    #[error("payload of {declared} bytes declared, {available} available")]
    PayloadLength { declared: usize, available: usize },

    /// Stored checksum does not match the object contents.
    #[error("checksum mismatch: header has {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

/// Result type for object file operations.
pub type Result<T> = std::result::Result<T, Error>;
