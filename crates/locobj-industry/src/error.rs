//! Error types for industry object decoding.

use thiserror::Error;

/// Errors that can occur when decoding an industry object.
///
/// Every variant means the object data is malformed; the partially decoded
/// object must not be used.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error (short buffer, missing sentinel).
    #[error("{0}")]
    Common(#[from] locobj_common::Error),

    /// More building variations than there are part-list slots.
    #[error("too many building variations: {count} (capacity {capacity})")]
    TooManyVariations { count: u8, capacity: usize },

    /// The image table did not account for exactly the remaining bytes.
    #[error("image table length mismatch: table reports {reported} bytes but {remaining} remain")]
    ImageTableLength { reported: usize, remaining: usize },
}

/// Result type for industry object operations.
pub type Result<T> = std::result::Result<T, Error>;
