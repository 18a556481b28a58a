//! Locomotion object file (`.dat`) reader.
//!
//! An object file is a 16-byte [`ObjectHeader`](locobj_common::ObjectHeader),
//! an encoding byte, a `u32` payload length and the encoded payload:
//!
//! - `0` uncompressed
//! - `1` run-length encoded
//! - `2` run-length encoded, then back-reference compressed
//! - `3` rotated bytes
//!
//! Besides the container this crate provides in-memory collaborators for
//! object decoders: [`StringTables`], [`ImageTables`] and an
//! [`ObjectRegistry`], bundled together in a [`LoadEnvironment`].
//!
//! # Example
//!
//! ```no_run
//! use locobj_dat::{LoadEnvironment, ObjectFile};
//!
//! let file = ObjectFile::open("INDCOAL.DAT")?;
//! file.verify_checksum()?;
//!
//! let mut env = LoadEnvironment::new();
//! let ctx = env.load_context(*file.header());
//! println!("{} ({} bytes)", file.header(), file.data().len());
//! # drop(ctx);
//! # Ok::<(), locobj_dat::Error>(())
//! ```

mod encoding;
mod environment;
mod error;
mod file;
mod images;
mod registry;
mod strings;

pub use encoding::{
    decode_chunk, decode_rotate, decode_run_length_multi, decode_run_length_single, ChunkEncoding,
};
pub use environment::{Checkpoint, LoadEnvironment};
pub use error::{Error, Result};
pub use file::{ObjectFile, PREAMBLE_SIZE};
pub use images::{ImageElement, ImageTables};
pub use registry::ObjectRegistry;
pub use strings::{language, StringOrigin, StringTables};
