//! Common utilities for locobj.
//!
//! This crate provides foundational types used across all locobj crates:
//!
//! - [`Span`] - Zero-copy forward cursor with sentinel scanning
//! - [`ObjectHeader`] - The 16-byte key identifying a loadable object
//! - [`checksum`] - Object checksum computation
//! - [`loader`] - Interfaces to string tables, image tables and object lookup

mod error;
mod header;
mod span;

pub mod checksum;
pub mod loader;

pub use error::{Error, Result};
pub use header::{ObjectHeader, ObjectType};
pub use loader::{
    DependencySink, DependentObjects, ImageTableLoader, ImageTableResult, LoadContext,
    LoadedObjectHandle, ObjectLookup, StringId, StringTableLoader, StringTableResult,
};
pub use span::{strip_sentinel, SentinelScan, Span, SENTINEL};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
