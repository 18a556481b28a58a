//! Interfaces between an object decoder and the object-loading system.
//!
//! A decoder consumes string tables, image tables and header lookups from
//! its surroundings and reports the headers it references. Those seams are
//! the traits here; `locobj-dat` provides in-memory implementations.

use crate::{ObjectHeader, ObjectType, Result};

/// Index of a string in the loaded string tables. `0` is the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringId(pub u16);

impl StringId {
    /// The empty string.
    pub const NULL: Self = Self(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

/// Handle of a loaded object: its type and its index among objects of
/// that type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LoadedObjectHandle {
    pub object_type: ObjectType,
    pub id: u8,
}

impl LoadedObjectHandle {
    pub const fn new(object_type: ObjectType, id: u8) -> Self {
        Self { object_type, id }
    }
}

/// Outcome of loading one string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringTableResult {
    /// Id assigned to the table's selected string.
    pub id: StringId,
    /// Bytes the table occupies, terminator included.
    pub table_length: usize,
}

/// Outcome of loading an image table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTableResult {
    /// Index of the table's first image in the global image list.
    pub image_offset: u32,
    /// Bytes the table occupies.
    pub table_length: usize,
}

/// Loads the string table found at the start of `data`.
pub trait StringTableLoader {
    fn load_string_table(
        &mut self,
        data: &[u8],
        handle: LoadedObjectHandle,
        index: u8,
    ) -> Result<StringTableResult>;
}

/// Loads the image table found at the start of `data`.
pub trait ImageTableLoader {
    fn load_image_table(&mut self, data: &[u8]) -> Result<ImageTableResult>;
}

/// Resolves a header against the objects that are already loaded.
pub trait ObjectLookup {
    fn find_object_handle(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle>;
}

/// Collects headers referenced by a decoded object.
pub trait DependencySink {
    fn push_required(&mut self, header: ObjectHeader);
}

impl DependencySink for Vec<ObjectHeader> {
    fn push_required(&mut self, header: ObjectHeader) {
        self.push(header);
    }
}

/// Dependencies reported by one object load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependentObjects {
    /// Objects that must be loaded for this one to work, in stream order.
    pub required: Vec<ObjectHeader>,
}

impl DependencySink for DependentObjects {
    fn push_required(&mut self, header: ObjectHeader) {
        self.required.push(header);
    }
}

/// Collaborators used while decoding one object.
pub struct LoadContext<'l> {
    /// Handle the object being decoded is loaded under.
    pub handle: LoadedObjectHandle,
    pub strings: &'l mut dyn StringTableLoader,
    pub images: &'l mut dyn ImageTableLoader,
    pub objects: &'l dyn ObjectLookup,
}
