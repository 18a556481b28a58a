//! Loaded object registry.

use locobj_common::{LoadedObjectHandle, ObjectHeader, ObjectLookup, ObjectType};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Objects currently loaded, keyed by their full header.
///
/// Ids are allocated per object type in registration order.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    handles: FxHashMap<ObjectHeader, LoadedObjectHandle>,
    next_id: FxHashMap<ObjectType, u8>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loaded object and return its handle.
    ///
    /// Registering the same header twice returns the existing handle.
    /// Returns `None` when the header has an unknown type or every id of
    /// its type is taken.
    pub fn register(&mut self, header: ObjectHeader) -> Option<LoadedObjectHandle> {
        if let Some(&handle) = self.handles.get(&header) {
            return Some(handle);
        }

        let object_type = header.object_type()?;
        let next = self.next_id.entry(object_type).or_insert(0);
        let id = *next;
        *next = next.checked_add(1)?;

        let handle = LoadedObjectHandle::new(object_type, id);
        self.handles.insert(header, handle);
        debug!(%header, id, "registered object");
        Some(handle)
    }

    /// Handle `register` would return for `header`, without registering it.
    pub fn next_handle(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        if let Some(&handle) = self.handles.get(header) {
            return Some(handle);
        }

        let object_type = header.object_type()?;
        let id = self.next_id.get(&object_type).copied().unwrap_or(0);
        if id == u8::MAX {
            return None;
        }
        Some(LoadedObjectHandle::new(object_type, id))
    }

    /// Number of objects registered.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Number of objects registered of one type.
    pub fn count_of(&self, object_type: ObjectType) -> usize {
        self.next_id.get(&object_type).copied().unwrap_or(0) as usize
    }

    /// Header registered under a handle.
    pub fn header_of(&self, handle: LoadedObjectHandle) -> Option<&ObjectHeader> {
        self.handles
            .iter()
            .find(|(_, &registered)| registered == handle)
            .map(|(header, _)| header)
    }
}

impl ObjectLookup for ObjectRegistry {
    fn find_object_handle(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        self.handles.get(header).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_per_type() {
        let mut registry = ObjectRegistry::new();
        let coal = ObjectHeader::new(ObjectType::Cargo, "COAL", 1);
        let iron = ObjectHeader::new(ObjectType::Cargo, "IRON", 2);
        let fence = ObjectHeader::new(ObjectType::Wall, "FENCE", 3);

        assert_eq!(registry.register(coal), Some(LoadedObjectHandle::new(ObjectType::Cargo, 0)));
        assert_eq!(registry.register(fence), Some(LoadedObjectHandle::new(ObjectType::Wall, 0)));
        assert_eq!(registry.register(iron), Some(LoadedObjectHandle::new(ObjectType::Cargo, 1)));
        assert_eq!(registry.count_of(ObjectType::Cargo), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_twice() {
        let mut registry = ObjectRegistry::new();
        let coal = ObjectHeader::new(ObjectType::Cargo, "COAL", 1);

        let first = registry.register(coal);
        assert_eq!(registry.register(coal), first);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_matches_whole_header() {
        let mut registry = ObjectRegistry::new();
        let coal = ObjectHeader::new(ObjectType::Cargo, "COAL", 1);
        registry.register(coal);

        assert!(registry.find_object_handle(&coal).is_some());
        assert!(registry
            .find_object_handle(&ObjectHeader::new(ObjectType::Cargo, "COAL", 2))
            .is_none());
        assert!(registry
            .find_object_handle(&ObjectHeader::new(ObjectType::Wall, "COAL", 1))
            .is_none());
    }

    #[test]
    fn test_next_handle_matches_register() {
        let mut registry = ObjectRegistry::new();
        let coal = ObjectHeader::new(ObjectType::Cargo, "COAL", 1);
        let iron = ObjectHeader::new(ObjectType::Cargo, "IRON", 2);
        registry.register(coal);

        let predicted = registry.next_handle(&iron);
        assert_eq!(predicted, Some(LoadedObjectHandle::new(ObjectType::Cargo, 1)));
        assert!(registry.find_object_handle(&iron).is_none());
        assert_eq!(registry.register(iron), predicted);
        assert_eq!(registry.next_handle(&coal), registry.find_object_handle(&coal));
    }

    #[test]
    fn test_header_of() {
        let mut registry = ObjectRegistry::new();
        let fence = ObjectHeader::new(ObjectType::Wall, "FENCE", 3);
        let handle = registry.register(fence).unwrap();

        assert_eq!(registry.header_of(handle), Some(&fence));
        assert!(registry
            .header_of(LoadedObjectHandle::new(ObjectType::Wall, 9))
            .is_none());
    }
}
