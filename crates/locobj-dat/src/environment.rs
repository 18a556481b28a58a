//! Bundled collaborators for decoding objects outside the game.

use std::path::Path;

use locobj_common::{LoadContext, LoadedObjectHandle, ObjectHeader, StringId};
use tracing::debug;

use crate::{ImageTables, ObjectFile, ObjectRegistry, Result, StringTables};

/// Sizes of the string and image tables at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    strings: usize,
    images: usize,
}

/// String tables, image tables and loaded objects shared by every decode.
#[derive(Debug, Clone, Default)]
pub struct LoadEnvironment {
    pub strings: StringTables,
    pub images: ImageTables,
    pub objects: ObjectRegistry,
}

impl LoadEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate image offsets starting at `base`.
    pub fn with_image_base(base: u32) -> Self {
        Self {
            images: ImageTables::with_base(base),
            ..Self::default()
        }
    }

    /// Context for decoding an object loaded under `handle`.
    pub fn context(&mut self, handle: LoadedObjectHandle) -> LoadContext<'_> {
        LoadContext {
            handle,
            strings: &mut self.strings,
            images: &mut self.images,
            objects: &self.objects,
        }
    }

    /// Register `header` and return a context for decoding it.
    ///
    /// Returns `None` when the header cannot be registered.
    pub fn load_context(&mut self, header: ObjectHeader) -> Option<LoadContext<'_>> {
        let handle = self.objects.register(header)?;
        Some(self.context(handle))
    }

    /// Remember how many strings and images are loaded.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            strings: self.strings.len(),
            images: self.images.len(),
        }
    }

    /// Drop strings and images loaded since `checkpoint`.
    ///
    /// Registered objects are kept.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.strings.truncate(checkpoint.strings);
        self.images.truncate(checkpoint.images);
        debug!(
            strings = checkpoint.strings,
            images = checkpoint.images,
            "rolled back load environment"
        );
    }

    /// Look up a loaded string, treating unknown ids as empty.
    pub fn text(&self, id: StringId) -> &str {
        self.strings.text(id).unwrap_or_default()
    }

    /// Register the header of every object file in `files`.
    ///
    /// Unreadable files are skipped. Returns how many headers were registered.
    pub fn register_files<I, P>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut registered = 0;
        for path in files {
            let path = path.as_ref();
            match read_file_header(path) {
                Ok(header) => {
                    if self.objects.register(header).is_some() {
                        registered += 1;
                    }
                }
                Err(err) => debug!(path = %path.display(), %err, "skipping object file"),
            }
        }
        registered
    }
}

fn read_file_header(path: &Path) -> Result<ObjectHeader> {
    let bytes = std::fs::read(path)?;
    ObjectFile::read_header(&bytes)
}
