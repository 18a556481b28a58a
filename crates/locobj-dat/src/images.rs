//! Reference image table loader.
//!
//! ```text
//! u32 num_entries
//! u32 total_size
//! num_entries x 16-byte element
//! total_size bytes of pixel data
//! ```

use locobj_common::{ImageTableLoader, ImageTableResult, Span};
use tracing::trace;
use zerocopy::byteorder::little_endian::{I16, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Size of the table's count and size prefix.
const TABLE_PREFIX_SIZE: usize = 8;

/// One image of an image table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ImageElement {
    /// Offset of the pixel data within the table's data block.
    pub offset: U32,
    pub width: I16,
    pub height: I16,
    pub x_offset: I16,
    pub y_offset: I16,
    pub flags: U16,
    pub unused: I16,
}

const _: () = assert!(std::mem::size_of::<ImageElement>() == 16);

/// Global image list filled by loading image tables.
///
/// Image offsets are allocated sequentially starting at a base index.
#[derive(Debug, Clone, Default)]
pub struct ImageTables {
    base: u32,
    elements: Vec<ImageElement>,
}

impl ImageTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start allocating image offsets at `base`.
    pub fn with_base(base: u32) -> Self {
        Self {
            base,
            elements: Vec::new(),
        }
    }

    /// Index the next loaded image will get.
    ///
    /// Offsets wrap around at `u32::MAX`.
    pub fn next_offset(&self) -> u32 {
        self.base.wrapping_add(self.elements.len() as u32)
    }

    /// Element of a global image index.
    pub fn element(&self, image: u32) -> Option<&ImageElement> {
        let index = image.wrapping_sub(self.base);
        self.elements.get(index as usize)
    }

    /// Drop every image loaded after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.elements.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl ImageTableLoader for ImageTables {
    fn load_image_table(&mut self, data: &[u8]) -> locobj_common::Result<ImageTableResult> {
        let mut span = Span::new(data);
        let count = span.read_u32()? as usize;
        let total_size = span.read_u32()? as usize;
        let elements: &[ImageElement] = span.read_slice(count)?;
        span.advance(total_size)?;

        let image_offset = self.next_offset();
        self.elements.extend_from_slice(elements);

        let table_length = TABLE_PREFIX_SIZE + count * std::mem::size_of::<ImageElement>() + total_size;
        trace!(count, total_size, image_offset, "loaded image table");
        Ok(ImageTableResult {
            image_offset,
            table_length,
        })
    }
}
