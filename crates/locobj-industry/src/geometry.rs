//! Views derived from the decoded sections.
//!
//! These re-derive their ranges from the stored views on every call.
//! They borrow the backing buffer, so keeping that buffer alive and
//! unmoved is the caller's job; after [`IndustryObject::unload`] they
//! return empty views.

use locobj_common::{strip_sentinel, SENTINEL};
use zerocopy::FromBytes;

use crate::object::{AnimationRecord, BuildingPartAnimation};
use crate::IndustryObject;

/// Vertical offset from the requested preview position to the ground line.
const PREVIEW_BASE_OFFSET: i16 = 40;

/// One image of the preview draw list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PreviewLayer {
    /// Index into the global image list.
    pub image: u32,
    /// Primary colour to remap the image with.
    pub colour: u8,
    pub x: i16,
    pub y: i16,
}

impl<'a> IndustryObject<'a> {
    /// Height in pixels of each building part.
    pub fn building_part_heights(&self) -> &'a [u8] {
        self.building_part_heights
    }

    pub fn building_part_animations(&self) -> &'a [BuildingPartAnimation] {
        self.building_part_animations
    }

    /// Building parts of one variation, bottom to top.
    ///
    /// Variations past the decoded count are empty.
    pub fn building_parts(&self, variation: u8) -> &'a [u8] {
        self.building_variation_parts
            .get(variation as usize)
            .map(|parts| strip_sentinel(parts, SENTINEL))
            .unwrap_or_default()
    }

    /// Frames of one animation sequence.
    pub fn animation_sequence(&self, index: u8) -> &'a [u8] {
        let Some(sequence) = self.animation_sequences.get(index as usize) else {
            return &[];
        };
        match sequence.split_first() {
            Some((&size, frames)) => frames.get(..size as usize).unwrap_or(frames),
            None => &[],
        }
    }

    /// Animation records up to, not including, the terminating record.
    pub fn animation_records(&self) -> &'a [AnimationRecord] {
        let view = self.animation_records;
        let record_size = std::mem::size_of::<AnimationRecord>();

        let mut end = 0;
        while end + record_size <= view.len() && view[end] != SENTINEL {
            end += record_size;
        }
        <[AnimationRecord]>::ref_from_bytes(&view[..end]).unwrap_or_default()
    }

    /// Building types placed when the industry is founded.
    pub fn buildings(&self) -> &'a [u8] {
        self.buildings
    }

    /// Primary colour used for previews: the highest available colour.
    pub fn preview_colour(&self) -> u8 {
        match self.available_colours {
            0 => 0,
            colours => (31 - colours.leading_zeros()) as u8,
        }
    }

    /// Draw list for the preview image of variation 0 anchored at `(x, y)`.
    ///
    /// Parts are stacked upwards from `y + 40`, each raised by the height
    /// of the part below it.
    pub fn preview_layers(&self, x: i16, y: i16) -> Vec<PreviewLayer> {
        let colour = self.preview_colour();
        let heights = self.building_part_heights();

        let mut pos_y = y.wrapping_add(PREVIEW_BASE_OFFSET);
        self.building_parts(0)
            .iter()
            .map(|&part| {
                let layer = PreviewLayer {
                    image: self.building_image_offset + part as u32 * 4 + 1,
                    colour,
                    x,
                    y: pos_y,
                };
                let height = heights.get(part as usize).copied().unwrap_or(0);
                pos_y = pos_y.wrapping_sub(height as i16);
                layer
            })
            .collect()
    }
}
