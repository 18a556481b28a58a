//! Industry object record and its decode pipeline.
//!
//! An industry object file is a fixed 0xF4-byte header followed by a run of
//! variable-length sections. Most sections carry no length prefix; their
//! extent follows from a count in the header, a leading size byte, or a
//! `0xFF` terminator. Each section starts where the previous one ended, so
//! the steps in [`IndustryObject::load`] run strictly in stream order.

use bitflags::bitflags;
use locobj_common::{DependencySink, LoadContext, ObjectHeader, Span, StringId, SENTINEL};
use tracing::{debug, trace};
use zerocopy::byteorder::little_endian::{I16, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{Error, Result};

/// Local id of a loaded object (an index among loaded objects of its type).
pub type ObjectId = u8;

/// Number of per-entry animation sequences.
pub const ANIMATION_SEQUENCE_COUNT: usize = 4;
/// Capacity of the per-variation building part lists.
pub const MAX_BUILDING_VARIATIONS: usize = 32;
/// Produced cargo slots.
pub const PRODUCED_CARGO_COUNT: usize = 2;
/// Required cargo slots.
pub const REQUIRED_CARGO_COUNT: usize = 3;
/// Wall type slots.
pub const WALL_TYPE_COUNT: usize = 4;

/// Size of the fixed header that precedes the variable-length sections.
pub const HEADER_SIZE: usize = 0xF4;

/// Images per farm tile angle.
const FARM_IMAGES_PER_ANGLE: u32 = 21;

bitflags! {
    /// Placement and behaviour flags of an industry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IndustryFlags: u32 {
        const BUILT_IN_CLUSTERS = 1 << 0;
        const BUILT_ON_HIGH_GROUND = 1 << 1;
        const BUILT_ON_LOW_GROUND = 1 << 2;
        const BUILT_ON_SNOW = 1 << 3;
        const BUILT_BELOW_SNOW_LINE = 1 << 4;
        const BUILT_ON_FLAT_GROUND = 1 << 5;
        const BUILT_NEAR_WATER = 1 << 6;
        const BUILT_AWAY_FROM_WATER = 1 << 7;
        const BUILT_ON_WATER = 1 << 8;
        const BUILT_NEAR_TOWN = 1 << 9;
        const BUILT_AWAY_FROM_TOWN = 1 << 10;
        const BUILT_NEAR_TREES = 1 << 11;
        const BUILT_REQUIRES_OPEN_SPACE = 1 << 12;
        const OILFIELD = 1 << 13;
        const MINES = 1 << 14;
        const NOT_ROTATABLE = 1 << 15;
        const CAN_BE_FOUNDED_BY_PLAYER = 1 << 16;
        const REQUIRES_ALL_CARGO = 1 << 17;
        const HAS_SHADOWS = 1 << 20;
    }
}

/// Frame count and speed of one building part's animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C)]
pub struct BuildingPartAnimation {
    pub num_frames: u8,
    pub animation_speed: u8,
}

/// Record of the sentinel-terminated animation list.
///
/// A record whose `tag` is `0xFF` ends the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C)]
pub struct AnimationRecord {
    pub tag: u8,
    pub value: u8,
}

/// Initial production rate bounds, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProductionRateRange {
    pub min: u16,
    pub max: u16,
}

/// On-disk layout of the fixed header.
///
/// Fields prefixed `runtime_` are slots the game fills while the object is
/// loaded; their stored values are meaningless and ignored.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub(crate) struct RawIndustryHeader {
    pub(crate) runtime_names: [U16; 7],
    pub(crate) runtime_images: [U32; 4],
    pub(crate) num_building_parts: u8,
    pub(crate) num_building_variations: u8,
    pub(crate) runtime_views: [U32; 39],
    pub(crate) min_num_buildings: u8,
    pub(crate) max_num_buildings: u8,
    pub(crate) runtime_buildings: U32,
    pub(crate) available_colours: U32,
    pub(crate) building_size_flags: U32,
    pub(crate) designed_year: U16,
    pub(crate) obsolete_year: U16,
    pub(crate) total_of_type_in_scenario: u8,
    pub(crate) cost_index: u8,
    pub(crate) cost_factor: I16,
    pub(crate) clear_cost_factor: I16,
    pub(crate) initial_production_rate: [U16; 4],
    pub(crate) pad_dc: [u8; 2],
    pub(crate) runtime_cargo: [u8; 5],
    pub(crate) pad_e3: u8,
    pub(crate) flags: U32,
    pub(crate) scaffolding_segment_type: u8,
    pub(crate) farm_tile_num_image_angles: u8,
    pub(crate) farm_growth_stage_with_no_production: u8,
    pub(crate) farm_ideal_size: u8,
    pub(crate) farm_num_stages_of_growth: u8,
    pub(crate) runtime_walls: [u8; 6],
    pub(crate) map_colour: u8,
}

const _: () = assert!(std::mem::size_of::<RawIndustryHeader>() == HEADER_SIZE);

/// A decoded industry object.
///
/// Variable-length sections are borrowed from the buffer passed to
/// [`load`](Self::load), so the object cannot outlive it. Resolved object
/// slots are `None` both when the stream marked them absent and when the
/// referenced object was not loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndustryObject<'a> {
    pub name: StringId,
    pub name_secondary: StringId,
    pub name_closing_down: StringId,
    pub name_up_production: StringId,
    pub name_down_production: StringId,
    pub name_singular: StringId,
    pub name_plural: StringId,

    /// First image of the object's image table (shadows, when present).
    pub shadow_image_offset: u32,
    /// First building part image.
    pub building_image_offset: u32,
    /// First farm tile image.
    pub farm_image_offset: u32,
    pub farm_images_per_growth_stage: u32,

    pub num_building_parts: u8,
    pub num_building_variations: u8,

    pub(crate) building_part_heights: &'a [u8],
    pub(crate) building_part_animations: &'a [BuildingPartAnimation],
    /// Each view is the size byte followed by that many bytes.
    pub(crate) animation_sequences: [&'a [u8]; ANIMATION_SEQUENCE_COUNT],
    /// Records plus the terminating tag byte.
    pub(crate) animation_records: &'a [u8],
    /// Each view includes its `0xFF` terminator.
    pub(crate) building_variation_parts: [&'a [u8]; MAX_BUILDING_VARIATIONS],
    pub(crate) buildings: &'a [u8],

    pub min_num_buildings: u8,
    pub max_num_buildings: u8,
    /// Bitset of colours the industry may be drawn in.
    pub available_colours: u32,
    pub building_size_flags: u32,
    pub designed_year: u16,
    pub obsolete_year: u16,
    pub total_of_type_in_scenario: u8,
    pub cost_index: u8,
    pub cost_factor: i16,
    pub clear_cost_factor: i16,
    pub initial_production_rate: [ProductionRateRange; 2],
    pub produced_cargo_type: [Option<ObjectId>; PRODUCED_CARGO_COUNT],
    pub required_cargo_type: [Option<ObjectId>; REQUIRED_CARGO_COUNT],
    pub flags: IndustryFlags,
    pub scaffolding_segment_type: u8,
    pub farm_tile_num_image_angles: u8,
    /// `0xFF` when every growth stage produces.
    pub farm_growth_stage_with_no_production: u8,
    pub farm_ideal_size: u8,
    pub farm_num_stages_of_growth: u8,
    pub wall_types: [Option<ObjectId>; WALL_TYPE_COUNT],
    pub building_wall: Option<ObjectId>,
    pub building_wall_entrance: Option<ObjectId>,
    pub map_colour: u8,
}

impl<'a> IndustryObject<'a> {
    /// Decode an industry object from a complete object payload.
    ///
    /// On error the partially decoded object is dropped.
    pub fn decode(
        data: &'a [u8],
        ctx: &mut LoadContext<'_>,
        dependencies: Option<&mut dyn DependencySink>,
    ) -> Result<Self> {
        let mut object = Self::default();
        object.load(data, ctx, dependencies)?;
        Ok(object)
    }

    /// Decode `data` into this object.
    ///
    /// Every referenced object header is appended to `dependencies` in
    /// stream order when a sink is given; otherwise the decode is identical.
    /// On error the object is left partially populated and should be
    /// [`unload`](Self::unload)ed.
    pub fn load(
        &mut self,
        data: &'a [u8],
        ctx: &mut LoadContext<'_>,
        mut dependencies: Option<&mut dyn DependencySink>,
    ) -> Result<()> {
        let mut span = Span::new(data);

        let header: RawIndustryHeader = span.read_struct()?;
        self.copy_scalars(&header);

        self.decode_names(&mut span, ctx)?;

        // Building parts
        self.building_part_heights = span.read_bytes(self.num_building_parts as usize)?;
        self.building_part_animations = span.read_slice(self.num_building_parts as usize)?;
        trace!(position = span.position(), "decoded building part heights and animations");

        self.decode_animation_sequences(&mut span)?;

        self.animation_records =
            span.read_terminated_records(std::mem::size_of::<AnimationRecord>(), SENTINEL)?;
        trace!(position = span.position(), "decoded animation records");

        self.decode_building_variations(&mut span)?;

        self.buildings = span.read_bytes(self.max_num_buildings as usize)?;

        // Object references
        for slot in &mut self.produced_cargo_type {
            *slot = load_object_slot(&mut span, ctx, dependencies.as_deref_mut())?;
        }
        for slot in &mut self.required_cargo_type {
            *slot = load_object_slot(&mut span, ctx, dependencies.as_deref_mut())?;
        }
        for slot in &mut self.wall_types {
            *slot = load_object_slot(&mut span, ctx, dependencies.as_deref_mut())?;
        }
        self.building_wall = load_object_slot(&mut span, ctx, dependencies.as_deref_mut())?;
        self.building_wall_entrance =
            load_object_slot(&mut span, ctx, dependencies.as_deref_mut())?;
        trace!(position = span.position(), "decoded object references");

        self.decode_image_table(&mut span, ctx)?;

        debug!(
            parts = self.num_building_parts,
            variations = self.num_building_variations,
            bytes = data.len(),
            "decoded industry object"
        );
        Ok(())
    }

    /// Reset every decoded field, releasing all views of the buffer.
    ///
    /// Safe on an object that was never loaded or only partly loaded.
    pub fn unload(&mut self) {
        *self = Self::default();
        debug!("unloaded industry object");
    }

    fn copy_scalars(&mut self, header: &RawIndustryHeader) {
        self.num_building_parts = header.num_building_parts;
        self.num_building_variations = header.num_building_variations;
        self.min_num_buildings = header.min_num_buildings;
        self.max_num_buildings = header.max_num_buildings;
        self.available_colours = header.available_colours.get();
        self.building_size_flags = header.building_size_flags.get();
        self.designed_year = header.designed_year.get();
        self.obsolete_year = header.obsolete_year.get();
        self.total_of_type_in_scenario = header.total_of_type_in_scenario;
        self.cost_index = header.cost_index;
        self.cost_factor = header.cost_factor.get();
        self.clear_cost_factor = header.clear_cost_factor.get();
        let rates = &header.initial_production_rate;
        self.initial_production_rate = [
            ProductionRateRange { min: rates[0].get(), max: rates[1].get() },
            ProductionRateRange { min: rates[2].get(), max: rates[3].get() },
        ];
        self.flags = IndustryFlags::from_bits_retain(header.flags.get());
        self.scaffolding_segment_type = header.scaffolding_segment_type;
        self.farm_tile_num_image_angles = header.farm_tile_num_image_angles;
        self.farm_growth_stage_with_no_production = header.farm_growth_stage_with_no_production;
        self.farm_ideal_size = header.farm_ideal_size;
        self.farm_num_stages_of_growth = header.farm_num_stages_of_growth;
        self.map_colour = header.map_colour;
    }

    /// String tables 0-7. Table 2 is present in the stream but unused.
    fn decode_names(&mut self, span: &mut Span<'a>, ctx: &mut LoadContext<'_>) -> Result<()> {
        let mut unused = StringId::NULL;
        let names: [&mut StringId; 8] = [
            &mut self.name,
            &mut self.name_secondary,
            &mut unused,
            &mut self.name_closing_down,
            &mut self.name_up_production,
            &mut self.name_down_production,
            &mut self.name_singular,
            &mut self.name_plural,
        ];

        for (index, dst) in (0u8..).zip(names) {
            let table = ctx
                .strings
                .load_string_table(span.remaining_bytes(), ctx.handle, index)?;
            *dst = table.id;
            span.advance(table.table_length)?;
        }
        trace!(position = span.position(), "decoded string tables");
        Ok(())
    }

    /// Each sequence is a size byte (a power of two) followed by that many frames.
    fn decode_animation_sequences(&mut self, span: &mut Span<'a>) -> Result<()> {
        for sequence in &mut self.animation_sequences {
            let size = span.peek()? as usize;
            *sequence = span.read_bytes(size + 1)?;
        }
        trace!(position = span.position(), "decoded animation sequences");
        Ok(())
    }

    fn decode_building_variations(&mut self, span: &mut Span<'a>) -> Result<()> {
        let count = self.num_building_variations;
        if count as usize > MAX_BUILDING_VARIATIONS {
            return Err(Error::TooManyVariations {
                count,
                capacity: MAX_BUILDING_VARIATIONS,
            });
        }

        for parts in self.building_variation_parts.iter_mut().take(count as usize) {
            *parts = span.read_terminated(SENTINEL)?;
        }
        trace!(position = span.position(), count, "decoded building variations");
        Ok(())
    }

    /// The image table must consume exactly what is left of the buffer.
    fn decode_image_table(&mut self, span: &mut Span<'a>, ctx: &mut LoadContext<'_>) -> Result<()> {
        let remaining = span.remaining();
        let table = ctx.images.load_image_table(span.remaining_bytes())?;
        if table.table_length != remaining {
            return Err(Error::ImageTableLength {
                reported: table.table_length,
                remaining,
            });
        }
        span.advance(remaining)?;

        // Image indices are modular, like the game's own offsets.
        self.shadow_image_offset = table.image_offset;
        self.building_image_offset = self.shadow_image_offset;
        if self.flags.contains(IndustryFlags::HAS_SHADOWS) {
            self.building_image_offset = self
                .building_image_offset
                .wrapping_add((self.num_building_variations as u32).wrapping_mul(4));
        }
        self.farm_image_offset = (self.num_building_parts as u32)
            .wrapping_mul(4)
            .wrapping_add(self.building_image_offset);
        self.farm_images_per_growth_stage =
            self.farm_tile_num_image_angles as u32 * FARM_IMAGES_PER_ANGLE;
        Ok(())
    }
}

/// Decode one 16-byte object reference slot.
///
/// A slot starting with `0xFF` is absent and never looked up or recorded.
/// A present header is recorded and then resolved; an unresolved header
/// decodes to `None` without failing.
fn load_object_slot<'d>(
    span: &mut Span<'_>,
    ctx: &LoadContext<'_>,
    dependencies: Option<&mut (dyn DependencySink + 'd)>,
) -> Result<Option<ObjectId>> {
    let slot = span.read_bytes(ObjectHeader::SIZE)?;
    if ObjectHeader::is_absent_slot(slot) {
        return Ok(None);
    }

    let header =
        ObjectHeader::read_from_bytes(slot).map_err(|_| locobj_common::Error::UnexpectedEof {
            needed: ObjectHeader::SIZE,
            available: slot.len(),
        })?;
    if let Some(sink) = dependencies {
        sink.push_required(header);
    }

    let resolved = ctx.objects.find_object_handle(&header).map(|handle| handle.id);
    if resolved.is_none() {
        trace!(%header, "object reference not loaded");
    }
    Ok(resolved)
}
