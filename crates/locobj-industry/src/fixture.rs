//! Test-only encoder for industry objects and in-memory collaborators.

use std::cell::Cell;
use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use locobj_common::{
    ImageTableLoader, ImageTableResult, LoadContext, LoadedObjectHandle, ObjectHeader,
    ObjectLookup, ObjectType, Span, StringId, StringTableLoader, StringTableResult,
};
use zerocopy::byteorder::little_endian::{I16, U16, U32};
use zerocopy::{FromZeros, IntoBytes};

use crate::object::RawIndustryHeader;

/// Number of object reference slots in the stream.
pub(crate) const SLOT_COUNT: usize = 11;

pub(crate) fn coal() -> ObjectHeader {
    ObjectHeader::new(ObjectType::Cargo, "COAL", 0x1111)
}

pub(crate) fn iron() -> ObjectHeader {
    ObjectHeader::new(ObjectType::Cargo, "IRON", 0x2222)
}

pub(crate) fn fence() -> ObjectHeader {
    ObjectHeader::new(ObjectType::Wall, "FENCE", 0x3333)
}

pub(crate) fn gate() -> ObjectHeader {
    ObjectHeader::new(ObjectType::Wall, "GATE", 0x4444)
}

/// Describes an industry object to encode.
#[derive(Debug, Clone)]
pub(crate) struct IndustryFixture {
    pub names: [&'static str; 8],
    pub heights: Vec<u8>,
    pub part_animations: Vec<(u8, u8)>,
    pub sequences: [Vec<u8>; 4],
    pub records: Vec<(u8, u8)>,
    pub variations: Vec<Vec<u8>>,
    pub terminate_variations: bool,
    pub buildings: Vec<u8>,
    pub min_num_buildings: u8,
    pub slots: [Option<ObjectHeader>; SLOT_COUNT],
    pub flags: u32,
    pub available_colours: u32,
    pub total_of_type_in_scenario: u8,
    pub cost_factor: i16,
    pub clear_cost_factor: i16,
    pub production_rates: [(u16, u16); 2],
    pub scaffolding_segment_type: u8,
    pub farm_tile_num_image_angles: u8,
    pub farm_growth_stage_with_no_production: u8,
    pub farm_num_stages_of_growth: u8,
    pub image_count: u32,
    pub image_data: Vec<u8>,
}

impl Default for IndustryFixture {
    fn default() -> Self {
        let mut slots = [None; SLOT_COUNT];
        slots[0] = Some(coal());
        slots[2] = Some(iron());
        slots[9] = Some(fence());
        slots[10] = Some(gate());

        Self {
            names: [
                "Coal Mine",
                "Coal Mine (construction)",
                "unused",
                "Coal Mine closing down",
                "Coal Mine increases production",
                "Coal Mine decreases production",
                "Coal Mine",
                "Coal Mines",
            ],
            heights: vec![8, 16, 4],
            part_animations: vec![(1, 0), (4, 2), (1, 0)],
            sequences: [vec![0, 1], vec![0, 1, 2, 3], vec![2], vec![4]],
            records: vec![(0, 3), (1, 4)],
            variations: vec![vec![0, 1, 2], vec![2]],
            terminate_variations: true,
            buildings: vec![0, 1, 1],
            min_num_buildings: 1,
            slots,
            flags: 0,
            available_colours: (1 << 5) | (1 << 9),
            total_of_type_in_scenario: 4,
            cost_factor: 256,
            clear_cost_factor: -100,
            production_rates: [(5, 25), (10, 40)],
            scaffolding_segment_type: 1,
            farm_tile_num_image_angles: 2,
            farm_growth_stage_with_no_production: 0xFF,
            farm_num_stages_of_growth: 0,
            image_count: 2,
            image_data: vec![0x5A; 10],
        }
    }
}

impl IndustryFixture {
    fn header(&self) -> RawIndustryHeader {
        let mut header = RawIndustryHeader::new_zeroed();
        // Runtime slots carry junk on disk.
        header.runtime_names = [U16::new(0xAAAA); 7];
        header.runtime_images = [U32::new(0xBBBB_BBBB); 4];
        header.runtime_cargo = [0x11; 5];
        header.runtime_walls = [0x22; 6];

        header.num_building_parts = self.heights.len() as u8;
        header.num_building_variations = self.variations.len() as u8;
        header.min_num_buildings = self.min_num_buildings;
        header.max_num_buildings = self.buildings.len() as u8;
        header.available_colours = U32::new(self.available_colours);
        header.designed_year = U16::new(1900);
        header.obsolete_year = U16::new(0xFFFF);
        header.total_of_type_in_scenario = self.total_of_type_in_scenario;
        header.cost_factor = I16::new(self.cost_factor);
        header.clear_cost_factor = I16::new(self.clear_cost_factor);
        let [(min0, max0), (min1, max1)] = self.production_rates;
        header.initial_production_rate =
            [U16::new(min0), U16::new(max0), U16::new(min1), U16::new(max1)];
        header.flags = U32::new(self.flags);
        header.scaffolding_segment_type = self.scaffolding_segment_type;
        header.farm_tile_num_image_angles = self.farm_tile_num_image_angles;
        header.farm_growth_stage_with_no_production = self.farm_growth_stage_with_no_production;
        header.farm_num_stages_of_growth = self.farm_num_stages_of_growth;
        header.map_colour = 3;
        header
    }

    /// Everything up to and including the building part lists.
    fn encode_until_variations(&self) -> Vec<u8> {
        let mut out = self.header().as_bytes().to_vec();

        for name in self.names {
            out.push(0); // English (UK)
            out.extend_from_slice(name.as_bytes());
            out.push(0);
            out.push(2); // German
            out.extend_from_slice(b"Fabrik\0");
            out.push(0xFF);
        }

        out.extend_from_slice(&self.heights);
        for &(frames, speed) in &self.part_animations {
            out.extend_from_slice(&[frames, speed]);
        }
        for sequence in &self.sequences {
            out.push(sequence.len() as u8);
            out.extend_from_slice(sequence);
        }
        for &(tag, value) in &self.records {
            out.extend_from_slice(&[tag, value]);
        }
        out.push(0xFF);

        for parts in &self.variations {
            out.extend_from_slice(parts);
            if self.terminate_variations {
                out.push(0xFF);
            }
        }
        out
    }

    /// Offset of the first byte after the building part lists.
    pub fn variations_end(&self) -> usize {
        self.encode_until_variations().len()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = self.encode_until_variations();
        out.extend_from_slice(&self.buildings);

        for slot in &self.slots {
            match slot {
                Some(header) => out.extend_from_slice(header.as_bytes()),
                None => {
                    out.push(0xFF);
                    out.extend_from_slice(&[0; ObjectHeader::SIZE - 1]);
                }
            }
        }

        out.write_u32::<LittleEndian>(self.image_count).unwrap();
        out.write_u32::<LittleEndian>(self.image_data.len() as u32).unwrap();
        for index in 0..self.image_count {
            out.write_u32::<LittleEndian>(index * 5).unwrap();
            out.write_all(&[0; 12]).unwrap();
        }
        out.extend_from_slice(&self.image_data);
        out
    }
}

/// Hands out `100 + index` for every table.
#[derive(Debug, Default)]
pub(crate) struct FixtureStrings;

impl StringTableLoader for FixtureStrings {
    fn load_string_table(
        &mut self,
        data: &[u8],
        _handle: LoadedObjectHandle,
        index: u8,
    ) -> locobj_common::Result<StringTableResult> {
        let mut span = Span::new(data);
        while span.read_u8()? != 0xFF {
            span.read_cstring()?;
        }
        Ok(StringTableResult {
            id: StringId(100 + index as u16),
            table_length: span.position(),
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct FixtureImages {
    pub base: u32,
    /// Overrides the length computed from the table header.
    pub reported_length: Option<usize>,
}

impl ImageTableLoader for FixtureImages {
    fn load_image_table(&mut self, data: &[u8]) -> locobj_common::Result<ImageTableResult> {
        let mut span = Span::new(data);
        let count = span.read_u32()? as usize;
        let size = span.read_u32()? as usize;
        Ok(ImageTableResult {
            image_offset: self.base,
            table_length: self.reported_length.unwrap_or(8 + count * 16 + size),
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct FixtureObjects {
    pub known: Vec<(ObjectHeader, LoadedObjectHandle)>,
    pub lookups: Cell<usize>,
}

impl ObjectLookup for FixtureObjects {
    fn find_object_handle(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        self.lookups.set(self.lookups.get() + 1);
        self.known
            .iter()
            .find(|(known, _)| known == header)
            .map(|&(_, handle)| handle)
    }
}

/// Collaborators with COAL, IRON and FENCE loaded; GATE is not.
pub(crate) struct Collaborators {
    pub strings: FixtureStrings,
    pub images: FixtureImages,
    pub objects: FixtureObjects,
}

impl Collaborators {
    pub fn new() -> Self {
        let objects = FixtureObjects {
            known: vec![
                (coal(), LoadedObjectHandle::new(ObjectType::Cargo, 3)),
                (iron(), LoadedObjectHandle::new(ObjectType::Cargo, 5)),
                (fence(), LoadedObjectHandle::new(ObjectType::Wall, 1)),
            ],
            lookups: Cell::new(0),
        };
        Self {
            strings: FixtureStrings,
            images: FixtureImages::default(),
            objects,
        }
    }

    pub fn context(&mut self) -> LoadContext<'_> {
        LoadContext {
            handle: LoadedObjectHandle::new(ObjectType::Industry, 0),
            strings: &mut self.strings,
            images: &mut self.images,
            objects: &self.objects,
        }
    }
}
