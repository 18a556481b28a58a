//! Object header - the 16-byte key identifying a loadable object.
//!
//! Every object file starts with one, and objects reference each other
//! (an industry naming its cargo, for example) by embedding the header of
//! the referenced object.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::span::SENTINEL;

/// Kind of object, stored in the low six bits of the header flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ObjectType {
    InterfaceSkin = 0,
    Sound = 1,
    Currency = 2,
    Steam = 3,
    CliffEdge = 4,
    Water = 5,
    Land = 6,
    TownNames = 7,
    Cargo = 8,
    Wall = 9,
    TrainSignal = 10,
    LevelCrossing = 11,
    StreetLight = 12,
    Tunnel = 13,
    Bridge = 14,
    TrainStation = 15,
    TrackExtra = 16,
    Track = 17,
    RoadStation = 18,
    RoadExtra = 19,
    Road = 20,
    Airport = 21,
    Dock = 22,
    Vehicle = 23,
    Tree = 24,
    Snow = 25,
    Climate = 26,
    HillShapes = 27,
    Building = 28,
    Scaffolding = 29,
    Industry = 30,
    Region = 31,
    Competitor = 32,
    ScenarioText = 33,
}

/// Fixed-size binary key of an external object.
///
/// Compared by all 16 bytes. A header slot whose first byte is `0xFF`
/// marks an absent reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ObjectHeader {
    flags: U32,
    name: [u8; 8],
    checksum: U32,
}

impl ObjectHeader {
    /// Size of an encoded header in bytes.
    pub const SIZE: usize = 16;

    /// Build a header from its parts.
    pub fn new(object_type: ObjectType, name: &str, checksum: u32) -> Self {
        let mut padded = [b' '; 8];
        for (dst, src) in padded.iter_mut().zip(name.bytes()) {
            *dst = src;
        }
        Self {
            flags: U32::new(u8::from(object_type) as u32),
            name: padded,
            checksum: U32::new(checksum),
        }
    }

    /// Raw flags word.
    #[inline]
    pub fn flags(&self) -> u32 {
        self.flags.get()
    }

    /// Raw 8-byte name.
    #[inline]
    pub fn raw_name(&self) -> &[u8; 8] {
        &self.name
    }

    /// Name with trailing padding removed.
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.name)
            .trim_end_matches([' ', '\0'])
            .to_string()
    }

    /// Stored checksum.
    #[inline]
    pub fn checksum(&self) -> u32 {
        self.checksum.get()
    }

    /// Raw object type bits.
    #[inline]
    pub fn type_bits(&self) -> u8 {
        (self.flags.get() & 0x3F) as u8
    }

    /// Decoded object type, if the bits name a known type.
    pub fn object_type(&self) -> Option<ObjectType> {
        ObjectType::try_from(self.type_bits()).ok()
    }

    /// Which game the object originates from (bits 6-7 of the flags).
    #[inline]
    pub fn source_game(&self) -> u8 {
        ((self.flags.get() >> 6) & 0x3) as u8
    }

    /// Check whether a header slot starting with these bytes is absent.
    #[inline]
    pub fn is_absent_slot(slot: &[u8]) -> bool {
        slot.first() == Some(&SENTINEL)
    }

    /// Compute the checksum of an object's header and decoded payload.
    pub fn compute_checksum(&self, data: &[u8]) -> u32 {
        crate::checksum::object_checksum(self.flags.get() as u8, &self.name, data)
    }
}

impl fmt::Debug for ObjectHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHeader({})", self)
    }
}

impl fmt::Display for ObjectHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object_type() {
            Some(ty) => write!(f, "{:?}:{} ({:08x})", ty, self.name(), self.checksum()),
            None => write!(f, "#{}:{} ({:08x})", self.type_bits(), self.name(), self.checksum()),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ObjectHeader {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ObjectHeader", 3)?;
        state.serialize_field("type", &self.object_type())?;
        state.serialize_field("name", &self.name())?;
        state.serialize_field("checksum", &self.checksum())?;
        state.end()
    }
}
