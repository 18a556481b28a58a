//! Industry object decoder for Locomotion object files.
//!
//! An industry object describes a class of industry: its names, the parts
//! its buildings are stacked from, animations, the cargo it produces and
//! consumes, and the walls around it. This crate decodes the object payload
//! into an [`IndustryObject`] whose variable-length sections borrow the
//! payload buffer, checks the result with [`IndustryObject::validate`], and
//! derives drawing data from it.
//!
//! # Payload Layout
//!
//! - 0xF4-byte fixed header (counts, costs, flags)
//! - 8 string tables
//! - Building part heights and animations (one per part)
//! - 4 animation sequences (size byte + frames)
//! - Animation records, terminated by a `0xFF` tag
//! - One `0xFF`-terminated part list per building variation
//! - Building list (`max_num_buildings` bytes)
//! - 11 object header slots: produced cargo, required cargo, walls,
//!   building wall, building wall entrance
//! - Image table, running to the end of the payload
//!
//! # Example
//!
//! ```no_run
//! use locobj_common::{DependentObjects, LoadContext};
//! use locobj_industry::IndustryObject;
//!
//! fn inspect(data: &[u8], ctx: &mut LoadContext<'_>) -> locobj_industry::Result<()> {
//!     let mut dependencies = DependentObjects::default();
//!     let industry = IndustryObject::decode(data, ctx, Some(&mut dependencies))?;
//!
//!     println!("valid: {}", industry.validate());
//!     println!("parts of variation 0: {:?}", industry.building_parts(0));
//!     println!("requires {} objects", dependencies.required.len());
//!     Ok(())
//! }
//! ```

mod cargo;
mod error;
mod geometry;
mod object;
mod validate;

#[cfg(test)]
mod fixture;

pub use error::{Error, Result};
pub use geometry::PreviewLayer;
pub use object::{
    AnimationRecord, BuildingPartAnimation, IndustryFlags, IndustryObject, ObjectId,
    ProductionRateRange, ANIMATION_SEQUENCE_COUNT, HEADER_SIZE, MAX_BUILDING_VARIATIONS,
    PRODUCED_CARGO_COUNT, REQUIRED_CARGO_COUNT, WALL_TYPE_COUNT,
};
