//! Locobj - Locomotion object file decoding library.
//!
//! This crate provides a unified interface to the locobj crates.
//!
//! # Crates
//!
//! - [`locobj_common`] - Span cursor, object headers, checksum, loader interfaces
//! - [`locobj_industry`] - Industry object decoding, validation and geometry
//! - [`locobj_dat`] - Object file container and reference collaborators
//!
//! # Example
//!
//! ```no_run
//! use locobj::prelude::*;
//!
//! let file = ObjectFile::open("INDCOAL.DAT")?;
//! let mut env = LoadEnvironment::new();
//! let mut dependencies = DependentObjects::default();
//!
//! let industry = locobj::decode_industry(&file, &mut env, Some(&mut dependencies))?;
//! println!("{}: valid = {}", env.text(industry.name), industry.validate());
//! # Ok::<(), locobj::Error>(())
//! ```

use thiserror::Error;
use tracing::debug;

// Re-export all sub-crates
pub use locobj_common as common;
pub use locobj_dat as dat;
pub use locobj_industry as industry;

use locobj_common::{DependencySink, ObjectHeader, ObjectType};
use locobj_dat::{LoadEnvironment, ObjectFile};
use locobj_industry::IndustryObject;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use locobj_common::{
        DependencySink, DependentObjects, LoadContext, LoadedObjectHandle, ObjectHeader,
        ObjectType, StringId,
    };
    pub use locobj_dat::{LoadEnvironment, ObjectFile, ObjectRegistry};
    pub use locobj_industry::{IndustryFlags, IndustryObject, PreviewLayer};
}

/// Errors from decoding an object file.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Dat(#[from] locobj_dat::Error),

    #[error(transparent)]
    Industry(#[from] locobj_industry::Error),

    /// The file holds some other kind of object.
    #[error("{0} is not an industry object")]
    NotIndustry(ObjectHeader),

    /// No more objects of this type can be loaded.
    #[error("cannot register {0}")]
    Register(ObjectHeader),
}

/// Result type for locobj operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Decode an industry object file and register it in `env`.
///
/// The returned object borrows the file's payload. When decoding fails the
/// object is not registered and the strings and images it loaded are dropped.
pub fn decode_industry<'a>(
    file: &'a ObjectFile,
    env: &mut LoadEnvironment,
    dependencies: Option<&mut dyn DependencySink>,
) -> Result<IndustryObject<'a>> {
    let header = *file.header();
    if header.object_type() != Some(ObjectType::Industry) {
        return Err(Error::NotIndustry(header));
    }

    let handle = env.objects.next_handle(&header).ok_or(Error::Register(header))?;
    let checkpoint = env.checkpoint();
    let decoded = IndustryObject::decode(file.data(), &mut env.context(handle), dependencies);
    match decoded {
        Ok(object) => {
            env.objects.register(header);
            debug!(%header, "decoded industry file");
            Ok(object)
        }
        Err(err) => {
            env.rollback(checkpoint);
            Err(err.into())
        }
    }
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
