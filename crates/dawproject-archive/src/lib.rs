//! ZIP container access for DAWproject files.
//!
//! The engine talks to containers through [`ArchiveProcessor`];
//! [`ZipArchiveProcessor`] is the implementation backed by the `zip` crate.

pub mod processor;

pub use processor::{
    ArchiveProcessor, DEFAULT_MAX_ARCHIVE_SIZE, ZipArchiveProcessor, has_zip_signature,
};
