//! Data access for DAWproject files.
//!
//! [`DataAccessEngine`] loads, saves and validates whole projects through an
//! [`XmlProcessor`](dawproject_xml::XmlProcessor) and an
//! [`ArchiveProcessor`](dawproject_archive::ArchiveProcessor). It also hands
//! out streaming sessions: a forward-only [`ProjectReader`] and a buffered
//! [`ProjectWriter`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use dawproject_engine::DataAccessEngine;
//! use dawproject_model::ProjectInfo;
//!
//! let engine = DataAccessEngine::with_defaults();
//! let mut writer = engine.create_writer(Path::new("out.dawproject"))?;
//! writer.open()?;
//! writer.write_project_info(&ProjectInfo::new("Demo", 120.0))?;
//! let size = writer.finalize()?;
//!
//! let info = engine.load_project_info(Path::new("out.dawproject"))?;
//! assert_eq!(info.title, "Demo");
//! # let _ = size;
//! # Ok::<(), dawproject_model::DataError>(())
//! ```

pub mod config;
pub mod engine;
pub mod reader;
mod rules;
pub mod writer;

pub use config::EngineConfig;
pub use engine::{DataAccessEngine, EngineBuilder};
pub use reader::ProjectReader;
pub use writer::ProjectWriter;

pub use dawproject_model::{
    ArchiveEntry, ClipInfo, DataError, Outcome, ProjectDocument, ProjectInfo, Result, TrackInfo,
    TrackType, ValidationResult, WriteOutcome,
};
