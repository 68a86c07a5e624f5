//! Record types for DAWproject containers.
//!
//! This crate holds the document model shared by the XML codec, the archive
//! processor and the data access engine:
//!
//! - [`ProjectInfo`], [`TrackInfo`], [`ClipInfo`] - one record per element
//! - [`ProjectDocument`] - a whole project (metadata, tracks, clips)
//! - [`ArchiveEntry`] - one named blob inside a container
//! - [`ValidationResult`] - accumulated errors and warnings
//! - [`Outcome`] - flat success/error envelope for callers that want one
//! - [`DataError`] - the error type returned by every fallible operation
//! - [`fs`] - path checks and atomic writes
//!
//! # Example
//!
//! ```
//! use dawproject_model::{ProjectInfo, TrackInfo, TrackType};
//!
//! let info = ProjectInfo::new("Demo Song", 120.0);
//! assert!(info.is_valid());
//!
//! let track = TrackInfo::new("track-1", "Drums", TrackType::Audio);
//! assert!(track.is_valid());
//! ```

pub mod archive;
pub mod clip;
pub mod document;
pub mod error;
pub mod fs;
pub mod outcome;
pub mod project;
pub mod track;
pub mod validation;

pub use archive::ArchiveEntry;
pub use clip::ClipInfo;
pub use document::ProjectDocument;
pub use error::{DataError, Result};
pub use outcome::{Outcome, WriteOutcome};
pub use project::ProjectInfo;
pub use track::{TrackInfo, TrackType};
pub use validation::ValidationResult;
