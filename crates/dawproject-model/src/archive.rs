use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One named blob inside a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Entry name as stored in the archive.
    pub name: String,
    /// Path of the archive holding this entry.
    pub path: String,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub is_directory: bool,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Valid iff the name is non-empty.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// Compression ratio (compressed / uncompressed), 1.0 for empty entries.
    pub fn compression_ratio(&self) -> f64 {
        if self.uncompressed_size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.uncompressed_size as f64
        }
    }
}
