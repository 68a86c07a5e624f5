//! Project-level metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationResult;

/// Default time signature for new projects.
pub const DEFAULT_TIME_SIGNATURE: &str = "4/4";

/// Project metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Beats per minute.
    pub tempo: f64,
    /// e.g. "4/4".
    pub time_signature: String,
    pub key: String,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl ProjectInfo {
    /// Create metadata with a title and tempo, stamped with the current time.
    pub fn new(title: impl Into<String>, tempo: f64) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            tempo,
            time_signature: DEFAULT_TIME_SIGNATURE.to_string(),
            created: Some(now),
            modified: Some(now),
            ..Default::default()
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Some(Utc::now());
    }

    /// Valid iff the title is non-empty and the tempo is positive.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && self.has_positive_tempo()
    }

    /// False for zero, negative and NaN tempos.
    fn has_positive_tempo(&self) -> bool {
        self.tempo > 0.0
    }

    /// Every problem with this record, including ones that do not affect
    /// [`ProjectInfo::is_valid`].
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.is_empty() {
            errors.push("Project title cannot be empty".to_string());
        }
        if !self.has_positive_tempo() {
            errors.push("Project tempo must be greater than 0".to_string());
        }
        if self.time_signature.is_empty() {
            errors.push("Time signature cannot be empty".to_string());
        }
        errors
    }

    /// Diagnostics for this record. A missing time signature is a warning.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new(format!("ProjectInfo '{}'", self.title));
        if self.title.is_empty() {
            result.add_error("Project title cannot be empty");
        }
        if !self.has_positive_tempo() {
            result.add_error(format!(
                "Project tempo must be greater than 0 (got {})",
                self.tempo
            ));
        }
        if self.time_signature.is_empty() {
            result.add_warning("Time signature cannot be empty");
        }
        result
    }
}
