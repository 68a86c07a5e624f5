//! Timed regions placed on a track.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationResult;

/// A placed audio or MIDI region.
///
/// `track_id` is a back-reference by id; it is not checked against the
/// project's track list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipInfo {
    pub id: String,
    pub name: String,
    pub track_id: String,
    /// Seconds from the project start.
    pub start_time: f64,
    /// Seconds.
    pub duration: f64,
    pub playback_rate: f64,
    pub fade_in_time: f64,
    pub fade_out_time: f64,
    pub content_id: Option<String>,
    pub audio_file: Option<String>,
}

impl Default for ClipInfo {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            track_id: String::new(),
            start_time: 0.0,
            duration: 0.0,
            playback_rate: 1.0,
            fade_in_time: 0.0,
            fade_out_time: 0.0,
            content_id: None,
            audio_file: None,
        }
    }
}

impl ClipInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        track_id: impl Into<String>,
        start_time: f64,
        duration: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            track_id: track_id.into(),
            start_time,
            duration,
            ..Default::default()
        }
    }

    pub fn with_fades(mut self, fade_in_time: f64, fade_out_time: f64) -> Self {
        self.fade_in_time = fade_in_time;
        self.fade_out_time = fade_out_time;
        self
    }

    pub fn with_audio_file(mut self, audio_file: impl Into<String>) -> Self {
        self.audio_file = Some(audio_file.into());
        self
    }

    /// End of the clip in seconds.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Valid iff id, name and track id are non-empty, duration is positive
    /// and the start time is not negative.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && !self.name.is_empty()
            && !self.track_id.is_empty()
            && self.duration > 0.0
            && self.start_time >= 0.0
    }

    /// Diagnostics for this record. Fades longer than the clip are warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new(format!("Clip '{}'", self.id));
        if self.id.is_empty() {
            result.add_error("Clip ID cannot be empty");
        }
        if self.name.is_empty() {
            result.add_error(format!("Clip '{}' name cannot be empty", self.id));
        }
        if self.track_id.is_empty() {
            result.add_error(format!("Clip '{}' has no track ID", self.id));
        }
        if self.duration.is_nan() || self.duration <= 0.0 {
            result.add_error(format!(
                "Clip '{}' duration must be greater than 0 (got {})",
                self.id, self.duration
            ));
        }
        if self.start_time.is_nan() || self.start_time < 0.0 {
            result.add_error(format!(
                "Clip '{}' has invalid start time: {}",
                self.id, self.start_time
            ));
        }
        if self.duration > 0.0 && self.fade_in_time + self.fade_out_time > self.duration {
            result.add_warning(format!("Clip '{}' fades are longer than the clip", self.id));
        }
        result
    }
}
