//! Mixer channels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::validation::ValidationResult;

/// Kind of mixer channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    #[default]
    Audio,
    Instrument,
    Group,
    Return,
}

impl TrackType {
    /// Name used in the container format.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Instrument => "instrument",
            Self::Group => "group",
            Self::Return => "return",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackType {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "audio" => Ok(Self::Audio),
            "instrument" => Ok(Self::Instrument),
            "group" => Ok(Self::Group),
            "return" => Ok(Self::Return),
            other => Err(DataError::invalid_format(format!(
                "unknown track type '{other}'"
            ))),
        }
    }
}

/// One mixer channel. Identity is `id`; `order_index` only affects display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackInfo {
    pub id: String,
    pub name: String,
    pub track_type: TrackType,
    pub color: String,
    /// Linear gain, 0.0 to 1.0.
    pub volume: f64,
    /// -1.0 (left) to 1.0 (right).
    pub pan: f64,
    pub muted: bool,
    pub soloed: bool,
    pub order_index: i32,
    /// Instrument tracks only.
    pub instrument_id: Option<String>,
    /// Audio tracks only.
    pub audio_file: Option<String>,
}

impl Default for TrackInfo {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            track_type: TrackType::Audio,
            color: String::new(),
            volume: 1.0,
            pan: 0.0,
            muted: false,
            soloed: false,
            order_index: 0,
            instrument_id: None,
            audio_file: None,
        }
    }
}

impl TrackInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, track_type: TrackType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            track_type,
            ..Default::default()
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_pan(mut self, pan: f64) -> Self {
        self.pan = pan;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_order_index(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }

    /// Valid iff id and name are non-empty and volume is within 0..=1.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty() && (0.0..=1.0).contains(&self.volume)
    }

    /// Diagnostics for this record. Pan outside -1..=1 is a warning.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new(format!("Track '{}'", self.id));
        if self.id.is_empty() {
            result.add_error("Track ID cannot be empty");
        }
        if self.name.is_empty() {
            result.add_error(format!("Track '{}' name cannot be empty", self.id));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            result.add_error(format!(
                "Track '{}' volume {} is outside 0.0..=1.0",
                self.id, self.volume
            ));
        }
        if !(-1.0..=1.0).contains(&self.pan) {
            result.add_warning(format!(
                "Track '{}' pan {} is outside -1.0..=1.0",
                self.id, self.pan
            ));
        }
        result
    }
}
