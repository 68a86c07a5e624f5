//! A whole project: metadata, tracks and clips.

use serde::{Deserialize, Serialize};

use crate::clip::ClipInfo;
use crate::project::ProjectInfo;
use crate::track::TrackInfo;
use crate::validation::ValidationResult;

/// In-memory snapshot of one project container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub info: ProjectInfo,
    /// Tracks in persisted order.
    pub tracks: Vec<TrackInfo>,
    /// Clips in persisted order.
    pub clips: Vec<ClipInfo>,
}

impl ProjectDocument {
    pub fn new(info: ProjectInfo) -> Self {
        Self {
            info,
            tracks: Vec::new(),
            clips: Vec::new(),
        }
    }

    pub fn with_track(mut self, track: TrackInfo) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn with_clip(mut self, clip: ClipInfo) -> Self {
        self.clips.push(clip);
        self
    }

    /// Look up a track by id.
    pub fn track(&self, id: &str) -> Option<&TrackInfo> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Clips whose `track_id` equals `track_id`, in persisted order.
    pub fn clips_for_track<'a>(&'a self, track_id: &'a str) -> impl Iterator<Item = &'a ClipInfo> {
        self.clips.iter().filter(move |c| c.track_id == track_id)
    }

    /// Merge the diagnostics of every record.
    ///
    /// Duplicate track ids are errors. Clips pointing at unknown tracks are
    /// not flagged.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new(format!("Project '{}'", self.info.title));
        result.merge(self.info.validate());

        let mut seen = std::collections::BTreeSet::new();
        for track in &self.tracks {
            result.merge(track.validate());
            if !track.id.is_empty() && !seen.insert(track.id.as_str()) {
                result.add_error(format!("Duplicate track ID '{}'", track.id));
            }
        }
        for clip in &self.clips {
            result.merge(clip.validate());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackType;

    fn sample() -> ProjectDocument {
        ProjectDocument::new(ProjectInfo::new("Song", 128.0))
            .with_track(TrackInfo::new("t1", "Drums", TrackType::Audio))
            .with_track(TrackInfo::new("t2", "Bass", TrackType::Instrument))
            .with_clip(ClipInfo::new("c1", "Beat", "t1", 0.0, 4.0))
            .with_clip(ClipInfo::new("c2", "Line", "t2", 4.0, 8.0))
            .with_clip(ClipInfo::new("c3", "Fill", "t1", 8.0, 1.0))
    }

    #[test]
    fn test_valid_document() {
        let result = sample().validate();
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_clips_for_track() {
        let doc = sample();
        let ids: Vec<_> = doc.clips_for_track("t1").map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c1", "c3"]);
        assert!(doc.track("t2").is_some());
        assert!(doc.track("t9").is_none());
    }

    #[test]
    fn test_invalid_records_merge() {
        let doc = sample()
            .with_track(TrackInfo::new("t1", "", TrackType::Group))
            .with_clip(ClipInfo::new("", "x", "t1", -1.0, 0.0));
        let result = doc.validate();
        assert!(!result.is_valid);
        // empty name, duplicate id, empty clip id, zero duration, negative start
        assert_eq!(result.error_count(), 5);
    }

    #[test]
    fn test_dangling_track_reference_allowed() {
        let doc = sample().with_clip(ClipInfo::new("c9", "Orphan", "nope", 0.0, 1.0));
        assert!(doc.validate().is_valid);
    }
}
