//! Forward-only reader over one project file.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use dawproject_model::fs::require_file;
use dawproject_model::{ClipInfo, DataError, ProjectDocument, ProjectInfo, Result, TrackInfo};

use crate::engine::DataAccessEngine;

const SESSION: &str = "Reader";

/// Sequential pass over the tracks and clips of one project.
///
/// Closed until [`ProjectReader::open`] succeeds. Opening loads the whole
/// project; the reads then hand out records one at a time. Closing rewinds
/// both cursors and keeps the loaded data. Dropping an open reader closes it.
#[derive(Debug)]
pub struct ProjectReader<'engine> {
    engine: &'engine DataAccessEngine,
    path: PathBuf,
    is_open: bool,
    document: ProjectDocument,
    track_cursor: usize,
    clip_cursor: usize,
}

impl<'engine> ProjectReader<'engine> {
    pub(crate) fn new(engine: &'engine DataAccessEngine, path: &Path) -> Self {
        Self {
            engine,
            path: path.to_path_buf(),
            is_open: false,
            document: ProjectDocument::default(),
            track_cursor: 0,
            clip_cursor: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Load the project and rewind. Does nothing when already open.
    pub fn open(&mut self) -> Result<()> {
        if self.is_open {
            return Ok(());
        }
        require_file(&self.path)?;
        File::open(&self.path).map_err(|e| DataError::io("open", &self.path, e))?;

        self.document = self.engine.load_project(&self.path)?;
        self.track_cursor = 0;
        self.clip_cursor = 0;
        self.is_open = true;
        info!(
            path = %self.path.display(),
            tracks = self.document.tracks.len(),
            clips = self.document.clips.len(),
            "reader opened"
        );
        Ok(())
    }

    /// Rewind both cursors and leave the session. The loaded data stays.
    pub fn close(&mut self) {
        if self.is_open {
            debug!(path = %self.path.display(), "reader closed");
        }
        self.is_open = false;
        self.track_cursor = 0;
        self.clip_cursor = 0;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open {
            Ok(())
        } else {
            Err(DataError::NotOpen { session: SESSION })
        }
    }

    /// The project metadata, re-checked for a title and a positive tempo.
    pub fn read_project_info(&self) -> Result<ProjectInfo> {
        self.ensure_open()?;
        let info = &self.document.info;
        if info.title.is_empty() {
            return Err(DataError::invalid_format("Project title is empty"));
        }
        if info.tempo <= 0.0 || info.tempo.is_nan() {
            return Err(DataError::invalid_format(format!(
                "Invalid tempo: {}",
                info.tempo
            )));
        }
        Ok(info.clone())
    }

    /// The next track. A track with an empty id is an error; the cursor
    /// still moves past it.
    pub fn read_next_track(&mut self) -> Result<TrackInfo> {
        self.ensure_open()?;
        let track = self
            .document
            .tracks
            .get(self.track_cursor)
            .ok_or(DataError::EndOfStream { kind: "tracks" })?;
        let position = self.track_cursor;
        self.track_cursor += 1;
        if track.id.is_empty() {
            return Err(DataError::invalid_format(format!(
                "Track at position {position} has an empty ID"
            )));
        }
        Ok(track.clone())
    }

    /// The next clip. Empty ids and negative start times are errors; the
    /// cursor still moves past them.
    pub fn read_next_clip(&mut self) -> Result<ClipInfo> {
        self.ensure_open()?;
        let clip = self
            .document
            .clips
            .get(self.clip_cursor)
            .ok_or(DataError::EndOfStream { kind: "clips" })?;
        let position = self.clip_cursor;
        self.clip_cursor += 1;
        if clip.id.is_empty() {
            return Err(DataError::invalid_format(format!(
                "Clip at position {position} has an empty ID"
            )));
        }
        if clip.start_time.is_nan() || clip.start_time < 0.0 {
            return Err(DataError::invalid_format(format!(
                "Clip '{}' has invalid start time: {}",
                clip.id, clip.start_time
            )));
        }
        Ok(clip.clone())
    }

    pub fn has_more_tracks(&self) -> bool {
        self.track_cursor < self.document.tracks.len()
    }

    pub fn has_more_clips(&self) -> bool {
        self.clip_cursor < self.document.clips.len()
    }

    pub fn track_count(&self) -> usize {
        self.document.tracks.len()
    }

    pub fn clip_count(&self) -> usize {
        self.document.clips.len()
    }
}

impl Drop for ProjectReader<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
