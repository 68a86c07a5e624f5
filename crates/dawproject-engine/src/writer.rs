//! Buffered sequential writer for one project file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use dawproject_model::fs::{ensure_parent_dir, write_atomic};
use dawproject_model::{ClipInfo, DataError, ProjectInfo, Result, TrackInfo};
use dawproject_xml::ProjectElement;
use dawproject_xml::codec::{footer, header};

use crate::config::EngineConfig;
use crate::rules::{check_clip, check_project_info, check_track};

const SESSION: &str = "Writer";

/// Accumulates a project in memory and writes it on [`ProjectWriter::finalize`].
///
/// Each `write_*` call returns the size of the element it appended. The
/// buffer never grows past `max_buffer_size`; a write that would cross it
/// fails and leaves the buffer unchanged. Dropping an open writer discards
/// the buffer without touching the target.
#[derive(Debug)]
pub struct ProjectWriter {
    path: PathBuf,
    config: EngineConfig,
    is_open: bool,
    buffer: String,
}

impl ProjectWriter {
    pub(crate) fn new(path: &Path, config: EngineConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            config,
            is_open: false,
            buffer: String::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Bytes currently buffered.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Check the target can be written and start the buffer.
    /// Does nothing when already open.
    pub fn open(&mut self) -> Result<()> {
        if self.is_open {
            return Ok(());
        }
        ensure_parent_dir(&self.path)?;

        let existed = self.path.exists();
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| DataError::io("open for writing", &self.path, e))?;
        if !existed {
            // The probe created the file; finalize writes the real one.
            let _ = fs::remove_file(&self.path);
        }

        self.buffer = header();
        self.is_open = true;
        debug!(path = %self.path.display(), "writer opened");
        Ok(())
    }

    /// Leave the session and drop the buffer.
    pub fn close(&mut self) {
        if self.is_open && !self.buffer.is_empty() {
            warn!(
                path = %self.path.display(),
                buffered = self.buffer.len(),
                "writer closed without finalize, discarding buffer"
            );
        }
        self.is_open = false;
        self.buffer.clear();
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open {
            Ok(())
        } else {
            Err(DataError::NotOpen { session: SESSION })
        }
    }

    fn append(&mut self, fragment: &str) -> Result<usize> {
        let requested = self.buffer.len() + fragment.len();
        if requested > self.config.max_buffer_size {
            return Err(DataError::BufferLimit {
                requested,
                limit: self.config.max_buffer_size,
            });
        }
        self.buffer.push_str(fragment);
        Ok(fragment.len())
    }

    pub fn write_project_info(&mut self, info: &ProjectInfo) -> Result<usize> {
        self.ensure_open()?;
        check_project_info(info, &self.config)?;
        self.append(&info.to_fragment()?)
    }

    pub fn write_track(&mut self, track: &TrackInfo) -> Result<usize> {
        self.ensure_open()?;
        check_track(track)?;
        self.append(&track.to_fragment()?)
    }

    pub fn write_clip(&mut self, clip: &ClipInfo) -> Result<usize> {
        self.ensure_open()?;
        check_clip(clip)?;
        self.append(&clip.to_fragment()?)
    }

    /// Close the root element, write the file and end the session.
    ///
    /// Returns the total number of bytes written. If the write fails the
    /// session stays open with the buffer as it was.
    pub fn finalize(&mut self) -> Result<usize> {
        self.ensure_open()?;
        let body_len = self.buffer.len();
        self.buffer.push_str(&footer());

        if let Err(e) = write_atomic(&self.path, self.buffer.as_bytes()) {
            self.buffer.truncate(body_len);
            return Err(e);
        }
        if !self.path.exists() {
            self.buffer.truncate(body_len);
            return Err(DataError::NotFound {
                path: self.path.clone(),
            });
        }

        let total = self.buffer.len();
        info!(path = %self.path.display(), size = total, "project written");
        self.is_open = false;
        self.buffer.clear();
        Ok(total)
    }
}

impl Drop for ProjectWriter {
    fn drop(&mut self) {
        self.close();
    }
}
