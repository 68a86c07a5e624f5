//! Whole-project load, save and validation.

use std::path::Path;

use tracing::{debug, info, warn};

use dawproject_archive::{ArchiveProcessor, ZipArchiveProcessor, has_zip_signature};
use dawproject_model::fs::{extension, is_readable, require_file, require_file_within, write_atomic};
use dawproject_model::{
    ClipInfo, DataError, ProjectDocument, ProjectInfo, Result, TrackInfo, ValidationResult,
};
use dawproject_xml::{QuickXmlProcessor, XmlProcessor, document_from_node, render_project};

use crate::config::EngineConfig;
use crate::reader::ProjectReader;
use crate::rules::{
    check_clip, check_extension, check_project_info, check_target_path, check_track,
    check_track_filter,
};
use crate::writer::ProjectWriter;

/// Assembles a [`DataAccessEngine`] from its collaborators.
///
/// Both processors are required; [`EngineBuilder::build`] fails with
/// [`DataError::MissingCollaborator`] when one is absent.
#[derive(Default)]
pub struct EngineBuilder {
    xml: Option<Box<dyn XmlProcessor>>,
    archive: Option<Box<dyn ArchiveProcessor>>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn xml_processor(mut self, processor: impl XmlProcessor + 'static) -> Self {
        self.xml = Some(Box::new(processor));
        self
    }

    #[must_use]
    pub fn archive_processor(mut self, processor: impl ArchiveProcessor + 'static) -> Self {
        self.archive = Some(Box::new(processor));
        self
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<DataAccessEngine> {
        let xml = self
            .xml
            .ok_or(DataError::MissingCollaborator("XML processor"))?;
        let archive = self
            .archive
            .ok_or(DataError::MissingCollaborator("Archive processor"))?;
        Ok(DataAccessEngine {
            xml,
            archive,
            config: self.config,
        })
    }
}

/// Entry point for loading, saving and validating projects, and factory
/// for streaming sessions.
pub struct DataAccessEngine {
    xml: Box<dyn XmlProcessor>,
    archive: Box<dyn ArchiveProcessor>,
    config: EngineConfig,
}

impl std::fmt::Debug for DataAccessEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataAccessEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DataAccessEngine {
    /// Engine over quick-xml and zip with the default configuration.
    pub fn with_defaults() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Engine over quick-xml and zip, limited by `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            xml: Box::new(QuickXmlProcessor::new().with_max_document_size(config.max_file_size)),
            archive: Box::new(
                ZipArchiveProcessor::new().with_max_archive_size(config.max_file_size),
            ),
            config,
        }
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn xml_processor(&self) -> &dyn XmlProcessor {
        self.xml.as_ref()
    }

    pub fn archive_processor(&self) -> &dyn ArchiveProcessor {
        self.archive.as_ref()
    }

    /// Metadata of the project at `path`.
    pub fn load_project_info(&self, path: &Path) -> Result<ProjectInfo> {
        Ok(self.load_project(path)?.info)
    }

    /// Tracks of the project at `path`, in persisted order.
    pub fn load_tracks(&self, path: &Path) -> Result<Vec<TrackInfo>> {
        Ok(self.load_project(path)?.tracks)
    }

    /// Clips of the project at `path`.
    ///
    /// `None` returns every clip; `Some(id)` only the clips on that track.
    pub fn load_clips(&self, path: &Path, track_id: Option<&str>) -> Result<Vec<ClipInfo>> {
        if let Some(id) = track_id {
            check_track_filter(id, &self.config)?;
        }
        let document = self.load_project(path)?;
        Ok(match track_id {
            Some(id) => document.clips_for_track(id).cloned().collect(),
            None => document.clips,
        })
    }

    /// Everything in the project at `path`.
    pub fn load_project(&self, path: &Path) -> Result<ProjectDocument> {
        let size = require_file_within(path, self.config.max_file_size)?;
        std::fs::File::open(path).map_err(|e| DataError::io("open", path, e))?;
        debug!(path = %path.display(), size, "loading project");

        let document = self.read_document(path).map_err(|e| e.loading(path))?;
        info!(
            path = %path.display(),
            tracks = document.tracks.len(),
            clips = document.clips.len(),
            "loaded project"
        );
        Ok(document)
    }

    fn read_document(&self, path: &Path) -> Result<ProjectDocument> {
        let root = if has_zip_signature(path) {
            let entry = &self.config.archive_project_entry;
            debug!(path = %path.display(), entry = %entry, "reading project from archive");
            let bytes = self.archive.extract_entry(path, entry)?;
            let content = String::from_utf8(bytes).map_err(|e| {
                DataError::invalid_format(format!("entry '{entry}' is not UTF-8: {e}"))
            })?;
            self.xml.parse_document(&content)?
        } else {
            self.xml.load_document(path)?
        };
        document_from_node(&root)
    }

    /// Write a project file. Returns the size of the written file.
    ///
    /// The path may not contain `..` and must carry an allowed extension.
    /// Parent directories are created and the file is replaced atomically.
    pub fn save_project(
        &self,
        project: &ProjectInfo,
        tracks: &[TrackInfo],
        clips: &[ClipInfo],
        path: &Path,
    ) -> Result<usize> {
        let document = ProjectDocument {
            info: project.clone(),
            tracks: tracks.to_vec(),
            clips: clips.to_vec(),
        };
        self.save_document(&document, path)
    }

    /// Save a [`ProjectDocument`]. Same checks as [`Self::save_project`].
    pub fn save_document(&self, document: &ProjectDocument, path: &Path) -> Result<usize> {
        check_target_path(path, &self.config)?;
        check_project_info(&document.info, &self.config)?;
        document.tracks.iter().try_for_each(check_track)?;
        document.clips.iter().try_for_each(check_clip)?;

        let text = render_project(document)?;
        let size = write_atomic(path, text.as_bytes())?;
        info!(
            path = %path.display(),
            size,
            tracks = document.tracks.len(),
            clips = document.clips.len(),
            "saved project"
        );
        Ok(size as usize)
    }

    /// File-level checks. Never fails; problems are reported in the result.
    pub fn validate_file(&self, path: &Path) -> ValidationResult {
        let mut result = ValidationResult::new(path.display().to_string());
        let metadata = match require_file(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                result.add_error(e.to_string());
                return result;
            }
        };

        let size = metadata.len();
        if size > self.config.warn_file_size {
            result.add_warning(format!(
                "File is very large: {size} bytes (warning threshold {} bytes)",
                self.config.warn_file_size
            ));
        } else if size == 0 {
            result.add_warning("File is empty");
        }

        if !is_readable(path) {
            result.add_error(format!("File is not readable: {}", path.display()));
        }

        match extension(path) {
            Some(ext) if self.config.expects_extension(&ext) => {}
            Some(ext) => result.add_warning(format!("Unexpected file extension: .{ext}")),
            None => result.add_warning("File has no extension"),
        }

        if !result.is_valid {
            warn!(path = %path.display(), errors = result.error_count(), "file failed validation");
        }
        result
    }

    /// [`DataAccessEngine::validate_file`] plus the diagnostics of every
    /// record in the project.
    pub fn validate_project(&self, path: &Path) -> ValidationResult {
        let mut result = self.validate_file(path);
        if !result.is_valid {
            return result;
        }
        match self.load_project(path) {
            Ok(document) => result.merge(document.validate()),
            Err(e) => result.add_error(e.to_string()),
        }
        result
    }

    /// Quick yes/no: exists, readable, non-empty, within the size limit and
    /// with an allowed extension.
    pub fn is_valid_project_file(&self, path: &Path) -> bool {
        let Ok(metadata) = require_file(path) else {
            return false;
        };
        (1..=self.config.max_file_size).contains(&metadata.len())
            && is_readable(path)
            && check_extension(path, &self.config).is_ok()
    }

    /// Streaming reader over `path`. The file is checked when the reader
    /// is opened.
    pub fn create_reader(&self, path: &Path) -> Result<ProjectReader<'_>> {
        if path.as_os_str().is_empty() {
            return Err(DataError::invalid_input("File path cannot be empty"));
        }
        Ok(ProjectReader::new(self, path))
    }

    /// Streaming writer targeting `path`. Creates missing parent directories.
    pub fn create_writer(&self, path: &Path) -> Result<ProjectWriter> {
        if path.as_os_str().is_empty() {
            return Err(DataError::invalid_input("File path cannot be empty"));
        }
        check_extension(path, &self.config)?;
        dawproject_model::fs::ensure_parent_dir(path)?;
        Ok(ProjectWriter::new(path, self.config.clone()))
    }
}
