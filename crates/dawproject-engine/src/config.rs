//! Engine limits and accepted file types.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dawproject_model::{DataError, Result};

const MIB: u64 = 1024 * 1024;

/// Limits and file-type rules used by the engine and its sessions.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// max_file_size = 52428800
/// allowed_extensions = ["dawproject"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Files above this size are refused (bytes).
    pub max_file_size: u64,

    /// Files above this size pass validation with a warning (bytes).
    pub warn_file_size: u64,

    /// Ceiling for a writer's in-memory buffer (bytes).
    pub max_buffer_size: usize,

    /// Longest accepted track id filter, in characters.
    pub max_track_id_len: usize,

    /// Longest accepted artist name, in characters.
    pub max_artist_len: usize,

    /// Highest accepted tempo when saving.
    pub max_tempo: f64,

    /// Extensions accepted for project files and save targets.
    pub allowed_extensions: Vec<String>,

    /// Extensions that `validate_file` accepts without a warning.
    pub validation_extensions: Vec<String>,

    /// Entry holding the project XML inside a ZIP container.
    pub archive_project_entry: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_size: 100 * MIB,
            warn_file_size: 50 * MIB,
            max_buffer_size: 10 * 1024 * 1024,
            max_track_id_len: 256,
            max_artist_len: 256,
            max_tempo: 999.0,
            allowed_extensions: vec!["dawproject".to_string(), "xml".to_string()],
            validation_extensions: vec![
                "dawproject".to_string(),
                "xml".to_string(),
                "zip".to_string(),
            ],
            archive_project_entry: "project.xml".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| DataError::invalid_format(format!("invalid engine config: {e}")))?;
        config.check()?;
        Ok(config)
    }

    /// Load a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DataError::io("read", path, e))?;
        Self::from_toml_str(&content).map_err(|e| e.loading(path))
    }

    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    #[must_use]
    pub fn with_warn_file_size(mut self, bytes: u64) -> Self {
        self.warn_file_size = bytes;
        self
    }

    #[must_use]
    pub fn with_max_buffer_size(mut self, bytes: usize) -> Self {
        self.max_buffer_size = bytes;
        self
    }

    #[must_use]
    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_archive_project_entry(mut self, name: impl Into<String>) -> Self {
        self.archive_project_entry = name.into();
        self
    }

    /// Whether `extension` (without the dot) may be loaded or saved.
    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }

    /// Whether `validate_file` accepts `extension` without a warning.
    pub fn expects_extension(&self, extension: &str) -> bool {
        self.validation_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    }

    fn check(&self) -> Result<()> {
        if self.allowed_extensions.is_empty() {
            return Err(DataError::invalid_format(
                "allowed_extensions cannot be empty",
            ));
        }
        if self.archive_project_entry.is_empty() {
            return Err(DataError::invalid_format(
                "archive_project_entry cannot be empty",
            ));
        }
        if self.max_tempo.is_nan() || self.max_tempo <= 0.0 {
            return Err(DataError::invalid_format("max_tempo must be positive"));
        }
        Ok(())
    }
}
