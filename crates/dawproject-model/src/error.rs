//! Error types for project data access.
//!
//! Every public operation of the engine, the reader, the writer and the
//! collaborators returns [`Result`]. Messages embed the offending path or
//! value so they can be shown to a user or logged verbatim.

use std::path::PathBuf;
use thiserror::Error;

/// Project data access error.
#[derive(Debug, Error)]
pub enum DataError {
    /// An argument or record field failed validation.
    #[error("{message}")]
    InvalidInput { message: String },

    /// The path does not exist.
    #[error("File does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    /// The path exists but is not a regular file.
    #[error("Path is not a regular file: {}", path.display())]
    NotAFile { path: PathBuf },

    /// File system operation failed.
    #[error("Failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is larger than the configured limit.
    #[error("File too large: {size} bytes (limit {limit} bytes): {}", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The writer buffer would grow past its ceiling.
    #[error("XML buffer size limit exceeded: {requested} bytes (limit {limit} bytes)")]
    BufferLimit { requested: usize, limit: usize },

    /// Well-formed XML that does not describe a project.
    #[error("Invalid project format: {reason}")]
    InvalidFormat { reason: String },

    /// Malformed XML.
    #[error("XML error: {message}")]
    Xml { message: String },

    /// ZIP container could not be read or written.
    #[error("Archive error: {message}")]
    Archive { message: String },

    /// A streaming session method was called while closed.
    #[error("{session} not open")]
    NotOpen { session: &'static str },

    /// A streaming read ran past the last record.
    #[error("No more {kind} available")]
    EndOfStream { kind: &'static str },

    /// A required collaborator was not supplied at construction.
    #[error("{0} cannot be missing")]
    MissingCollaborator(&'static str),

    /// Loading a container failed.
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<DataError>,
    },
}

impl DataError {
    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Create an Xml error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Create an Archive error.
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive {
            message: message.into(),
        }
    }

    /// Create an Io error for `operation` on `path`.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Wrap this error with the container path it occurred in.
    #[must_use]
    pub fn loading(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // Already carries the path.
            Self::NotFound { .. } | Self::NotAFile { .. } | Self::FileTooLarge { .. } => self,
            Self::Load { .. } => self,
            other => Self::Load {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Stable numeric code for this error, used by [`crate::Outcome`].
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidInput { .. } => 1,
            Self::NotFound { .. } => 2,
            Self::NotAFile { .. } => 3,
            Self::Io { .. } => 4,
            Self::FileTooLarge { .. } => 5,
            Self::BufferLimit { .. } => 6,
            Self::InvalidFormat { .. } => 7,
            Self::Xml { .. } => 8,
            Self::Archive { .. } => 9,
            Self::NotOpen { .. } => 10,
            Self::MissingCollaborator(_) => 11,
            Self::EndOfStream { .. } => 12,
            Self::Load { source, .. } => source.code(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { reason } => {
                format!("The file is not a valid project file: {reason}")
            }
            Self::FileTooLarge { path, limit, .. } => format!(
                "The file at {} is larger than the {} MiB limit",
                path.display(),
                limit / (1024 * 1024)
            ),
            Self::Load { path, source } => {
                format!("Could not load {}. {}", path.display(), source.user_message())
            }
            other => other.to_string(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Check the path and that the file has not been moved."),
            Self::NotAFile { .. } => Some("Select a project file, not a directory."),
            Self::Io { operation, .. } => {
                if *operation == "read" || *operation == "open" {
                    Some("Check that you have permission to read this file.")
                } else {
                    Some("Check disk space and that you can write to this location.")
                }
            }
            Self::FileTooLarge { .. } | Self::BufferLimit { .. } => {
                Some("Split the project or remove unused tracks and clips.")
            }
            Self::InvalidFormat { .. } | Self::Xml { .. } | Self::Archive { .. } => {
                Some("Make sure the file is a .dawproject or .xml project file.")
            }
            Self::Load { source, .. } => source.suggestion(),
            Self::InvalidInput { .. }
            | Self::NotOpen { .. }
            | Self::EndOfStream { .. }
            | Self::MissingCollaborator(_) => None,
        }
    }
}

/// Result type alias for project data access.
pub type Result<T> = std::result::Result<T, DataError>;
