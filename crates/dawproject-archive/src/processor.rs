//! Archive processor collaborator.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use dawproject_model::fs::{ensure_parent_dir, require_file, require_file_within};
use dawproject_model::{ArchiveEntry, DataError, Result};

/// Default size limit for archives read into memory (100 MiB).
pub const DEFAULT_MAX_ARCHIVE_SIZE: u64 = 100 * 1024 * 1024;

/// Lists, extracts and adds named entries of a container.
pub trait ArchiveProcessor: Send + Sync {
    /// Every entry of the archive. A zero-byte file is an empty archive.
    fn list_entries(&self, path: &Path) -> Result<Vec<ArchiveEntry>>;

    /// Contents of the entry called `name`.
    fn extract_entry(&self, path: &Path, name: &str) -> Result<Vec<u8>>;

    /// Store `data` as `name`, replacing an entry of the same name.
    /// Returns the number of bytes stored.
    fn add_entry(&self, path: &Path, name: &str, data: &[u8]) -> Result<usize>;

    /// Whether `path` is a non-empty file that opens as an archive.
    fn is_valid_archive(&self, path: &Path) -> bool;
}

/// [`ArchiveProcessor`] over ZIP files.
#[derive(Debug, Clone)]
pub struct ZipArchiveProcessor {
    max_archive_size: u64,
    compression: CompressionMethod,
}

impl Default for ZipArchiveProcessor {
    fn default() -> Self {
        Self {
            max_archive_size: DEFAULT_MAX_ARCHIVE_SIZE,
            compression: CompressionMethod::Deflated,
        }
    }
}

impl ZipArchiveProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_archive_size(mut self, bytes: u64) -> Self {
        self.max_archive_size = bytes;
        self
    }

    /// Store new entries without compression.
    #[must_use]
    pub fn stored(mut self) -> Self {
        self.compression = CompressionMethod::Stored;
        self
    }

    fn open(path: &Path) -> Result<ZipArchive<File>> {
        let file = File::open(path).map_err(|e| DataError::io("open", path, e))?;
        ZipArchive::new(file).map_err(|e| zip_error(path, &e))
    }

    fn options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(self.compression)
    }

    /// Copy every entry except `skip` from `source` into `writer`.
    fn copy_entries<W: Write + Seek>(
        &self,
        path: &Path,
        source: &mut ZipArchive<File>,
        writer: &mut ZipWriter<W>,
        skip: &str,
    ) -> Result<()> {
        for index in 0..source.len() {
            let mut entry = source.by_index(index).map_err(|e| zip_error(path, &e))?;
            let name = entry.name().to_string();
            if name == skip {
                continue;
            }
            if entry.is_dir() {
                writer
                    .add_directory(name, self.options())
                    .map_err(|e| zip_error(path, &e))?;
                continue;
            }
            let mut contents = Vec::new();
            entry
                .read_to_end(&mut contents)
                .map_err(|e| DataError::io("read", path, e))?;
            writer
                .start_file(name, self.options())
                .map_err(|e| zip_error(path, &e))?;
            writer
                .write_all(&contents)
                .map_err(|e| DataError::io("write", path, e))?;
        }
        Ok(())
    }
}

impl ArchiveProcessor for ZipArchiveProcessor {
    fn list_entries(&self, path: &Path) -> Result<Vec<ArchiveEntry>> {
        if require_file(path)?.len() == 0 {
            return Ok(Vec::new());
        }
        let mut archive = Self::open(path)?;
        let container = path.display().to_string();

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive.by_index(index).map_err(|e| zip_error(path, &e))?;
            entries.push(ArchiveEntry {
                name: entry.name().to_string(),
                path: container.clone(),
                compressed_size: entry.compressed_size(),
                uncompressed_size: entry.size(),
                modified: entry.last_modified().and_then(zip_timestamp),
                is_directory: entry.is_dir(),
            });
        }
        debug!(path = %path.display(), count = entries.len(), "listed archive entries");
        Ok(entries)
    }

    fn extract_entry(&self, path: &Path, name: &str) -> Result<Vec<u8>> {
        if name.is_empty() {
            return Err(DataError::invalid_input("Entry name cannot be empty"));
        }
        if require_file_within(path, self.max_archive_size)? == 0 {
            return Err(DataError::archive(format!(
                "Archive is empty: {}",
                path.display()
            )));
        }

        let mut archive = Self::open(path)?;
        let mut entry = match archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(DataError::archive(format!(
                    "Entry '{name}' not found in {}",
                    path.display()
                )));
            }
            Err(e) => return Err(zip_error(path, &e)),
        };
        // The declared size may lie, so the read itself is capped too.
        let limit = self.max_archive_size;
        let too_large = |size: u64| DataError::FileTooLarge {
            path: path.join(name),
            size,
            limit,
        };
        if entry.size() > limit {
            return Err(too_large(entry.size()));
        }
        let mut contents = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        (&mut entry)
            .take(limit.saturating_add(1))
            .read_to_end(&mut contents)
            .map_err(|e| DataError::io("read", path, e))?;
        if contents.len() as u64 > limit {
            return Err(too_large(contents.len() as u64));
        }
        debug!(path = %path.display(), entry = name, size = contents.len(), "extracted entry");
        Ok(contents)
    }

    fn add_entry(&self, path: &Path, name: &str, data: &[u8]) -> Result<usize> {
        if name.is_empty() {
            return Err(DataError::invalid_input("Entry name cannot be empty"));
        }
        if name.contains("../") || name.contains("..\\") || name == ".." {
            return Err(DataError::invalid_input(format!(
                "Entry name contains a parent directory reference: {name}"
            )));
        }
        if path.as_os_str().is_empty() {
            return Err(DataError::invalid_input("Archive path cannot be empty"));
        }
        ensure_parent_dir(path)?;

        let existing = match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => {
                return Err(DataError::NotAFile {
                    path: path.to_path_buf(),
                });
            }
            Ok(metadata) if metadata.len() > 0 => Some(Self::open(path)?),
            _ => None,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|e| DataError::io("create", dir, e))?;
        let mut writer = ZipWriter::new(temp);
        if let Some(mut source) = existing {
            self.copy_entries(path, &mut source, &mut writer, name)?;
        }
        writer
            .start_file(name, self.options())
            .map_err(|e| zip_error(path, &e))?;
        writer
            .write_all(data)
            .map_err(|e| DataError::io("write", path, e))?;
        let temp = writer.finish().map_err(|e| zip_error(path, &e))?;
        temp.persist(path)
            .map_err(|e| DataError::io("replace", path, e.error))?;

        info!(path = %path.display(), entry = name, size = data.len(), "stored archive entry");
        Ok(data.len())
    }

    fn is_valid_archive(&self, path: &Path) -> bool {
        match require_file(path) {
            Ok(metadata) if metadata.len() > 0 => Self::open(path).is_ok(),
            _ => false,
        }
    }
}

/// Whether the file starts with a ZIP local-file or end-of-directory header.
pub fn has_zip_signature(path: &Path) -> bool {
    let mut magic = [0u8; 4];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut magic))
        .is_ok()
        && (magic == *b"PK\x03\x04" || magic == *b"PK\x05\x06")
}

fn zip_error(path: &Path, error: &ZipError) -> DataError {
    DataError::archive(format!("{}: {error}", path.display()))
}

fn zip_timestamp(value: zip::DateTime) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(
        i32::from(value.year()),
        u32::from(value.month()),
        u32::from(value.day()),
    )?
    .and_hms_opt(
        u32::from(value.hour()),
        u32::from(value.minute()),
        u32::from(value.second()),
    )
    .map(|naive| naive.and_utc())
}
