//! File system checks and atomic writes shared by the collaborators.

use std::fs::{self, File, Metadata};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{DataError, Result};

/// Require a non-empty path naming an existing regular file.
pub fn require_file(path: &Path) -> Result<Metadata> {
    if path.as_os_str().is_empty() {
        return Err(DataError::invalid_input("File path cannot be empty"));
    }
    let metadata = fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DataError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            DataError::io("inspect", path, e)
        }
    })?;
    if !metadata.is_file() {
        return Err(DataError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok(metadata)
}

/// Require a regular file no larger than `limit` bytes. Returns its size.
pub fn require_file_within(path: &Path, limit: u64) -> Result<u64> {
    let size = require_file(path)?.len();
    if size > limit {
        return Err(DataError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }
    Ok(size)
}

/// Whether the file can be opened for reading.
pub fn is_readable(path: &Path) -> bool {
    File::open(path).is_ok()
}

/// Lowercase extension of `path`, if any.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| DataError::io("create directory", parent, e))?;
    }
    Ok(())
}

/// Sibling temp path used while writing `path`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    }
}

/// Write `bytes` to `path` through a temp file and a rename.
///
/// Creates the parent directory. Returns the size of the written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<u64> {
    ensure_parent_dir(path)?;
    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, bytes).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| DataError::io("rename", path, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result?;

    let size = fs::metadata(path)
        .map_err(|e| DataError::io("inspect", path, e))?
        .len();
    Ok(size)
}

fn write_temp(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|e| DataError::io("create", temp_path, e))?;
    file.write_all(bytes)
        .map_err(|e| DataError::io("write", temp_path, e))?;
    file.sync_all()
        .map_err(|e| DataError::io("sync", temp_path, e))?;
    Ok(())
}
