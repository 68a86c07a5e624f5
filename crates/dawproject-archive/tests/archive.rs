//! ZIP processor against files on disk.

use std::fs;

use dawproject_archive::{ArchiveProcessor, ZipArchiveProcessor};
use dawproject_model::DataError;
use tempfile::tempdir;

#[test]
fn zero_byte_file_is_empty_archive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.dawproject");
    fs::write(&path, b"").unwrap();

    let processor = ZipArchiveProcessor::new();
    assert!(processor.list_entries(&path).unwrap().is_empty());
    assert!(!processor.is_valid_archive(&path));
    assert!(matches!(
        processor.extract_entry(&path, "project.xml"),
        Err(DataError::Archive { .. })
    ));
}

#[test]
fn add_entries_then_list_and_extract() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("song.dawproject");
    let processor = ZipArchiveProcessor::new();

    assert_eq!(
        processor
            .add_entry(&path, "project.xml", b"<Project/>")
            .unwrap(),
        10
    );
    processor
        .add_entry(&path, "audio/kick.wav", &[0u8; 256])
        .unwrap();
    assert!(processor.is_valid_archive(&path));

    let entries = processor.list_entries(&path).unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["project.xml", "audio/kick.wav"]);
    assert!(entries.iter().all(|e| e.is_valid() && !e.is_directory));
    assert_eq!(entries[1].uncompressed_size, 256);
    assert!(entries[0].modified.is_some());

    assert_eq!(
        processor.extract_entry(&path, "audio/kick.wav").unwrap(),
        vec![0u8; 256]
    );
}

#[test]
fn add_entry_replaces_same_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("song.zip");
    let processor = ZipArchiveProcessor::new().stored();

    processor.add_entry(&path, "project.xml", b"old").unwrap();
    processor.add_entry(&path, "notes.txt", b"keep").unwrap();
    processor.add_entry(&path, "project.xml", b"new").unwrap();

    let entries = processor.list_entries(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(processor.extract_entry(&path, "project.xml").unwrap(), b"new");
    assert_eq!(processor.extract_entry(&path, "notes.txt").unwrap(), b"keep");
}

#[test]
fn add_entry_rejects_bad_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("song.zip");
    let processor = ZipArchiveProcessor::new();

    for name in ["", "../escape.xml", "a/..\\b", ".."] {
        assert!(
            matches!(
                processor.add_entry(&path, name, b"x"),
                Err(DataError::InvalidInput { .. })
            ),
            "{name:?} should be rejected"
        );
    }
    assert!(!path.exists());
}

#[test]
fn extract_respects_size_limit_and_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("song.zip");
    ZipArchiveProcessor::new()
        .add_entry(&path, "project.xml", &[b'x'; 4096])
        .unwrap();

    let small = ZipArchiveProcessor::new().with_max_archive_size(16);
    assert!(matches!(
        small.extract_entry(&path, "project.xml"),
        Err(DataError::FileTooLarge { .. })
    ));
    assert!(matches!(
        ZipArchiveProcessor::new().extract_entry(&path, ""),
        Err(DataError::InvalidInput { .. })
    ));
}

#[test]
fn non_zip_content_is_not_an_archive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fake.zip");
    fs::write(&path, "<Project/>").unwrap();

    let processor = ZipArchiveProcessor::new();
    assert!(!processor.is_valid_archive(&path));
    assert!(!processor.is_valid_archive(dir.path()));
    assert!(processor.list_entries(&path).is_err());
    assert!(processor.add_entry(&path, "project.xml", b"x").is_err());
}
