//! Whole-project operations of the engine.

use std::fs;
use std::path::{Path, PathBuf};

use dawproject_archive::{ArchiveProcessor, ZipArchiveProcessor};
use dawproject_engine::{
    ClipInfo, DataAccessEngine, DataError, EngineConfig, Outcome, ProjectInfo, TrackInfo,
    TrackType,
};
use proptest::prelude::*;
use tempfile::tempdir;

fn sample_tracks() -> Vec<TrackInfo> {
    vec![
        TrackInfo::new("drums", "Drums", TrackType::Audio).with_volume(0.9),
        TrackInfo::new("bass", "Bass & Sub", TrackType::Instrument).with_pan(-0.2),
        TrackInfo::new("fx", "FX Return", TrackType::Return).with_order_index(2),
    ]
}

fn sample_clips() -> Vec<ClipInfo> {
    vec![
        ClipInfo::new("c1", "Verse beat", "drums", 0.0, 8.0).with_audio_file("kick.wav"),
        ClipInfo::new("c2", "Line <1>", "bass", 8.0, 4.0),
        ClipInfo::new("c3", "Chorus beat", "drums", 16.0, 8.0).with_fades(0.5, 0.5),
    ]
}

fn save_sample(engine: &DataAccessEngine, path: &Path) -> usize {
    let info = ProjectInfo::new("Night \"Drive\"", 124.0).with_artist("The <Testers>");
    engine
        .save_project(&info, &sample_tracks(), &sample_clips(), path)
        .unwrap()
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs").join("night.dawproject");
    let engine = DataAccessEngine::with_defaults();

    let size = save_sample(&engine, &path);
    assert_eq!(size as u64, fs::metadata(&path).unwrap().len());

    let info = engine.load_project_info(&path).unwrap();
    assert_eq!(info.title, "Night \"Drive\"");
    assert_eq!(info.artist, "The <Testers>");
    assert_eq!(info.tempo, 124.0);
    assert!(info.created.is_some());

    assert_eq!(engine.load_tracks(&path).unwrap(), sample_tracks());
    assert_eq!(engine.load_clips(&path, None).unwrap(), sample_clips());

    let drums: Vec<_> = engine
        .load_clips(&path, Some("drums"))
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(drums, ["c1", "c3"]);
    assert!(engine.load_clips(&path, Some("nobody")).unwrap().is_empty());
}

#[test]
fn saved_text_is_escaped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("escaped.xml");
    let engine = DataAccessEngine::with_defaults();
    save_sample(&engine, &path);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("The &lt;Testers&gt;"));
    assert!(text.contains("Bass &amp; Sub"));
    assert!(text.contains("Night &quot;Drive&quot;"));
    assert!(engine.xml_processor().validate_xml(&path).is_valid);
}

#[test]
fn save_project_and_save_document_write_the_same_text() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    let first = dir.path().join("first.xml");
    save_sample(&engine, &first);

    let document = engine.load_project(&first).unwrap();
    let second = dir.path().join("second.xml");
    engine.save_document(&document, &second).unwrap();

    let text = fs::read_to_string(&first).unwrap();
    assert_eq!(text, fs::read_to_string(&second).unwrap());
    assert_eq!(text, dawproject_xml::render_project(&document).unwrap());
}

#[test]
fn load_clips_rejects_bad_track_filter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.dawproject");
    let engine = DataAccessEngine::with_defaults();
    save_sample(&engine, &path);

    assert!(matches!(
        engine.load_clips(&path, Some("")),
        Err(DataError::InvalidInput { .. })
    ));
    let long = "t".repeat(257);
    assert!(matches!(
        engine.load_clips(&path, Some(&long)),
        Err(DataError::InvalidInput { .. })
    ));
}

#[test]
fn load_missing_file_mentions_path() {
    let engine = DataAccessEngine::with_defaults();
    let err = engine
        .load_project_info(Path::new("missing.dawproject"))
        .unwrap_err();
    assert!(err.to_string().contains("missing.dawproject"));

    let outcome: Outcome<ProjectInfo> = engine
        .load_project_info(Path::new("missing.dawproject"))
        .into();
    assert!(!outcome.success);
    assert!(outcome.error_message.contains("missing.dawproject"));
}

#[test]
fn load_rejects_directories_large_files_and_garbage() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    assert!(matches!(
        engine.load_tracks(dir.path()),
        Err(DataError::NotAFile { .. })
    ));

    let path = dir.path().join("big.dawproject");
    fs::write(&path, vec![b' '; 2048]).unwrap();
    let small = DataAccessEngine::with_config(EngineConfig::default().with_max_file_size(1024));
    assert!(matches!(
        small.load_project_info(&path),
        Err(DataError::FileTooLarge { .. })
    ));

    let garbage = dir.path().join("garbage.dawproject");
    fs::write(&garbage, "<Song><Track/></Song>").unwrap();
    let err = engine.load_project(&garbage).unwrap_err();
    assert!(matches!(err, DataError::Load { .. }));
    assert!(err.to_string().contains("garbage.dawproject"));
    assert!(err.to_string().contains("<Song>"));
}

#[test]
fn zip_container_loads_through_archive() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    let xml_path = dir.path().join("plain.xml");
    save_sample(&engine, &xml_path);

    let archive_path = dir.path().join("packed.dawproject");
    let archive = ZipArchiveProcessor::new();
    archive
        .add_entry(&archive_path, "project.xml", &fs::read(&xml_path).unwrap())
        .unwrap();
    archive
        .add_entry(&archive_path, "audio/kick.wav", b"RIFF")
        .unwrap();

    let document = engine.load_project(&archive_path).unwrap();
    assert_eq!(document.tracks, sample_tracks());
    assert_eq!(document.clips.len(), 3);

    let without_project = dir.path().join("audio-only.dawproject");
    archive
        .add_entry(&without_project, "audio/kick.wav", b"RIFF")
        .unwrap();
    let err = engine.load_project(&without_project).unwrap_err();
    assert!(err.to_string().contains("project.xml"));
}

#[test]
fn archived_project_is_capped_after_decompression() {
    let dir = tempdir().unwrap();
    let archive_path = dir.path().join("inflated.dawproject");
    let padding = " ".repeat(2 * 1024 * 1024);
    let xml = format!(
        "<Project version=\"1.0\">{padding}<ProjectInfo title=\"T\" tempo=\"120\"/></Project>"
    );
    ZipArchiveProcessor::new()
        .add_entry(&archive_path, "project.xml", xml.as_bytes())
        .unwrap();
    assert!(fs::metadata(&archive_path).unwrap().len() < 64 * 1024);

    let small = DataAccessEngine::with_config(EngineConfig::default().with_max_file_size(64 * 1024));
    assert!(matches!(
        small.load_project(&archive_path),
        Err(DataError::FileTooLarge { .. })
    ));
    assert!(!small.validate_project(&archive_path).is_valid);

    let info = DataAccessEngine::with_defaults()
        .load_project_info(&archive_path)
        .unwrap();
    assert_eq!(info.title, "T");
}

#[test]
fn save_project_checks_inputs() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    let info = ProjectInfo::new("T", 120.0);
    let target = dir.path().join("ok.dawproject");

    let cases: Vec<(ProjectInfo, PathBuf)> = vec![
        (info.clone(), PathBuf::new()),
        (ProjectInfo::new("", 120.0), target.clone()),
        (ProjectInfo::new("T", 0.0), target.clone()),
        (ProjectInfo::new("T", 1000.0), target.clone()),
        (info.clone(), dir.path().join("song.mp3")),
        (info.clone(), dir.path().join("song")),
    ];
    for (info, path) in cases {
        assert!(
            matches!(
                engine.save_project(&info, &[], &[], &path),
                Err(DataError::InvalidInput { .. })
            ),
            "{info:?} at {path:?}"
        );
    }
    assert!(!target.exists());

    let bad_track = [TrackInfo::new("", "Nameless", TrackType::Audio)];
    assert!(engine.save_project(&info, &bad_track, &[], &target).is_err());
    assert!(engine.save_project(&info, &[], &[], &target).is_ok());
}

#[test]
fn save_project_rejects_traversal() {
    let engine = DataAccessEngine::with_defaults();
    let err = engine
        .save_project(
            &ProjectInfo::new("", -1.0),
            &[],
            &[],
            Path::new("../evil.xml"),
        )
        .unwrap_err();
    assert!(err.to_string().contains("parent directory"));
    assert!(!Path::new("../evil.xml").exists());
}

proptest! {
    #[test]
    fn parent_components_are_always_rejected(
        before in prop::collection::vec("[a-z]{1,6}", 0..3),
        after in prop::collection::vec("[a-z]{1,6}", 0..3),
        ext in prop_oneof![Just("xml"), Just("dawproject")],
    ) {
        let mut path = PathBuf::new();
        before.iter().for_each(|part| path.push(part));
        path.push("..");
        after.iter().for_each(|part| path.push(part));
        path.push(format!("song.{ext}"));

        let engine = DataAccessEngine::with_defaults();
        let result = engine.save_project(&ProjectInfo::new("T", 120.0), &[], &[], &path);
        prop_assert!(matches!(result, Err(DataError::InvalidInput { .. })), "expected InvalidInput, got {:?}", result);
    }
}

#[test]
fn validate_file_diagnostics() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_config(EngineConfig::default().with_warn_file_size(64));

    let result = engine.validate_file(Path::new(""));
    assert!(!result.is_valid);

    let result = engine.validate_file(&dir.path().join("missing.xml"));
    assert!(!result.is_valid);
    assert!(result.errors[0].contains("missing.xml"));

    assert!(!engine.validate_file(dir.path()).is_valid);

    let empty = dir.path().join("empty.dawproject");
    fs::write(&empty, "").unwrap();
    let result = engine.validate_file(&empty);
    assert!(result.is_valid);
    assert_eq!(result.warnings, ["File is empty"]);

    let big = dir.path().join("big.zip");
    fs::write(&big, vec![b'x'; 128]).unwrap();
    let result = engine.validate_file(&big);
    assert!(result.is_valid);
    assert_eq!(result.warning_count(), 1);
    assert_eq!(result.context, big.display().to_string());

    let odd = dir.path().join("notes.txt");
    fs::write(&odd, "hi").unwrap();
    let result = engine.validate_file(&odd);
    assert!(result.is_valid);
    assert!(result.warnings[0].contains(".txt"));
}

#[test]
fn validate_project_merges_record_diagnostics() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    let path = dir.path().join("p.xml");
    fs::write(
        &path,
        r#"<Project version="1.0">
  <ProjectInfo title="T" tempo="120" timeSignature="4/4"/>
  <Track id="t1" name="Loud" volume="1.5"/>
  <Clip id="c1" name="Short" trackId="t1" start="0" duration="0"/>
</Project>"#,
    )
    .unwrap();

    assert!(engine.validate_file(&path).is_valid);
    let result = engine.validate_project(&path);
    assert!(!result.is_valid);
    assert_eq!(result.error_count(), 2);

    let broken = dir.path().join("broken.xml");
    fs::write(&broken, "<Project>").unwrap();
    assert!(!engine.validate_project(&broken).is_valid);
}

#[test]
fn validate_project_rejects_nan_numbers() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    let path = dir.path().join("nan.xml");
    fs::write(
        &path,
        r#"<Project version="1.0">
  <ProjectInfo title="T" tempo="NaN" timeSignature="4/4"/>
  <Track id="t1" name="Lead"/>
  <Clip id="c1" name="Riff" trackId="t1" start="NaN" duration="NaN"/>
</Project>"#,
    )
    .unwrap();

    let result = engine.validate_project(&path);
    assert!(!result.is_valid);
    assert_eq!(result.error_count(), 3);

    let document = engine.load_project(&path).unwrap();
    let target = dir.path().join("out.xml");
    assert!(engine.save_document(&document, &target).is_err());
    assert!(!target.exists());
}

#[test]
fn is_valid_project_file_checks() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();

    let good = dir.path().join("good.dawproject");
    save_sample(&engine, &good);
    assert!(engine.is_valid_project_file(&good));

    let empty = dir.path().join("empty.xml");
    fs::write(&empty, "").unwrap();
    assert!(!engine.is_valid_project_file(&empty));

    let zip = dir.path().join("good.zip");
    fs::copy(&good, &zip).unwrap();
    assert!(!engine.is_valid_project_file(&zip));

    assert!(!engine.is_valid_project_file(&dir.path().join("missing.xml")));
    assert!(!engine.is_valid_project_file(dir.path()));
}

#[test]
fn create_writer_makes_parent_directories() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    let path = dir.path().join("a").join("b").join("new.xml");
    let writer = engine.create_writer(&path).unwrap();
    assert!(path.parent().unwrap().is_dir());
    assert!(!writer.is_open());
    assert!(!path.exists());
}
