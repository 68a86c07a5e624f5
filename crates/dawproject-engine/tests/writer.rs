//! Streaming writer sessions.

use std::fs;

use dawproject_engine::{
    ClipInfo, DataAccessEngine, DataError, EngineConfig, ProjectInfo, TrackInfo, TrackType,
    WriteOutcome,
};
use dawproject_xml::ProjectElement;
use tempfile::tempdir;

#[test]
fn write_project_info_then_finalize() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.dawproject");
    let engine = DataAccessEngine::with_defaults();

    let mut writer = engine.create_writer(&path).unwrap();
    writer.open().unwrap();
    assert!(writer.is_open());

    let info = ProjectInfo {
        title: "T".to_string(),
        tempo: 120.0,
        ..Default::default()
    };
    let written = writer.write_project_info(&info).unwrap();
    assert_eq!(written, info.to_fragment().unwrap().len());

    let total = writer.finalize().unwrap();
    assert!(!writer.is_open());
    assert!(path.exists());
    assert_eq!(fs::metadata(&path).unwrap().len(), total as u64);

    let loaded = engine.load_project_info(&path).unwrap();
    assert_eq!(loaded.title, "T");
    assert_eq!(loaded.tempo, 120.0);
}

#[test]
fn written_records_load_back_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.xml");
    let engine = DataAccessEngine::with_defaults();

    let tracks = [
        TrackInfo::new("t1", "Lead", TrackType::Instrument),
        TrackInfo::new("t2", "Bus", TrackType::Group),
    ];
    let clips = [ClipInfo::new("c1", "Hook", "t1", 4.0, 2.0)];

    let mut writer = engine.create_writer(&path).unwrap();
    writer.open().unwrap();
    let mut counted = writer.buffered_len();
    counted += writer
        .write_project_info(&ProjectInfo::new("Session", 100.0))
        .unwrap();
    for track in &tracks {
        counted += writer.write_track(track).unwrap();
    }
    for clip in &clips {
        counted += writer.write_clip(clip).unwrap();
    }
    assert_eq!(counted, writer.buffered_len());
    let total = writer.finalize().unwrap();
    assert!(total > counted);

    let document = engine.load_project(&path).unwrap();
    assert_eq!(document.tracks, tracks);
    assert_eq!(document.clips, clips);
}

#[test]
fn writes_fail_while_closed() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    let mut writer = engine.create_writer(&dir.path().join("x.xml")).unwrap();

    let track = TrackInfo::new("t", "n", TrackType::Audio);
    assert!(matches!(
        writer.write_track(&track),
        Err(DataError::NotOpen { .. })
    ));
    assert!(matches!(writer.finalize(), Err(DataError::NotOpen { .. })));

    let outcome: WriteOutcome = writer.write_track(&track).into();
    assert!(!outcome.success);
    assert_eq!(outcome.value, 0);
    assert_eq!(outcome.error_message, "Writer not open");

    writer.open().unwrap();
    writer.finalize().unwrap();
    assert!(matches!(
        writer.write_track(&track),
        Err(DataError::NotOpen { .. })
    ));
}

#[test]
fn invalid_records_are_refused() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    let mut writer = engine.create_writer(&dir.path().join("x.dawproject")).unwrap();
    writer.open().unwrap();
    let before = writer.buffered_len();

    assert!(writer.write_project_info(&ProjectInfo::new("", 120.0)).is_err());
    assert!(writer.write_project_info(&ProjectInfo::new("T", 0.0)).is_err());
    assert!(writer.write_project_info(&ProjectInfo::new("T", 999.01)).is_err());
    assert!(
        writer
            .write_project_info(&ProjectInfo::new("T", 120.0).with_artist("a".repeat(300)))
            .is_err()
    );
    assert!(writer.write_track(&TrackInfo::new("", "n", TrackType::Audio)).is_err());
    assert!(writer.write_track(&TrackInfo::new("t", "", TrackType::Audio)).is_err());
    assert!(writer.write_clip(&ClipInfo::new("", "n", "t", 0.0, 1.0)).is_err());
    assert!(writer.write_clip(&ClipInfo::new("c", "n", "t", -2.0, 1.0)).is_err());

    assert_eq!(writer.buffered_len(), before);
}

#[test]
fn buffer_ceiling_refuses_crossing_write() {
    let dir = tempdir().unwrap();
    let engine = DataAccessEngine::with_defaults();
    let limit = engine.config().max_buffer_size;
    assert_eq!(limit, 10 * 1024 * 1024);

    let mut writer = engine.create_writer(&dir.path().join("huge.dawproject")).unwrap();
    writer.open().unwrap();

    let big_name = "n".repeat(64 * 1024);
    let mut index = 0usize;
    let err = loop {
        let track = TrackInfo::new(format!("t{index}"), big_name.as_str(), TrackType::Audio);
        let before = writer.buffered_len();
        match writer.write_track(&track) {
            Ok(written) => {
                assert_eq!(writer.buffered_len(), before + written);
                assert!(writer.buffered_len() <= limit);
            }
            Err(err) => {
                assert_eq!(writer.buffered_len(), before);
                let fragment = track.to_fragment().unwrap();
                assert!(before + fragment.len() > limit);
                break err;
            }
        }
        index += 1;
        assert!(index < 1000, "ceiling never reached");
    };
    assert!(matches!(err, DataError::BufferLimit { limit: 10485760, .. }));
    assert!(err.to_string().contains("buffer size limit"));

    // The session survives and can still be finalized.
    let total = writer.finalize().unwrap();
    assert!(total > 0);
}

#[test]
fn small_configured_ceiling() {
    let dir = tempdir().unwrap();
    let engine =
        DataAccessEngine::with_config(EngineConfig::default().with_max_buffer_size(200));
    let mut writer = engine.create_writer(&dir.path().join("tiny.xml")).unwrap();
    writer.open().unwrap();
    assert!(writer.write_project_info(&ProjectInfo::new("T", 120.0)).is_err());
}

#[test]
fn dropping_open_writer_leaves_no_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("abandoned.dawproject");
    let engine = DataAccessEngine::with_defaults();
    {
        let mut writer = engine.create_writer(&path).unwrap();
        writer.open().unwrap();
        writer
            .write_project_info(&ProjectInfo::new("Gone", 90.0))
            .unwrap();
    }
    assert!(!path.exists());
}

#[test]
fn finalize_replaces_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("replace.xml");
    fs::write(&path, "old contents that are longer than the new project file ".repeat(20)).unwrap();
    let engine = DataAccessEngine::with_defaults();

    let mut writer = engine.create_writer(&path).unwrap();
    writer.open().unwrap();
    writer
        .write_project_info(&ProjectInfo::new("New", 120.0))
        .unwrap();
    let total = writer.finalize().unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), total as u64);
    assert_eq!(engine.load_project_info(&path).unwrap().title, "New");
}
