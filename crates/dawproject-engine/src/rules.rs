//! Checks applied before a record is written.

use std::path::{Component, Path};

use dawproject_model::{ClipInfo, DataError, ProjectInfo, Result, TrackInfo};

use crate::config::EngineConfig;

pub(crate) fn check_project_info(info: &ProjectInfo, config: &EngineConfig) -> Result<()> {
    if info.title.is_empty() {
        return Err(DataError::invalid_input("Project title cannot be empty"));
    }
    let tempo_in_range = info.tempo > 0.0 && info.tempo <= config.max_tempo;
    if !tempo_in_range {
        return Err(DataError::invalid_input(format!(
            "Invalid tempo: {} (must be greater than 0 and at most {})",
            info.tempo, config.max_tempo
        )));
    }
    let artist_len = info.artist.chars().count();
    if artist_len > config.max_artist_len {
        return Err(DataError::invalid_input(format!(
            "Artist name too long: {artist_len} characters (limit {})",
            config.max_artist_len
        )));
    }
    Ok(())
}

pub(crate) fn check_track(track: &TrackInfo) -> Result<()> {
    if track.id.is_empty() {
        return Err(DataError::invalid_input("Track ID cannot be empty"));
    }
    if track.name.is_empty() {
        return Err(DataError::invalid_input(format!(
            "Track '{}' name cannot be empty",
            track.id
        )));
    }
    Ok(())
}

pub(crate) fn check_clip(clip: &ClipInfo) -> Result<()> {
    if clip.id.is_empty() {
        return Err(DataError::invalid_input("Clip ID cannot be empty"));
    }
    if clip.start_time.is_nan() || clip.start_time < 0.0 {
        return Err(DataError::invalid_input(format!(
            "Clip '{}' has invalid start time: {}",
            clip.id, clip.start_time
        )));
    }
    Ok(())
}

/// Reject a track id filter that is empty or too long.
pub(crate) fn check_track_filter(track_id: &str, config: &EngineConfig) -> Result<()> {
    if track_id.is_empty() {
        return Err(DataError::invalid_input("Track ID cannot be empty"));
    }
    let len = track_id.chars().count();
    if len > config.max_track_id_len {
        return Err(DataError::invalid_input(format!(
            "Track ID too long: {len} characters (limit {})",
            config.max_track_id_len
        )));
    }
    Ok(())
}

/// Reject empty paths, `..` components and extensions outside the allow-list.
pub(crate) fn check_target_path(path: &Path, config: &EngineConfig) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(DataError::invalid_input("File path cannot be empty"));
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(DataError::invalid_input(format!(
            "Path contains a parent directory reference: {}",
            path.display()
        )));
    }
    check_extension(path, config)
}

pub(crate) fn check_extension(path: &Path, config: &EngineConfig) -> Result<()> {
    match dawproject_model::fs::extension(path) {
        Some(ext) if config.allows_extension(&ext) => Ok(()),
        _ => Err(DataError::invalid_input(format!(
            "Unsupported file extension: {} (expected one of: {})",
            path.display(),
            config.allowed_extensions.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawproject_model::TrackType;

    #[test]
    fn test_tempo_bounds() {
        let config = EngineConfig::default();
        for (tempo, ok) in [(0.0, false), (0.1, true), (999.0, true), (999.5, false), (f64::NAN, false)] {
            let info = ProjectInfo::new("T", tempo);
            assert_eq!(check_project_info(&info, &config).is_ok(), ok, "tempo {tempo}");
        }
    }

    #[test]
    fn test_artist_length_counts_characters() {
        let config = EngineConfig::default();
        let info = ProjectInfo::new("T", 120.0).with_artist("é".repeat(256));
        assert!(check_project_info(&info, &config).is_ok());
        let info = ProjectInfo::new("T", 120.0).with_artist("a".repeat(257));
        assert!(check_project_info(&info, &config).is_err());
    }

    #[test]
    fn test_track_and_clip_checks() {
        assert!(check_track(&TrackInfo::new("t", "n", TrackType::Audio)).is_ok());
        assert!(check_track(&TrackInfo::new("t", "", TrackType::Audio)).is_err());
        assert!(check_clip(&ClipInfo::new("c", "", "", 0.0, 0.0)).is_ok());
        assert!(check_clip(&ClipInfo::new("c", "n", "t", -0.01, 1.0)).is_err());
        assert!(check_clip(&ClipInfo::new("c", "n", "t", f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_target_path() {
        let config = EngineConfig::default();
        assert!(check_target_path(Path::new("songs/a.dawproject"), &config).is_ok());
        assert!(check_target_path(Path::new("a.XML"), &config).is_ok());
        assert!(check_target_path(Path::new("../evil.xml"), &config).is_err());
        assert!(check_target_path(Path::new("songs/../../a.xml"), &config).is_err());
        assert!(check_target_path(Path::new("a.txt"), &config).is_err());
        assert!(check_target_path(Path::new(""), &config).is_err());
    }

    #[test]
    fn test_track_filter() {
        let config = EngineConfig::default();
        assert!(check_track_filter("t1", &config).is_ok());
        assert!(check_track_filter("", &config).is_err());
        assert!(check_track_filter(&"x".repeat(256), &config).is_ok());
        assert!(check_track_filter(&"x".repeat(257), &config).is_err());
    }
}
