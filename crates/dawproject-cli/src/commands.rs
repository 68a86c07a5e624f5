//! Subcommand execution.
//!
//! Every command writes its result to `out` and returns the process exit
//! code. In JSON mode the result is an `Outcome` envelope (or the raw
//! `ValidationResult` for `validate`) and failures are reported inside it;
//! otherwise failures are returned as errors for `main` to print.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use dawproject_engine::{DataAccessEngine, EngineConfig};
use dawproject_model::{DataError, Outcome, ProjectInfo};

use crate::cli::{ClipsArgs, Command, NewArgs, PackArgs};
use crate::summary::{clips_table, entries_table, info_table, tracks_table, write_validation};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Table }
    }
}

/// Engine with the defaults, or with the limits read from `config_path`.
pub fn build_engine(config_path: Option<&Path>) -> Result<DataAccessEngine> {
    let Some(path) = config_path else {
        return Ok(DataAccessEngine::with_defaults());
    };
    let config = EngineConfig::from_toml_file(path)
        .with_context(|| format!("load engine config {}", path.display()))?;
    debug!(path = %path.display(), "engine config loaded");
    Ok(DataAccessEngine::with_config(config))
}

pub fn execute<W: Write>(
    command: &Command,
    engine: &DataAccessEngine,
    mode: OutputMode,
    out: &mut W,
) -> Result<i32> {
    match command {
        Command::Validate(args) => run_validate(engine, &args.path, mode, out),
        Command::Info(args) => emit(out, mode, engine.load_project_info(&args.path), |out, info| {
            writeln!(out, "{}", info_table(info))
        }),
        Command::Tracks(args) => emit(out, mode, engine.load_tracks(&args.path), |out, tracks| {
            writeln!(out, "{}", tracks_table(tracks))?;
            writeln!(out, "{} tracks", tracks.len())
        }),
        Command::Clips(args) => run_clips(engine, args, mode, out),
        Command::Entries(args) => emit(
            out,
            mode,
            engine.archive_processor().list_entries(&args.archive),
            |out, entries| {
                writeln!(out, "{}", entries_table(entries))?;
                writeln!(out, "{} entries", entries.len())
            },
        ),
        Command::Pack(args) => emit(out, mode, pack(engine, args), |out, size| {
            writeln!(
                out,
                "Stored {} as {} in {} ({size} bytes)",
                args.project.display(),
                engine.config().archive_project_entry,
                args.archive.display()
            )
        }),
        Command::New(args) => emit(out, mode, create(engine, args), |out, size| {
            writeln!(out, "Created {} ({size} bytes)", args.path.display())
        }),
    }
}

fn run_validate<W: Write>(
    engine: &DataAccessEngine,
    path: &Path,
    mode: OutputMode,
    out: &mut W,
) -> Result<i32> {
    let result = engine.validate_project(path);
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, &result)?;
            writeln!(out)?;
        }
        OutputMode::Table => write_validation(out, &result)?,
    }
    Ok(if result.is_valid { 0 } else { 1 })
}

fn run_clips<W: Write>(
    engine: &DataAccessEngine,
    args: &ClipsArgs,
    mode: OutputMode,
    out: &mut W,
) -> Result<i32> {
    let clips = engine.load_clips(&args.path, args.track.as_deref());
    emit(out, mode, clips, |out, clips| {
        writeln!(out, "{}", clips_table(clips))?;
        match &args.track {
            Some(track) => writeln!(out, "{} clips on track {track}", clips.len()),
            None => writeln!(out, "{} clips", clips.len()),
        }
    })
}

/// Copy a loadable project into the container under the configured entry name.
fn pack(engine: &DataAccessEngine, args: &PackArgs) -> dawproject_model::Result<usize> {
    let document = engine.load_project(&args.project)?;
    let bytes = fs::read(&args.project).map_err(|e| DataError::io("read", &args.project, e))?;
    let entry = &engine.config().archive_project_entry;
    let size = engine
        .archive_processor()
        .add_entry(&args.archive, entry, &bytes)?;
    info!(
        project = %args.project.display(),
        archive = %args.archive.display(),
        tracks = document.tracks.len(),
        "project packed"
    );
    Ok(size)
}

/// Write a project holding only metadata through a streaming writer.
fn create(engine: &DataAccessEngine, args: &NewArgs) -> dawproject_model::Result<usize> {
    let mut info = ProjectInfo::new(args.title.as_str(), args.tempo);
    if let Some(artist) = &args.artist {
        info = info.with_artist(artist.as_str());
    }
    let mut writer = engine.create_writer(&args.path)?;
    writer.open()?;
    writer.write_project_info(&info)?;
    writer.finalize()
}

fn emit<T, W, F>(
    out: &mut W,
    mode: OutputMode,
    result: dawproject_model::Result<T>,
    render: F,
) -> Result<i32>
where
    T: Serialize + Default,
    W: Write,
    F: FnOnce(&mut W, &T) -> std::io::Result<()>,
{
    match mode {
        OutputMode::Json => {
            let outcome = Outcome::from(result);
            serde_json::to_writer_pretty(&mut *out, &outcome)?;
            writeln!(out)?;
            Ok(if outcome.success { 0 } else { 1 })
        }
        OutputMode::Table => {
            let value = result?;
            render(out, &value)?;
            Ok(0)
        }
    }
}
