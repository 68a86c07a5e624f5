//! Table and text rendering for command results.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dawproject_model::{ArchiveEntry, ClipInfo, ProjectInfo, TrackInfo, ValidationResult};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Two-column field/value view of the project metadata.
pub fn info_table(info: &ProjectInfo) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Title"), Cell::new(&info.title)]);
    table.add_row(vec![Cell::new("Artist"), text_cell(&info.artist)]);
    table.add_row(vec![Cell::new("Album"), text_cell(&info.album)]);
    table.add_row(vec![Cell::new("Genre"), text_cell(&info.genre)]);
    table.add_row(vec![Cell::new("Tempo"), Cell::new(info.tempo)]);
    table.add_row(vec![
        Cell::new("Time signature"),
        text_cell(&info.time_signature),
    ]);
    table.add_row(vec![Cell::new("Key"), text_cell(&info.key)]);
    table.add_row(vec![Cell::new("Created"), timestamp_cell(info.created.as_ref())]);
    table.add_row(vec![Cell::new("Modified"), timestamp_cell(info.modified.as_ref())]);
    table
}

pub fn tracks_table(tracks: &[TrackInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Volume"),
        header_cell("Pan"),
        header_cell("State"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for track in tracks {
        table.add_row(vec![
            Cell::new(track.order_index),
            Cell::new(&track.id),
            Cell::new(&track.name),
            Cell::new(track.track_type),
            Cell::new(format!("{:.2}", track.volume)),
            Cell::new(format!("{:+.2}", track.pan)),
            state_cell(track.muted, track.soloed),
        ]);
    }
    table
}

pub fn clips_table(clips: &[ClipInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Track"),
        header_cell("Start"),
        header_cell("End"),
        header_cell("Duration"),
        header_cell("Audio"),
    ]);
    apply_table_style(&mut table);
    for index in 3..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for clip in clips {
        table.add_row(vec![
            Cell::new(&clip.id),
            Cell::new(&clip.name),
            Cell::new(&clip.track_id),
            Cell::new(clip.start_time),
            Cell::new(clip.end_time()),
            Cell::new(clip.duration),
            clip.audio_file.as_deref().map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    table
}

pub fn entries_table(entries: &[ArchiveEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Path"),
        header_cell("Size"),
        header_cell("Compressed"),
        header_cell("Ratio"),
        header_cell("Modified"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for entry in entries {
        let path = if entry.is_directory {
            Cell::new(&entry.path).fg(Color::Blue)
        } else {
            Cell::new(&entry.path)
        };
        table.add_row(vec![
            path,
            Cell::new(entry.uncompressed_size),
            Cell::new(entry.compressed_size),
            Cell::new(format!("{:.2}", entry.compression_ratio())),
            timestamp_cell(entry.modified.as_ref()),
        ]);
    }
    table
}

/// Verdict line followed by one line per error and warning.
pub fn write_validation<W: Write>(out: &mut W, result: &ValidationResult) -> io::Result<()> {
    let verdict = if result.is_valid { "valid" } else { "INVALID" };
    writeln!(
        out,
        "{}: {verdict} ({} errors, {} warnings)",
        result.context,
        result.error_count(),
        result.warning_count()
    )?;
    for error in &result.errors {
        writeln!(out, "  error: {error}")?;
    }
    for warning in &result.warnings {
        writeln!(out, "  warning: {warning}")?;
    }
    Ok(())
}

fn timestamp_cell(value: Option<&DateTime<Utc>>) -> Cell {
    match value {
        Some(time) => Cell::new(time.format("%Y-%m-%d %H:%M:%S UTC")),
        None => dim_cell("-"),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn text_cell(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn state_cell(muted: bool, soloed: bool) -> Cell {
    match (muted, soloed) {
        (true, true) => Cell::new("muted, solo").fg(Color::Yellow),
        (true, false) => Cell::new("muted").fg(Color::Yellow),
        (false, true) => Cell::new("solo").fg(Color::Green),
        (false, false) => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
