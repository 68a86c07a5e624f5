//! CLI argument definitions for the DAWproject tools.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dawproject",
    version,
    about = "Inspect, validate and create DAWproject files",
    long_about = "Inspect, validate and create DAWproject files.\n\n\
                  Projects are read from plain XML or from a ZIP container\n\
                  holding project.xml."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Engine limits and accepted extensions from a TOML file.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a project file and all of its records.
    Validate(PathArgs),

    /// Show the project metadata.
    Info(PathArgs),

    /// List the tracks of a project.
    Tracks(PathArgs),

    /// List the clips of a project.
    Clips(ClipsArgs),

    /// List the entries of a ZIP container.
    Entries(EntriesArgs),

    /// Store a project file as project.xml inside a ZIP container.
    Pack(PackArgs),

    /// Create an empty project with the given metadata.
    New(NewArgs),
}

#[derive(Parser)]
pub struct PathArgs {
    /// Project file (.dawproject or .xml).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Parser)]
pub struct ClipsArgs {
    /// Project file (.dawproject or .xml).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Only show clips placed on this track.
    #[arg(long = "track", value_name = "ID")]
    pub track: Option<String>,
}

#[derive(Parser)]
pub struct EntriesArgs {
    /// ZIP container to list.
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

#[derive(Parser)]
pub struct PackArgs {
    /// Project file to store.
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Container to create or update.
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

#[derive(Parser)]
pub struct NewArgs {
    /// Where to write the project.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Project title.
    #[arg(long = "title")]
    pub title: String,

    /// Tempo in beats per minute.
    #[arg(long = "tempo", value_name = "BPM")]
    pub tempo: f64,

    /// Artist name.
    #[arg(long = "artist")]
    pub artist: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
