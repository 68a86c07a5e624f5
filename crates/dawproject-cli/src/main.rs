//! DAWproject command-line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use dawproject_cli::cli::{Cli, LogFormatArg, LogLevelArg};
use dawproject_cli::commands::{OutputMode, build_engine, execute};
use dawproject_cli::logging::{LogConfig, LogFormat, init_logging};
use dawproject_model::DataError;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            report(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let engine = build_engine(cli.config.as_deref())?;
    let mode = OutputMode::from_json_flag(cli.json);
    let mut stdout = io::stdout().lock();
    execute(&cli.command, &engine, mode, &mut stdout)
}

/// Print a failed command, with a hint when the cause is a data error.
fn report(error: &anyhow::Error) {
    match error.downcast_ref::<DataError>() {
        Some(data_error) => {
            eprintln!("error: {}", data_error.user_message());
            if let Some(hint) = data_error.suggestion() {
                eprintln!("hint: {hint}");
            }
        }
        None => eprintln!("error: {error:#}"),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
