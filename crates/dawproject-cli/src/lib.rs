//! Command-line components for the DAWproject tools.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
