//! CLI layer for the media catalog.
//!
//! Provides the command-line interface using clap, with commands for
//! initializing the catalog and managing entries, genres and media types.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
