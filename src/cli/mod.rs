//! CLI module for Struct Mapper.
//!
//! This module handles command-line argument parsing and subcommand dispatch.

pub mod demo;
pub mod map;

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

include!("definition.rs");

/// Version string with git hash
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Parse arguments, attaching the git-stamped version.
pub fn parse() -> Cli {
    let matches = Cli::command().version(VERSION).get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Run the CLI application
pub fn run() {
    let cli = parse();

    match cli.command {
        Some(Commands::Demo { ref report, ref color }) => {
            demo::run(report, color);
        }
        None => {
            map::run(&cli);
        }
    }
}
