//! Command-line interface for arena-episode.
//!
//! Provides commands for summarizing result trees and inspecting run
//! settings.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands};
