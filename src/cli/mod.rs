//! Command-line interface for cover-minder.
//!
//! Parses the run options and drives the scan, resolve and reconcile passes
//! over a music folder.

mod commands;

pub use commands::{Cli, run_command};
