//! Cover Minder - normalizes the album art embedded in a music library.
//!
//! Walks a folder tree, resolves one cover per album folder (loose image,
//! art already embedded in a sibling, or a remote lookup), and rewrites each
//! file's embedded pictures to a single size and encoding.

pub mod cli;
pub mod config;
pub mod cover;
pub mod enrichment;
pub mod error;
pub mod reconcile;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    let directive: Directive = if args.verbose {
        "cover_minder=info".parse()?
    } else {
        "cover_minder=warn".parse()?
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive))
        .init();

    cli::run_command(&args)
}
