//! CLI argument definitions and dispatch.
//!
//! The tool has a single job, so there are no subcommands:
//! - `covers`: the folder run driver, progress output and report

mod covers;

use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Builder;

use crate::config::Overrides;
use crate::cover::CoverFormat;

pub use covers::run_covers;

/// Cover Minder - normalize embedded album art
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to scan recursively
    #[arg(short, long)]
    pub folder: PathBuf,

    /// Re-encode every picture and accept remote matches without asking
    #[arg(long)]
    pub force: bool,

    /// Target square edge length in pixels (default: 1000)
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Never resize, only re-encode
    #[arg(long)]
    pub keep_size: bool,

    /// Output encoding (default: jpeg)
    #[arg(long, value_enum)]
    pub format: Option<CoverFormat>,

    /// Disable remote cover lookup
    #[arg(long)]
    pub local: bool,

    /// Don't print the end-of-run report
    #[arg(long)]
    pub no_stat: bool,

    /// Print one line per file instead of a single progress line
    #[arg(long)]
    pub verbose: bool,

    /// Alternate config file
    #[arg(long, env = "COVER_MINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Decide and report outcomes without saving any file
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Flag values that override the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            size: self.size,
            format: self.format,
            keep_size: self.keep_size,
            force: self.force,
            local: self.local,
        }
    }
}

/// Run the cover pass described by `cli`.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    // Files are processed strictly one after another
    let rt = Builder::new_current_thread().enable_all().build()?;

    let stats = run_covers(&rt, cli)?;
    if !cli.no_stat {
        println!();
        print!("{}", stats);
    }
    Ok(())
}
