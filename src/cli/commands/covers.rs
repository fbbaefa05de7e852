//! The cover run: scan, resolve each folder's cover, reconcile each file.

use anyhow::Context;
use std::io::Write;
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use super::Cli;
use crate::config::{self, Config};
use crate::cover::{CoverResolver, PictureTags, TaggedAudio};
use crate::enrichment::{ConsoleConfirm, ItunesClient};
use crate::error::Error;
use crate::reconcile::{Outcome, Reconciler, RunStats};
use crate::scanner::{self, AlbumFolder};

type Engine<'a> = Reconciler<'a, ItunesClient, ConsoleConfirm>;

/// Process every folder under `cli.folder` and return the run's tallies.
///
/// Invalid configuration and failed saves abort the run. Everything else is
/// logged, counted, and skipped.
pub fn run_covers(rt: &Runtime, cli: &Cli) -> anyhow::Result<RunStats> {
    let mut config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    config.apply(&cli.overrides());
    let policy = config.policy(cli.force)?;

    let folders = scanner::scan_folders(&cli.folder)
        .with_context(|| format!("Failed to scan {}", cli.folder.display()))?;

    let client = remote_client(&config);
    let mut engine = Reconciler::new(policy, client.as_ref(), ConsoleConfirm).dry_run(cli.dry_run);
    let resolver = CoverResolver::new(policy);

    info!(
        size = policy.size,
        format = %policy.format,
        keep_size = policy.keep_size,
        force = policy.force,
        remote = engine.remote_enabled(),
        dry_run = cli.dry_run,
        "Starting cover run"
    );

    let mut stats = RunStats::default();
    let mut progress = Progress::new(scanner::total_files(&folders), cli.verbose);

    rt.block_on(async {
        for folder in &folders {
            process_folder(&mut engine, &resolver, folder, &mut stats, &mut progress).await?;
        }
        Ok::<_, anyhow::Error>(())
    })?;

    progress.finish();
    Ok(stats)
}

fn remote_client(config: &Config) -> Option<ItunesClient> {
    if !config.remote.enabled {
        return None;
    }
    match ItunesClient::new(config.remote.itunes()) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "Failed to create remote client, continuing with local covers only");
            None
        }
    }
}

async fn process_folder(
    engine: &mut Engine<'_>,
    resolver: &CoverResolver,
    folder: &AlbumFolder,
    stats: &mut RunStats,
    progress: &mut Progress,
) -> anyhow::Result<()> {
    let mut folder_cover = match resolver.resolve_folder_cover(&folder.path) {
        Ok(found) => found.map(|f| f.cover),
        Err(e) => {
            warn!(folder = %folder.path.display(), error = %e, "Failed to resolve folder cover");
            None
        }
    };

    let mut files = Vec::with_capacity(folder.audio_files.len());
    for path in &folder.audio_files {
        match TaggedAudio::open(path) {
            Ok(audio) => files.push(audio),
            Err(Error::UnsupportedContainer(_)) => {
                warn!(path = %path.display(), "Unsupported container, skipping");
                stats.record(&folder.path, Outcome::Unsupported);
                progress.file(path, Outcome::Unsupported.label());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read tags, skipping");
                stats.record_failed_read();
                progress.file(path, "unreadable");
            }
        }
    }

    if folder_cover.is_none() {
        folder_cover = engine.discover_embedded_cover(&files).map(|f| f.cover);
    }

    for mut audio in files {
        let result = engine
            .reconcile(&mut audio, &folder.path, folder_cover.as_ref(), stats)
            .await
            .with_context(|| format!("Failed to update {}", audio.path().display()))?;

        if let Some(cover) = result.downloaded {
            folder_cover = Some(cover);
        }
        progress.file(audio.path(), result.outcome.label());
    }

    Ok(())
}

/// Per-file progress on stdout.
///
/// Overwrites a single line unless verbose, which prints one line per file.
struct Progress {
    total: usize,
    done: usize,
    verbose: bool,
}

impl Progress {
    fn new(total: usize, verbose: bool) -> Self {
        Self {
            total,
            done: 0,
            verbose,
        }
    }

    fn file(&mut self, path: &Path, label: &str) {
        self.done += 1;
        let line = self.line(path, label);
        if self.verbose {
            println!("{}", line);
        } else {
            print!("\x1b[K{}\r", line);
            let _ = std::io::stdout().flush();
        }
    }

    fn line(&self, path: &Path, label: &str) -> String {
        format!("[{}/{}] {}: {}", self.done, self.total, label, path.display())
    }

    fn finish(&self) {
        if !self.verbose && self.done > 0 {
            println!();
        }
    }
}
