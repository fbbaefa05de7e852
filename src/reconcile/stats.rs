//! Run-wide statistics.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened to a single audio file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A cover was embedded into a file that had none
    New,
    /// Existing pictures were re-encoded to the target policy
    Converted,
    /// Existing pictures already conform; nothing written
    Skipped,
    /// No cover could be found for the file
    NotFound,
    /// The container has no picture adapter
    Unsupported,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Converted => "converted",
            Self::Skipped => "skipped",
            Self::NotFound => "not found",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Counters accumulated across the whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub skipped: usize,
    pub converted: usize,
    pub new: usize,
    pub downloaded: usize,
    pub unsupported: usize,
    /// Files whose tags could not be read
    pub failed_reads: usize,
    /// Folders where at least one file ended without a cover
    pub not_found: BTreeSet<PathBuf>,
    /// Folders that received a downloaded cover
    pub downloaded_from: BTreeSet<PathBuf>,
}

impl RunStats {
    /// Tally one file's outcome.
    pub fn record(&mut self, folder: &Path, outcome: Outcome) {
        match outcome {
            Outcome::New => self.new += 1,
            Outcome::Converted => self.converted += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Unsupported => self.unsupported += 1,
            Outcome::NotFound => {
                self.not_found.insert(folder.to_path_buf());
            }
        }
    }

    /// Tally a cover fetched from the remote service.
    pub fn record_download(&mut self, folder: &Path) {
        self.downloaded += 1;
        self.downloaded_from.insert(folder.to_path_buf());
    }

    pub fn record_failed_read(&mut self) {
        self.failed_reads += 1;
    }

    /// Number of files that were rewritten
    pub fn written(&self) -> usize {
        self.new + self.converted
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cover Summary")?;
        writeln!(f, "=============")?;
        writeln!(f, "  Skipped:     {}", self.skipped)?;
        writeln!(f, "  Converted:   {}", self.converted)?;
        writeln!(f, "  New:         {}", self.new)?;
        writeln!(f, "  Downloaded:  {}", self.downloaded)?;
        if self.unsupported > 0 {
            writeln!(f, "  Unsupported: {}", self.unsupported)?;
        }
        if self.failed_reads > 0 {
            writeln!(f, "  Unreadable:  {}", self.failed_reads)?;
        }

        if !self.not_found.is_empty() {
            writeln!(f)?;
            writeln!(f, "No cover found in:")?;
            for folder in &self.not_found {
                writeln!(f, "  {}", folder.display())?;
            }
        }

        if !self.downloaded_from.is_empty() {
            writeln!(f)?;
            writeln!(f, "Downloaded covers for:")?;
            for folder in &self.downloaded_from {
                writeln!(f, "  {}", folder.display())?;
            }
        }

        Ok(())
    }
}
