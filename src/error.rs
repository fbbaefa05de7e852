//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - [`EnrichmentError`](crate::enrichment::EnrichmentError) for the remote
//!   lookup, which never surfaces as an [`Error`]: the engine turns it into a miss
//! - [`Error::is_fatal`] separates run-aborting failures (tag writes, bad
//!   configuration) from the ones the engine recovers from locally
//!
//! # Example
//!
//! ```ignore
//! use cover_minder::error::{Error, Result};
//!
//! fn process_file(path: &Path) -> Result<()> {
//!     let audio = TaggedAudio::open(path)?; // Metadata errors auto-convert
//!     let data = std::fs::read(path)?;      // IO errors auto-convert
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag container could not be read
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Tag container could not be saved
    #[error("Failed to write pictures to {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// Image bytes could not be decoded or encoded
    #[error("Image decode error: {0}")]
    Decode(String),

    /// The audio file's tag format has no picture adapter
    #[error("Unsupported container: {0}")]
    UnsupportedContainer(PathBuf),

    /// File or folder not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a metadata (read) error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a write error.
    pub fn write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error must abort the run.
    ///
    /// Decode failures, unreadable tags, unsupported containers and remote
    /// lookup problems are all handled where they occur.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Write { .. } | Self::Config(_) | Self::Io(_) | Self::NotFound(_) => true,
            Self::WithContext { source, .. } => source.is_fatal(),
            Self::Metadata { .. } | Self::Decode(_) | Self::UnsupportedContainer(_) => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
