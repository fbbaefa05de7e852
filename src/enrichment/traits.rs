//! Trait definitions for the remote lookup and match confirmation.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses [`ItunesClient`](super::ItunesClient) and
//! [`ConsoleConfirm`], while tests substitute in-memory implementations.
//!
//! # Example
//!
//! ```ignore
//! use cover_minder::enrichment::traits::CoverLookup;
//!
//! async fn find<T: CoverLookup>(client: &T) -> Option<RemoteCover> {
//!     client.fetch_cover("Queen", "Jazz", 1000).await.ok().flatten()
//! }
//! ```

use std::io::{BufRead, Write};

use async_trait::async_trait;

use super::domain::{EnrichmentError, RemoteCover, RemoteQuery};

/// Trait for remote cover lookup.
///
/// `Ok(None)` means the service answered but had no matching album.
#[async_trait]
pub trait CoverLookup: Send + Sync {
    /// Search for the cover of `album` by `artist` at `size x size` pixels.
    async fn fetch_cover(
        &self,
        artist: &str,
        album: &str,
        size: u32,
    ) -> Result<Option<RemoteCover>, EnrichmentError>;
}

/// Decides whether a remote match is plausible enough to embed.
pub trait MatchConfirmation {
    fn confirm(&mut self, query: &RemoteQuery, found: &RemoteCover) -> bool;
}

impl<F> MatchConfirmation for F
where
    F: FnMut(&RemoteQuery, &RemoteCover) -> bool,
{
    fn confirm(&mut self, query: &RemoteQuery, found: &RemoteCover) -> bool {
        self(query, found)
    }
}

/// Accepts every match (`--force`, non-interactive runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAccept;

impl MatchConfirmation for AlwaysAccept {
    fn confirm(&mut self, _query: &RemoteQuery, _found: &RemoteCover) -> bool {
        true
    }
}

/// Asks on the terminal before accepting a match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleConfirm;

impl MatchConfirmation for ConsoleConfirm {
    fn confirm(&mut self, query: &RemoteQuery, found: &RemoteCover) -> bool {
        println!();
        println!("Searched: {} - {}", query.artist, query.album);
        println!("Found:    {} - {}", found.artist, found.title);
        print!("Use this cover? [y/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation, declining match");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
