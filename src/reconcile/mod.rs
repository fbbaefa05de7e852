//! Reconciliation engine - decides, per audio file, whether its embedded
//! pictures need to be written.
//!
//! For each file, in order:
//! 1. No pictures and the folder has a cover: embed it (**New**)
//! 2. Pictures present: re-encode the non-conforming ones and rewrite the
//!    whole set if anything changed (**Converted**), otherwise **Skipped**
//! 3. No pictures and no folder cover: ask the remote lookup, at most once
//!    per album per run (**New** on success)
//! 4. Still nothing: **NotFound**
//!
//! A file's picture set is only ever written as one clear + add all + save.

mod stats;

use std::collections::HashSet;
use std::path::Path;

use lofty::picture::PictureType;
use tracing::{debug, info, warn};

use crate::cover::{CoverPolicy, CoverSource, EmbeddedPicture, FolderCover, NormalizedCover, PictureTags};
use crate::enrichment::{CoverLookup, MatchConfirmation, RemoteQuery};
use crate::error::Result;

pub use stats::{Outcome, RunStats};

/// Result of reconciling one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub outcome: Outcome,
    /// A cover fetched remotely for this file, to be reused by its siblings
    pub downloaded: Option<NormalizedCover>,
}

impl Reconciled {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            downloaded: None,
        }
    }
}

/// Per-run reconciliation state.
///
/// `L` is the remote lookup, `C` confirms remote matches before they are
/// embedded.
pub struct Reconciler<'a, L: ?Sized, C> {
    policy: CoverPolicy,
    remote: Option<&'a L>,
    confirm: C,
    /// Albums already sent to the remote lookup this run
    checked_albums: HashSet<String>,
    dry_run: bool,
}

impl<'a, L, C> Reconciler<'a, L, C>
where
    L: CoverLookup + ?Sized,
    C: MatchConfirmation,
{
    /// Create an engine. Pass `None` as `remote` to stay local.
    pub fn new(policy: CoverPolicy, remote: Option<&'a L>, confirm: C) -> Self {
        Self {
            policy,
            remote,
            confirm,
            checked_albums: HashSet::new(),
            dry_run: false,
        }
    }

    /// Decide outcomes without saving anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether remote lookups are still possible in this run.
    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Find a folder cover among pictures already embedded in `files`.
    ///
    /// Used when the folder has no loose cover image, so siblings without art
    /// can share one that is already there. Only front covers and untyped
    /// (`Other`) pictures qualify, front covers first.
    pub fn discover_embedded_cover<A: PictureTags>(&self, files: &[A]) -> Option<FolderCover> {
        for audio in files {
            let pictures = audio.pictures();
            let Some(picture) = pictures
                .iter()
                .find(|p| p.pic_type() == PictureType::CoverFront)
                .or_else(|| pictures.iter().find(|p| p.pic_type() == PictureType::Other))
            else {
                continue;
            };

            match self.policy.normalize(picture.data()) {
                Ok(cover) => {
                    debug!(path = %audio.path().display(), "Using embedded picture as folder cover");
                    return Some(FolderCover {
                        cover,
                        source: CoverSource::Embedded(audio.path().to_path_buf()),
                    });
                }
                Err(e) => {
                    debug!(path = %audio.path().display(), error = %e, "Embedded picture unusable as folder cover");
                }
            }
        }
        None
    }

    /// Reconcile one audio file against its folder's cover.
    ///
    /// Only a failed save is returned as an error; everything else ends in an
    /// [`Outcome`].
    pub async fn reconcile<A: PictureTags>(
        &mut self,
        audio: &mut A,
        folder: &Path,
        folder_cover: Option<&NormalizedCover>,
        stats: &mut RunStats,
    ) -> Result<Reconciled> {
        let result = if audio.pictures().is_empty() {
            self.reconcile_empty(audio, folder_cover).await?
        } else {
            Reconciled::new(self.reconcile_existing(audio)?)
        };

        stats.record(folder, result.outcome);
        if result.downloaded.is_some() {
            stats.record_download(folder);
        }

        debug!(
            path = %audio.path().display(),
            outcome = result.outcome.label(),
            "Reconciled"
        );
        Ok(result)
    }

    async fn reconcile_empty<A: PictureTags>(
        &mut self,
        audio: &mut A,
        folder_cover: Option<&NormalizedCover>,
    ) -> Result<Reconciled> {
        if let Some(cover) = folder_cover {
            let picture = audio.container().create_picture(cover);
            self.commit(audio, vec![picture])?;
            return Ok(Reconciled::new(Outcome::New));
        }

        if let Some(cover) = self.fetch_remote(audio).await {
            let picture = audio.container().create_picture(&cover);
            self.commit(audio, vec![picture])?;
            return Ok(Reconciled {
                outcome: Outcome::New,
                downloaded: Some(cover),
            });
        }

        Ok(Reconciled::new(Outcome::NotFound))
    }

    /// Re-encode non-conforming pictures and rewrite the set if any changed.
    fn reconcile_existing<A: PictureTags>(&self, audio: &mut A) -> Result<Outcome> {
        let kind = audio.container();
        let mut rebuilt: Vec<EmbeddedPicture> = Vec::with_capacity(audio.pictures().len());
        let mut resized_fuse = false;

        for picture in audio.pictures() {
            let conforming = kind
                .picture_size(picture)
                .is_ok_and(|size| self.policy.conforms(size));
            if conforming {
                rebuilt.push(picture.clone());
                continue;
            }

            match self.policy.normalize(picture.data()) {
                Ok(cover) => {
                    let changed = self.policy.force
                        || cover.resized
                        || !picture.is_encoded_as(self.policy.format);
                    if changed {
                        resized_fuse = true;
                        rebuilt.push(kind.create_picture(&cover).with_type(picture.pic_type()));
                    } else {
                        rebuilt.push(picture.clone());
                    }
                }
                Err(e) => {
                    warn!(path = %audio.path().display(), error = %e, "Keeping undecodable embedded picture");
                    rebuilt.push(picture.clone());
                }
            }
        }

        if !resized_fuse {
            return Ok(Outcome::Skipped);
        }

        self.commit(audio, rebuilt)?;
        Ok(Outcome::Converted)
    }

    /// Ask the remote service for this file's album cover.
    async fn fetch_remote<A: PictureTags>(&mut self, audio: &A) -> Option<NormalizedCover> {
        let remote = self.remote?;
        let (Some(artist), Some(album)) = (audio.artist(), audio.album()) else {
            debug!(path = %audio.path().display(), "No artist/album tags, skipping remote lookup");
            return None;
        };

        if !self.checked_albums.insert(album.to_string()) {
            debug!(album, "Album already looked up this run");
            return None;
        }

        let query = RemoteQuery {
            artist: artist.to_string(),
            album: album.to_string(),
            size: self.policy.size,
        };

        let found = match remote.fetch_cover(&query.artist, &query.album, query.size).await {
            Ok(Some(found)) => found,
            Ok(None) => {
                debug!(artist = %query.artist, album = %query.album, "No remote cover");
                return None;
            }
            Err(e) if e.is_unavailable() => {
                warn!(error = %e, "Remote cover lookup unavailable, continuing with local covers only");
                self.remote = None;
                return None;
            }
            Err(e) => {
                warn!(album = %query.album, error = %e, "Remote cover lookup failed");
                return None;
            }
        };

        if !self.policy.force && !self.confirm.confirm(&query, &found) {
            info!(album = %query.album, "Remote match declined");
            return None;
        }

        match self.policy.normalize(&found.data) {
            Ok(cover) => {
                info!(artist = %found.artist, title = %found.title, "Downloaded cover");
                Some(cover)
            }
            Err(e) => {
                warn!(album = %query.album, error = %e, "Downloaded cover could not be decoded");
                None
            }
        }
    }

    fn commit<A: PictureTags>(&self, audio: &mut A, pictures: Vec<EmbeddedPicture>) -> Result<()> {
        if self.dry_run {
            debug!(path = %audio.path().display(), count = pictures.len(), "Dry run, not saving");
            return Ok(());
        }
        audio.write_pictures(pictures, true)
    }
}
