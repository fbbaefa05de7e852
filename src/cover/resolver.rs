//! Cover resolver - finds the canonical cover for an album folder.
//!
//! Resolves a folder's cover from sidecar image files only:
//! 1. Rank loose images by name hint (cover, folder, front, png, jpg)
//! 2. Normalize the first candidate that decodes
//!
//! A `None` result only means there is no usable loose file. Falling back to
//! art already embedded in the folder's files, or to the remote lookup, is
//! done by the reconciliation engine, which reads those tags anyway.

use std::path::Path;

use super::sidecar::{list_images, rank_candidates};
use super::{CoverPolicy, CoverSource, FolderCover};
use crate::error::{Result, ResultExt};

/// Resolves per-folder covers under a fixed policy.
pub struct CoverResolver {
    policy: CoverPolicy,
}

impl CoverResolver {
    pub fn new(policy: CoverPolicy) -> Self {
        Self { policy }
    }

    /// Resolve the cover for `folder` from its loose image files.
    ///
    /// Candidates that fail to decode are skipped. Only failing to list the
    /// folder is an error.
    pub fn resolve_folder_cover(&self, folder: &Path) -> Result<Option<FolderCover>> {
        let images = list_images(folder)
            .with_context(format!("Failed to list images in {}", folder.display()))?;

        for candidate in rank_candidates(&images) {
            let data = match std::fs::read(&candidate) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "Failed to read cover candidate");
                    continue;
                }
            };

            match self.policy.normalize(&data) {
                Ok(cover) => {
                    tracing::debug!(
                        path = %candidate.display(),
                        width = cover.width,
                        height = cover.height,
                        "Resolved sidecar cover"
                    );
                    return Ok(Some(FolderCover {
                        cover,
                        source: CoverSource::Sidecar(candidate),
                    }));
                }
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "Skipping unreadable cover candidate");
                }
            }
        }

        Ok(None)
    }
}
