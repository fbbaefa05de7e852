//! Cover art resolution, normalization and embedding.
//!
//! This module owns everything that touches an image on its way into an
//! audio file:
//!
//! 1. **Sidecar files** - cover.jpg, folder.png, etc. in the album folder
//! 2. **Normalization** - shape-aware resize and re-encode to the target policy
//! 3. **Embedded tags** - reading and rewriting the picture set of a FLAC,
//!    ID3v2 or MP4 container
//!
//! Deciding *when* a file gets rewritten lives in [`crate::reconcile`].

mod embedded;
mod normalize;
mod resolver;
mod sidecar;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use embedded::{ContainerKind, EmbeddedPicture, PictureTags, TaggedAudio};
pub use normalize::{Shape, classify, normalize, target_geometry};
pub use resolver::CoverResolver;

use crate::error::{Error, Result};

/// Default edge length of a normalized cover, in pixels.
pub const DEFAULT_SIZE: u32 = 1000;

/// Output encoding for normalized covers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CoverFormat {
    #[default]
    Jpeg,
    Png,
}

impl CoverFormat {
    /// Encoder format for the `image` crate.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }

    /// MIME type stored alongside the picture in the tag.
    pub fn mime_type(self) -> lofty::picture::MimeType {
        match self {
            Self::Jpeg => lofty::picture::MimeType::Jpeg,
            Self::Png => lofty::picture::MimeType::Png,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }
}

impl std::fmt::Display for CoverFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target size/format policy applied to every cover in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverPolicy {
    /// Target square edge length in pixels
    pub size: u32,
    /// Output encoding
    pub format: CoverFormat,
    /// Never resize, only re-encode
    pub keep_size: bool,
    /// Treat every existing picture as non-conforming and skip match confirmation
    pub force: bool,
}

impl Default for CoverPolicy {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            format: CoverFormat::Jpeg,
            keep_size: false,
            force: false,
        }
    }
}

impl CoverPolicy {
    /// Reject policies that cannot produce a cover.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::config("cover size must be greater than zero"));
        }
        Ok(())
    }

    /// Normalize raw image bytes under this policy.
    pub fn normalize(&self, raw: &[u8]) -> Result<NormalizedCover> {
        normalize(raw, self.size, self.format, self.keep_size)
    }

    /// Whether a picture of the given geometry already satisfies the policy.
    pub fn conforms(&self, size: (u32, u32)) -> bool {
        !self.force && size == (self.size, self.size)
    }
}

/// Encoded cover bytes ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCover {
    /// Encoded image data
    pub data: Vec<u8>,
    /// Width after normalization
    pub width: u32,
    /// Height after normalization
    pub height: u32,
    /// Encoding of `data`
    pub format: CoverFormat,
    /// Whether the geometry changed during normalization
    pub resized: bool,
}

impl NormalizedCover {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Where a folder's cover came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSource {
    /// A loose image file in the folder (cover.jpg, folder.png, ...)
    Sidecar(PathBuf),
    /// A picture already embedded in one of the folder's audio files
    Embedded(PathBuf),
    /// Downloaded from the remote lookup service
    Remote,
}

/// The cover resolved once per folder and reused for every file in it.
#[derive(Debug, Clone)]
pub struct FolderCover {
    pub cover: NormalizedCover,
    pub source: CoverSource,
}
