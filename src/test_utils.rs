//! Test utilities and fixtures for cover-minder tests.
//!
//! Provides in-memory images, an in-memory audio file implementing
//! [`PictureTags`], and a scripted remote lookup, so engine scenarios run
//! without real audio files or network access.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{MemoryAudio, png_bytes};
//!
//! let mut audio = MemoryAudio::flac("01.flac").with_picture(png_bytes(500, 500), Some((500, 500)));
//! ```

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use lofty::picture::{MimeType, PictureType};

use crate::cover::{ContainerKind, EmbeddedPicture, PictureTags};
use crate::enrichment::{CoverLookup, EnrichmentError, RemoteCover};
use crate::error::{Error, Result};

/// Encode a blank `width x height` image in `format`.
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut buf, format)
        .expect("Failed to encode test image");
    buf.into_inner()
}

/// A blank PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}

/// A blank JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Jpeg)
}

/// A FLAC stream with a STREAMINFO block, a trailing PADDING block and no
/// audio frames. Enough for lofty to read and rewrite metadata.
pub fn minimal_flac() -> Vec<u8> {
    let mut data = b"fLaC".to_vec();

    // STREAMINFO, 34 bytes
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x22]);
    data.extend_from_slice(&4096u16.to_be_bytes()); // min block size
    data.extend_from_slice(&4096u16.to_be_bytes()); // max block size
    data.extend_from_slice(&[0; 6]); // frame sizes unknown
    // 44.1kHz, 2 channels, 16 bits per sample, 0 samples
    let packed: u64 = (44_100u64 << 44) | (1 << 41) | (15 << 36);
    data.extend_from_slice(&packed.to_be_bytes());
    data.extend_from_slice(&[0; 16]); // MD5

    // PADDING, last block
    data.extend_from_slice(&[0x81, 0x00, 0x00, 0x10]);
    data.extend_from_slice(&[0; 16]);
    data
}

/// An MP3 with an ID3v2.4 title frame followed by silent MPEG-1 Layer III
/// frames (128 kbps, 44.1kHz).
pub fn minimal_mp3() -> Vec<u8> {
    let mut data = b"ID3".to_vec();
    data.extend_from_slice(&[0x04, 0x00, 0x00]); // v2.4, no flags
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x0F]); // tag size (syncsafe)
    data.extend_from_slice(b"TIT2");
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x05, 0x00, 0x00]);
    data.push(0x03); // UTF-8
    data.extend_from_slice(b"Test");

    const FRAME_LEN: usize = 417;
    for _ in 0..8 {
        let mut frame = vec![0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        data.extend_from_slice(&frame);
    }
    data
}

/// Write `data` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("Failed to write test file");
    path
}

/// An audio file that lives only in memory.
///
/// Lives in `/music/album` and counts how many times it was saved.
#[derive(Debug, Clone)]
pub struct MemoryAudio {
    path: PathBuf,
    kind: ContainerKind,
    pictures: Vec<EmbeddedPicture>,
    artist: Option<String>,
    album: Option<String>,
    fail_writes: bool,
    /// Number of successful saves
    pub writes: usize,
}

impl MemoryAudio {
    pub fn new(name: &str, kind: ContainerKind) -> Self {
        Self {
            path: Path::new("/music/album").join(name),
            kind,
            pictures: Vec::new(),
            artist: None,
            album: None,
            fail_writes: false,
            writes: 0,
        }
    }

    pub fn flac(name: &str) -> Self {
        Self::new(name, ContainerKind::Flac)
    }

    pub fn id3(name: &str) -> Self {
        Self::new(name, ContainerKind::Id3)
    }

    pub fn mp4(name: &str) -> Self {
        Self::new(name, ContainerKind::Mp4)
    }

    /// Add a front cover with optional declared geometry.
    pub fn with_picture(mut self, data: Vec<u8>, declared: Option<(u32, u32)>) -> Self {
        let mime = image::guess_format(&data).ok().map(|f| match f {
            ImageFormat::Png => MimeType::Png,
            _ => MimeType::Jpeg,
        });
        self.pictures
            .push(EmbeddedPicture::new(PictureType::CoverFront, mime, data, declared));
        self
    }

    /// Add a picture of a specific type, without declared geometry.
    pub fn with_typed_picture(mut self, pic_type: PictureType, data: Vec<u8>) -> Self {
        self.pictures
            .push(EmbeddedPicture::new(pic_type, Some(MimeType::Png), data, None));
        self
    }

    pub fn with_tags(mut self, artist: &str, album: &str) -> Self {
        self.artist = Some(artist.to_string());
        self.album = Some(album.to_string());
        self
    }

    /// Make every save fail like a read-only file would.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl PictureTags for MemoryAudio {
    fn path(&self) -> &Path {
        &self.path
    }

    fn container(&self) -> ContainerKind {
        self.kind
    }

    fn pictures(&self) -> &[EmbeddedPicture] {
        &self.pictures
    }

    fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    fn write_pictures(&mut self, pictures: Vec<EmbeddedPicture>, clear: bool) -> Result<()> {
        if self.fail_writes {
            return Err(Error::write(&self.path, "read-only file"));
        }
        if clear {
            self.pictures = pictures;
        } else {
            self.pictures.extend(pictures);
        }
        self.writes += 1;
        Ok(())
    }
}

enum Scripted {
    Miss,
    Hit(RemoteCover),
    Fail(fn() -> EnrichmentError),
}

/// A remote lookup with a scripted answer that counts its calls.
pub struct MockLookup {
    answer: Scripted,
    calls: AtomicUsize,
}

impl MockLookup {
    pub fn miss() -> Self {
        Self::with_answer(Scripted::Miss)
    }

    pub fn hit(cover: RemoteCover) -> Self {
        Self::with_answer(Scripted::Hit(cover))
    }

    pub fn failing(error: fn() -> EnrichmentError) -> Self {
        Self::with_answer(Scripted::Fail(error))
    }

    fn with_answer(answer: Scripted) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoverLookup for MockLookup {
    async fn fetch_cover(
        &self,
        _artist: &str,
        _album: &str,
        _size: u32,
    ) -> std::result::Result<Option<RemoteCover>, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Scripted::Miss => Ok(None),
            Scripted::Hit(cover) => Ok(Some(cover.clone())),
            Scripted::Fail(error) => Err(error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::CoverFormat;

    #[test]
    fn test_image_fixtures() {
        let png = png_bytes(12, 8);
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        assert_eq!(image::load_from_memory(&png).unwrap().width(), 12);

        let jpeg = jpeg_bytes(8, 8);
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_memory_audio_defaults() {
        let audio = MemoryAudio::flac("01.flac").with_picture(png_bytes(4, 4), Some((4, 4)));
        assert_eq!(audio.path(), Path::new("/music/album/01.flac"));
        assert_eq!(audio.pictures().len(), 1);
        assert!(audio.pictures()[0].is_encoded_as(CoverFormat::Png));
        assert!(audio.artist().is_none());
        assert_eq!(audio.writes, 0);
    }

    #[tokio::test]
    async fn test_mock_lookup_counts_calls() {
        let lookup = MockLookup::miss();
        assert!(lookup.fetch_cover("a", "b", 1).await.unwrap().is_none());
        assert!(lookup.fetch_cover("a", "b", 1).await.unwrap().is_none());
        assert_eq!(lookup.calls(), 2);
    }
}
