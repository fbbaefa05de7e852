//! Read and rewrite cover art embedded in audio file tags.
//!
//! Uses lofty for the three containers we know how to rewrite:
//! - FLAC picture blocks (geometry stored inline)
//! - ID3v2 APIC frames (MP3, ADTS AAC)
//! - MP4 `covr` atoms (M4A/AAC)
//!
//! Everything else is reported as [`Error::UnsupportedContainer`] and left
//! untouched.

use std::fs::File;
use std::path::{Path, PathBuf};

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::{AudioFile, FileType, TaggedFileExt};
use lofty::flac::FlacFile;
use lofty::ogg::{OggPictureStorage, VorbisComments};
use lofty::picture::{MimeType, Picture, PictureInformation, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};

use super::normalize::picture_dimensions;
use super::{CoverFormat, NormalizedCover};
use crate::error::{Error, Result};

/// Tag container a file stores its pictures in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Flac,
    Id3,
    Mp4,
}

impl ContainerKind {
    /// Map a probed file type onto a picture container, if we support it.
    pub fn from_file_type(file_type: FileType) -> Option<Self> {
        match file_type {
            FileType::Flac => Some(Self::Flac),
            FileType::Mpeg | FileType::Aac => Some(Self::Id3),
            FileType::Mp4 => Some(Self::Mp4),
            _ => None,
        }
    }

    /// The lofty tag holding pictures for this container.
    pub fn tag_type(self) -> TagType {
        match self {
            Self::Flac => TagType::VorbisComments,
            Self::Id3 => TagType::Id3v2,
            Self::Mp4 => TagType::Mp4Ilst,
        }
    }

    /// Geometry of an embedded picture.
    ///
    /// FLAC declares width and height in the picture block and that value is
    /// trusted. ID3v2 and MP4 carry no geometry, so the bytes are probed.
    pub fn picture_size(self, picture: &EmbeddedPicture) -> Result<(u32, u32)> {
        if let (Self::Flac, Some(declared)) = (self, picture.declared) {
            return Ok(declared);
        }
        picture_dimensions(&picture.data)
    }

    /// Build a front cover picture from a normalized cover.
    pub fn create_picture(self, cover: &NormalizedCover) -> EmbeddedPicture {
        EmbeddedPicture {
            pic_type: PictureType::CoverFront,
            mime_type: Some(cover.format.mime_type()),
            data: cover.data.clone(),
            declared: match self {
                Self::Flac => Some(cover.dimensions()),
                Self::Id3 | Self::Mp4 => None,
            },
            block_info: None,
        }
    }
}

/// One picture stored in an audio file's tag
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedPicture {
    pic_type: PictureType,
    mime_type: Option<MimeType>,
    data: Vec<u8>,
    /// Width and height as declared by the container, when it stores them
    declared: Option<(u32, u32)>,
    /// FLAC picture block metadata as read, written back unchanged
    block_info: Option<PictureInformation>,
}

impl EmbeddedPicture {
    pub fn new(
        pic_type: PictureType,
        mime_type: Option<MimeType>,
        data: Vec<u8>,
        declared: Option<(u32, u32)>,
    ) -> Self {
        Self {
            pic_type,
            mime_type,
            data,
            declared,
            block_info: None,
        }
    }

    fn from_lofty(picture: &Picture, block_info: Option<PictureInformation>) -> Self {
        Self {
            pic_type: picture.pic_type(),
            mime_type: picture.mime_type().cloned(),
            data: picture.data().to_vec(),
            declared: block_info
                .as_ref()
                .map(|info| (info.width, info.height))
                .filter(|&(w, h)| w > 0 && h > 0),
            block_info,
        }
    }

    fn to_lofty(&self) -> Picture {
        Picture::new_unchecked(
            self.pic_type,
            self.mime_type.clone(),
            None,
            self.data.clone(),
        )
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pic_type(&self) -> PictureType {
        self.pic_type
    }

    /// Keep the slot type of the picture being replaced.
    pub fn with_type(mut self, pic_type: PictureType) -> Self {
        self.pic_type = pic_type;
        self
    }

    /// Whether the stored bytes are already encoded as `format`.
    pub fn is_encoded_as(&self, format: CoverFormat) -> bool {
        image::guess_format(&self.data).is_ok_and(|f| f == format.image_format())
    }
}

/// Picture capability shared by every supported container.
///
/// The reconciliation engine only talks to audio files through this trait.
pub trait PictureTags {
    /// Path of the audio file
    fn path(&self) -> &Path;

    /// Container the pictures live in
    fn container(&self) -> ContainerKind;

    /// Pictures currently stored, in tag order (empty when none)
    fn pictures(&self) -> &[EmbeddedPicture];

    /// Track artist, falling back to the performer
    fn artist(&self) -> Option<&str>;

    /// Album title
    fn album(&self) -> Option<&str>;

    /// Replace (`clear`) or extend the picture set and save in one write.
    fn write_pictures(&mut self, pictures: Vec<EmbeddedPicture>, clear: bool) -> Result<()>;
}

/// An audio file on disk whose pictures were read through lofty.
#[derive(Debug, Clone)]
pub struct TaggedAudio {
    path: PathBuf,
    kind: ContainerKind,
    pictures: Vec<EmbeddedPicture>,
    artist: Option<String>,
    album: Option<String>,
}

impl TaggedAudio {
    /// Open an audio file and read its pictures.
    ///
    /// Fails with [`Error::UnsupportedContainer`] when the container has no
    /// picture adapter.
    pub fn open(path: &Path) -> Result<Self> {
        let probe = Probe::open(path).map_err(|e| Error::metadata(path, e.to_string()))?;
        let Some(kind) = probe.file_type().and_then(ContainerKind::from_file_type) else {
            return Err(Error::UnsupportedContainer(path.to_path_buf()));
        };

        let audio = match kind {
            ContainerKind::Flac => Self::read_flac(path)?,
            ContainerKind::Id3 | ContainerKind::Mp4 => {
                let tagged = probe
                    .read()
                    .map_err(|e| Error::metadata(path, e.to_string()))?;
                let tag = tagged
                    .tag(kind.tag_type())
                    .or_else(|| tagged.primary_tag());

                let pictures = tag
                    .map(|t| {
                        t.pictures()
                            .iter()
                            .map(|p| EmbeddedPicture::from_lofty(p, None))
                            .collect()
                    })
                    .unwrap_or_default();

                Self {
                    path: path.to_path_buf(),
                    kind,
                    pictures,
                    artist: tag.and_then(tag_artist),
                    album: tag.and_then(|t| t.album().map(|s| s.to_string())),
                }
            }
        };

        tracing::debug!(
            path = %path.display(),
            container = ?audio.kind,
            pictures = audio.pictures.len(),
            "Read embedded pictures"
        );
        Ok(audio)
    }

    fn read_flac(path: &Path) -> Result<Self> {
        let flac = read_flac_file(path)?;

        let pictures = flac
            .pictures()
            .iter()
            .map(|(picture, info)| EmbeddedPicture::from_lofty(picture, Some(info.clone())))
            .collect();

        let comments = flac.vorbis_comments();
        Ok(Self {
            path: path.to_path_buf(),
            kind: ContainerKind::Flac,
            pictures,
            artist: comments.and_then(vorbis_artist),
            album: comments.and_then(|c| c.album().map(|s| s.to_string())),
        })
    }

    fn save_flac(&self, pictures: &[EmbeddedPicture], clear: bool) -> Result<()> {
        let mut flac = read_flac_file(&self.path)?;

        if clear {
            let existing: Vec<PictureType> =
                flac.pictures().iter().map(|(p, _)| p.pic_type()).collect();
            for pic_type in existing {
                flac.remove_picture_type(pic_type);
            }
        }

        for picture in pictures {
            let info = picture.block_info.clone().or_else(|| {
                picture.declared.map(|(width, height)| PictureInformation {
                    width,
                    height,
                    color_depth: 24,
                    num_colors: 0,
                })
            });
            flac.insert_picture(picture.to_lofty(), info)
                .map_err(|e| Error::write(&self.path, e.to_string()))?;
        }

        flac.save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| Error::write(&self.path, e.to_string()))
    }

    fn save_tag(&self, pictures: &[EmbeddedPicture], clear: bool) -> Result<()> {
        let mut tagged = Probe::open(&self.path)
            .and_then(|p| p.read())
            .map_err(|e| Error::write(&self.path, e.to_string()))?;

        let tag_type = self.kind.tag_type();
        if tagged.tag(tag_type).is_none() {
            tagged.insert_tag(Tag::new(tag_type));
        }
        let Some(tag) = tagged.tag_mut(tag_type) else {
            return Err(Error::write(&self.path, "no tag to hold pictures"));
        };

        if clear {
            let existing: Vec<PictureType> = tag.pictures().iter().map(|p| p.pic_type()).collect();
            for pic_type in existing {
                tag.remove_picture_type(pic_type);
            }
        }

        for picture in pictures {
            tag.push_picture(picture.to_lofty());
        }

        tag.save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| Error::write(&self.path, e.to_string()))
    }
}

impl PictureTags for TaggedAudio {
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
        match self.kind {
            ContainerKind::Flac => self.save_flac(&pictures, clear)?,
            ContainerKind::Id3 | ContainerKind::Mp4 => self.save_tag(&pictures, clear)?,
        }

        tracing::info!(
            path = %self.path.display(),
            count = pictures.len(),
            "Saved embedded pictures"
        );

        if clear {
            self.pictures = pictures;
        } else {
            self.pictures.extend(pictures);
        }
        Ok(())
    }
}

fn read_flac_file(path: &Path) -> Result<FlacFile> {
    let mut file = File::open(path)?;
    FlacFile::read_from(&mut file, ParseOptions::new())
        .map_err(|e| Error::metadata(path, e.to_string()))
}

fn tag_artist(tag: &Tag) -> Option<String> {
    tag.artist()
        .map(|s| s.to_string())
        .or_else(|| tag.get_string(&ItemKey::Performer).map(str::to_string))
}

fn vorbis_artist(comments: &VorbisComments) -> Option<String> {
    comments
        .artist()
        .map(|s| s.to_string())
        .or_else(|| comments.get("PERFORMER").map(str::to_string))
}
