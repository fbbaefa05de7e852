//! Shape-aware cover normalization.
//!
//! Covers that are "square enough" are resized to `size x size`. Anything
//! else keeps its aspect ratio: the short edge becomes `size` and the long
//! edge is scaled by the same factor. Covers are never cropped.

use std::io::Cursor;

use image::DynamicImage;
use image::imageops::FilterType;

use super::{CoverFormat, NormalizedCover};
use crate::error::{Error, Result};

/// Aspect classification of a cover image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square,
    Rectangle,
}

/// Classify an image as square when its edges differ by at most 5% of the
/// long edge (integer division).
pub fn classify(width: u32, height: u32) -> Shape {
    let long = width.max(height);
    let short = width.min(height);
    if long - short <= long / 20 {
        Shape::Square
    } else {
        Shape::Rectangle
    }
}

/// Geometry a `width x height` image should have after normalization.
pub fn target_geometry(width: u32, height: u32, size: u32) -> (u32, u32) {
    let short = width.min(height);
    if short == 0 {
        return (size, size);
    }

    match classify(width, height) {
        Shape::Square => (size, size),
        Shape::Rectangle => {
            let long = width.max(height) as u64;
            let short = short as u64;
            let scaled = ((size as u64 * long + short / 2) / short).min(u32::MAX as u64) as u32;
            if width >= height {
                (scaled, size)
            } else {
                (size, scaled)
            }
        }
    }
}

/// Decode `raw`, resize it under the shape policy and encode it as `format`.
///
/// With `preserve_size` the original geometry is kept and only the encoding
/// changes. `resized` is set only when the geometry actually changed.
pub fn normalize(
    raw: &[u8],
    size: u32,
    format: CoverFormat,
    preserve_size: bool,
) -> Result<NormalizedCover> {
    let decoded = image::load_from_memory(raw).map_err(|e| Error::decode(e.to_string()))?;
    // Alpha and palette images are flattened; JPEG cannot carry them anyway.
    let image = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let (width, height) = (image.width(), image.height());
    let (target_w, target_h) = if preserve_size {
        (width, height)
    } else {
        target_geometry(width, height, size)
    };

    let resized = (target_w, target_h) != (width, height);
    let image = if resized {
        image.resize_exact(target_w, target_h, FilterType::CatmullRom)
    } else {
        image
    };

    let data = encode(&image, format)?;

    Ok(NormalizedCover {
        data,
        width: target_w,
        height: target_h,
        format,
        resized,
    })
}

/// Read image geometry from its header without decoding pixels.
pub fn picture_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| Error::decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| Error::decode(e.to_string()))
}

fn encode(image: &DynamicImage, format: CoverFormat) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format.image_format())
        .map_err(|e| Error::decode(format!("failed to encode {}: {}", format, e)))?;
    Ok(buf.into_inner())
}
