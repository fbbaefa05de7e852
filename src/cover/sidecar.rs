//! Detect sidecar cover art files in an album folder.
//!
//! Candidates are ranked by name hint, most specific first:
//! - anything named like cover.*, then folder.*, then front.*
//! - any remaining .png
//! - any remaining .jpg/.jpeg
//!
//! Within a hint, files are taken in file-name order.

use std::path::{Path, PathBuf};

/// Supported image extensions (lowercase)
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// How a file name is matched against a hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameHint {
    /// File name contains the word, case-insensitively
    Contains(&'static str),
    /// File has one of these extensions
    Extension(&'static [&'static str]),
}

/// Name hints in priority order
pub const NAME_HINTS: &[NameHint] = &[
    NameHint::Contains("cover"),
    NameHint::Contains("folder"),
    NameHint::Contains("front"),
    NameHint::Extension(&["png"]),
    NameHint::Extension(&["jpg", "jpeg"]),
];

impl NameHint {
    fn matches(self, path: &Path) -> bool {
        match self {
            Self::Contains(word) => file_name_lower(path).is_some_and(|n| n.contains(word)),
            Self::Extension(exts) => extension_lower(path).is_some_and(|e| exts.contains(&e.as_str())),
        }
    }
}

/// List the image files directly inside `folder`, sorted by file name.
pub fn list_images(folder: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| is_image_file(p))
        .collect();
    images.sort();
    Ok(images)
}

/// Order image files by hint priority, dropping files no hint matches.
///
/// A file appears at most once, under the first hint it matches.
pub fn rank_candidates(images: &[PathBuf]) -> Vec<PathBuf> {
    let mut ranked: Vec<PathBuf> = Vec::with_capacity(images.len());
    for hint in NAME_HINTS {
        for image in images {
            if hint.matches(image) && !ranked.contains(image) {
                ranked.push(image.clone());
            }
        }
    }
    ranked
}

/// Check if a path has an image extension we can decode
pub fn is_image_file(path: &Path) -> bool {
    extension_lower(path).is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

fn file_name_lower(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}
