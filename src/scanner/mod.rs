//! Folder discovery.
//!
//! Walks a music tree and groups audio files by the folder that holds them.
//! Each folder is treated as one album with one cover.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Audio file extensions we look at (lowercase)
const AUDIO_EXTENSIONS: &[&str] = &["flac", "mp3", "m4a", "mp4", "aac", "wav", "ogg"];

/// An album folder and the audio files directly inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumFolder {
    pub path: PathBuf,
    pub audio_files: Vec<PathBuf>,
}

/// Scan `root` recursively for folders containing audio files.
///
/// Folders come back in path order and files in file-name order, so two
/// runs over the same tree visit files identically. Unreadable entries are
/// logged and skipped.
pub fn scan_folders(root: &Path) -> Result<Vec<AlbumFolder>> {
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    let mut folders: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_audio_file(entry.path()) {
            continue;
        }

        let Some(parent) = entry.path().parent() else {
            continue;
        };
        folders
            .entry(parent.to_path_buf())
            .or_default()
            .push(entry.path().to_path_buf());
    }

    let folders: Vec<AlbumFolder> = folders
        .into_iter()
        .map(|(path, audio_files)| AlbumFolder { path, audio_files })
        .collect();

    tracing::info!(
        root = %root.display(),
        folders = folders.len(),
        files = total_files(&folders),
        "Scan complete"
    );
    Ok(folders)
}

/// Total audio files across folders
pub fn total_files(folders: &[AlbumFolder]) -> usize {
    folders.iter().map(|f| f.audio_files.len()).sum()
}

/// Check if a path has an audio file extension
pub fn is_audio_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    ext.is_some_and(|e| AUDIO_EXTENSIONS.contains(&e.as_str()))
}
