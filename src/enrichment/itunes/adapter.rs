//! Adapter layer: pick the matching album out of iTunes search results.
//!
//! Album names are compared after stripping edition qualifiers, so
//! "Jazz (2011 Remaster)" and "jazz" are the same album.

use super::dto;

/// Lowercase an album name and drop ` - suffix`, ` [..]` and ` (..)` qualifiers.
///
/// A dash qualifier runs to the end of the name. A bracketed qualifier runs
/// from its first opening bracket to the last closing one, and text after it
/// is kept. Unclosed brackets are left alone.
pub fn clean_album_name(name: &str) -> String {
    let mut cleaned = match name.find(" - ") {
        Some(idx) => name[..idx].to_string(),
        None => name.to_string(),
    };
    cleaned = strip_enclosed(&cleaned, " [", ']');
    cleaned = strip_enclosed(&cleaned, " (", ')');
    cleaned.to_lowercase()
}

/// Remove `open ... close` spanning the first `open` and the last `close` after it.
fn strip_enclosed(name: &str, open: &str, close: char) -> String {
    let Some(start) = name.find(open) else {
        return name.to_string();
    };
    match name.rfind(close) {
        Some(end) if end > start => format!("{}{}", &name[..start], &name[end + close.len_utf8()..]),
        _ => name.to_string(),
    }
}

/// First result whose cleaned collection name equals the cleaned query.
pub fn select_album<'a>(results: &'a [dto::Collection], album: &str) -> Option<&'a dto::Collection> {
    let wanted = clean_album_name(album);
    results.iter().find(|c| {
        c.collection_name
            .as_deref()
            .is_some_and(|name| clean_album_name(name) == wanted)
    })
}

/// Artwork URL for a `size x size` image, derived from the 100px thumbnail.
pub fn artwork_url(collection: &dto::Collection, size: u32) -> Option<String> {
    collection
        .artwork_url100
        .as_deref()
        .map(|url| url.replace("100x100bb", &format!("{size}x{size}bb")))
}
