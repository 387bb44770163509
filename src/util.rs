//! Small shared helpers for URL cleanup and cookie-file lookup

use std::path::{Path, PathBuf};

/// Maximum caption length accepted by most delivery targets.
pub const MAX_CAPTION_LEN: usize = 1024;

/// Strip query parameters, fragments and trailing slashes from a URL.
///
/// Used for the original-URL backlink attached to media items, so that
/// tracking parameters never leak into results.
pub fn clean_url(url: &str) -> String {
    let cleaned = url.split_once('?').map_or(url, |(head, _)| head);
    let cleaned = cleaned.split_once('#').map_or(cleaned, |(head, _)| head);
    cleaned.trim_matches('/').to_string()
}

/// Truncate a caption to [`MAX_CAPTION_LEN`] characters, on a char boundary.
pub fn truncate_caption(caption: &str) -> String {
    caption.chars().take(MAX_CAPTION_LEN).collect()
}

/// Path to the per-handler cookie file, if one exists.
///
/// Cookie files live as `<cookies_dir>/<handler>.txt`; a missing file is a
/// normal condition, not an error.
pub fn cookie_file_path(cookies_dir: Option<&Path>, handler: &str) -> Option<PathBuf> {
    let dir = cookies_dir?;
    let path = dir.join(format!("{handler}.txt"));
    path.exists().then_some(path)
}
