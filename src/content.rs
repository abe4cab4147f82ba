//! File classification by extension and tolerant text reading.

use std::path::Path;
use tracing::debug;

/// Extensions whose contents are read and searched.
pub const TEXT_EXTENSIONS: &[&str] = &[".md", ".txt", ".json", ".xml", ".html", ".js", ".css"];

/// Extensions served back as raw bytes.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".mp3", ".mp4", ".webp", ".svg",
];

const BOM: char = '\u{feff}';

/// Lowercased extension of `path` including the leading dot, or an empty
/// string when there is none. Dotfiles such as `.bashrc` have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

pub fn is_text_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    TEXT_EXTENSIONS.contains(&ext.as_str())
}

/// Content type for extensions that are streamed as raw media. Anything
/// outside [`MEDIA_EXTENSIONS`] is `None`, whatever its MIME type.
pub fn media_content_type(ext: &str) -> Option<&'static str> {
    let ext = ext.to_lowercase();
    if !MEDIA_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    mime_guess::from_ext(ext.trim_start_matches('.')).first_raw()
}

/// Reads `path` as UTF-8. Any failure is reported as `None` so one bad file
/// never aborts a search.
pub fn read_text(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "treating file as unreadable");
            None
        }
    }
}

/// Strips whitespace and byte order marks from both ends of a line.
pub fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == BOM)
}

/// Trimmed first line of `content`, or an empty string.
pub fn first_line(content: &str) -> &str {
    trim_line(content.split('\n').next().unwrap_or_default())
}
