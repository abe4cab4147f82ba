//! Core data models used throughout the archive browser.
//!
//! Nothing here outlives a single request: entries are rebuilt from disk on
//! every scan and results are recomputed on every search.

use serde::Serialize;
use std::path::PathBuf;

/// Tag given to files that sit directly in the archive root.
pub const ROOT_TAG: &str = "ROOT";

/// A regular file found under the archive root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Path relative to the archive root, always `/`-separated.
    pub relative_path: String,
    pub file_name: String,
    /// Lowercased, with the leading dot. Empty when the file has none.
    pub extension: String,
    /// Uppercased top-level directory, or [`ROOT_TAG`].
    pub tag: String,
    pub is_text: bool,
}

/// One search hit, serialized with the field names browser clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub file_name: String,
    pub display_snippet: String,
    pub first_line_for_title: String,
    pub extension: String,
    pub tag: String,
}

impl SearchResult {
    /// Title shown when the document is opened: the name without its final
    /// extension, plus up to 50 characters of the first line.
    pub fn page_title(&self) -> String {
        let stem = match self.file_name.rsplit_once('.') {
            Some((stem, _)) => stem,
            None => self.file_name.as_str(),
        };

        if self.first_line_for_title.is_empty() {
            return stem.to_string();
        }

        let head: String = self.first_line_for_title.chars().take(50).collect();
        let ellipsis = if self.first_line_for_title.chars().count() > 50 {
            "..."
        } else {
            ""
        };
        format!("{} | {}{}", stem, head, ellipsis)
    }
}
