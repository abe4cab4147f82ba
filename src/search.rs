//! Linear keyword search over file names and text content.
//!
//! Every call rescans the archive and rereads each text file. A file matches
//! when its lowercased relative path, followed by its lowercased content,
//! contains the lowercased query as a plain substring.

use anyhow::Result;

use crate::config::Config;
use crate::content::{first_line, read_text};
use crate::models::{FileEntry, SearchResult};
use crate::scanner::{file_entry, list_files};
use crate::snippet::extract_snippet;

/// Runs a search and returns the hits in scan order. An empty query returns
/// every file in the archive.
pub fn search_archive(config: &Config, query: &str) -> Result<Vec<SearchResult>> {
    let query = query.to_lowercase();
    let mut results = Vec::new();

    for path in list_files(config)? {
        let Some(entry) = file_entry(config, &path) else {
            continue;
        };
        if let Some(result) = match_file(config, &entry, &query) {
            results.push(result);
        }
    }

    Ok(results)
}

/// Decides whether one file matches `query` (already lowercased) and builds
/// its result.
fn match_file(config: &Config, entry: &FileEntry, query: &str) -> Option<SearchResult> {
    let name_lower = entry.relative_path.to_lowercase();

    // Empty text files are treated like unreadable ones.
    let content = if entry.is_text {
        read_text(&entry.path).filter(|c| !c.is_empty())
    } else {
        None
    };

    let mut content_to_search = name_lower.clone();
    let mut first_line_for_title = String::new();
    if let Some(ref content) = content {
        first_line_for_title = first_line(content).to_string();
        content_to_search.push(' ');
        content_to_search.push_str(&content.to_lowercase());
    }

    if !query.is_empty() && !content_to_search.contains(query) {
        return None;
    }

    let fallback = || {
        if first_line_for_title.is_empty() {
            type_placeholder(&entry.extension)
        } else {
            first_line_for_title.clone()
        }
    };

    let display_snippet = if query.is_empty() {
        fallback()
    } else {
        let content_snippet = content
            .as_deref()
            .map(|c| extract_snippet(c, query, config.search.snippet_window))
            .filter(|s| s.to_lowercase().contains(query));

        match content_snippet {
            Some(snippet) => snippet,
            None if name_lower.contains(query) => {
                format!("Filename match: {}", entry.relative_path)
            }
            None => fallback(),
        }
    };

    Some(SearchResult {
        file_name: entry.relative_path.clone(),
        display_snippet,
        first_line_for_title,
        extension: entry.extension.clone(),
        tag: entry.tag.clone(),
    })
}

/// `[PNG File]` style label for files with no usable first line.
fn type_placeholder(extension: &str) -> String {
    format!(
        "[{} File]",
        extension.trim_start_matches('.').to_uppercase()
    )
}

/// CLI entry point: runs a search and prints the results.
pub fn run_search(config: &Config, query: &str, json: bool) -> Result<()> {
    let results = search_archive(config, query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!("{}. [{}] {}", i + 1, result.tag, result.file_name);
        println!("    title: {}", result.page_title());
        println!("    snippet: \"{}\"", result.display_snippet);
        println!();
    }

    Ok(())
}
