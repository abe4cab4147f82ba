//! Display snippet extraction.
//!
//! A snippet is the first line of a document that mentions the query, cut
//! down to a window around the match when the line is long. All lengths and
//! offsets are counted in characters, not bytes.

use crate::config::SnippetWindow;
use crate::content::{first_line, trim_line};

/// Lines longer than this are windowed around the match.
pub const MAX_SNIPPET_CHARS: usize = 100;
/// Characters kept before the match.
const CONTEXT_BEFORE: i64 = 20;
/// Characters kept after the end of the match.
const CONTEXT_AFTER: i64 = 50;
const ELLIPSIS: &str = "...";

/// Returns the first line of `content` containing `query` (case-insensitive),
/// trimmed and windowed. Falls back to the trimmed first line when the query
/// is empty or matches nothing.
pub fn extract_snippet(content: &str, query: &str, window: SnippetWindow) -> String {
    if content.is_empty() || query.is_empty() {
        return first_line(content).to_string();
    }

    let query = query.to_lowercase();
    for line in content.split('\n') {
        if !line.to_lowercase().contains(&query) {
            continue;
        }
        let snippet = trim_line(line);
        if snippet.chars().count() > MAX_SNIPPET_CHARS {
            return window_around_match(snippet, &query, window);
        }
        return snippet.to_string();
    }

    first_line(content).to_string()
}

fn window_around_match(line: &str, query: &str, window: SnippetWindow) -> String {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len() as i64;
    let query_len = query.chars().count() as i64;

    // -1 when trimming cut into the match (queries with edge whitespace).
    let query_index = match_index(line, query).map_or(-1, |i| i as i64);

    let start = (query_index - CONTEXT_BEFORE).max(0) as usize;
    let end = (query_index + query_len + CONTEXT_AFTER).min(len) as usize;

    match window {
        SnippetWindow::Legacy => legacy_window(&chars, start, end),
        SnippetWindow::Corrected => corrected_window(&chars, start, end),
    }
}

/// `"..." + line[start..]` when `start > 0`, then the first `end - start`
/// characters of that, with a trailing ellipsis when `end` is less than the
/// prefixed length. The prefix therefore eats into the kept text.
fn legacy_window(chars: &[char], start: usize, end: usize) -> String {
    let prefixed: Vec<char> = if start > 0 {
        ELLIPSIS.chars().chain(chars[start..].iter().copied()).collect()
    } else {
        chars.to_vec()
    };

    let mut out: String = prefixed.iter().take(end - start).collect();
    if end < prefixed.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

fn corrected_window(chars: &[char], start: usize, end: usize) -> String {
    let mut out = String::new();
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.extend(&chars[start..end]);
    if end < chars.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Index, in characters of `line` itself, of the first position where the
/// lowercased text starts with `query`. Lowercasing can change the number of
/// characters (`İ` becomes two), so offsets into `line.to_lowercase()` cannot
/// be used to index `line`.
fn match_index(line: &str, query: &str) -> Option<usize> {
    line.char_indices()
        .position(|(byte, _)| starts_with_lowercase(&line[byte..], query))
}

fn starts_with_lowercase(text: &str, prefix: &str) -> bool {
    let mut lowered = text.chars().flat_map(char::to_lowercase);
    prefix.chars().all(|c| lowered.next() == Some(c))
}
