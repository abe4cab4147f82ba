//! Document retrieval by relative path.
//!
//! Resolves a path inside the archive root and renders it for the browser:
//! markdown becomes HTML, media is returned as raw bytes, and anything else
//! is shown as escaped preformatted text. Used by both `ma get` and
//! `GET /document/{*path}`.

use pulldown_cmark::{html, Options, Parser};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::config::Config;
use crate::content::{extension_of, media_content_type};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Missing, not a regular file, or outside the archive root.
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("failed to read document {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBody {
    Html(String),
    Media(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content_type: &'static str,
    pub body: DocumentBody,
}

/// Loads and renders the document at `relative_path`.
pub fn get_document(config: &Config, relative_path: &str) -> Result<Document, DocumentError> {
    let path = resolve(&config.archive.root, relative_path)?;
    let ext = extension_of(&path);

    if ext == ".md" {
        let source = read_lossy(&path)?;
        return Ok(Document {
            content_type: HTML_CONTENT_TYPE,
            body: DocumentBody::Html(render_markdown(&source)),
        });
    }

    if let Some(content_type) = media_content_type(&ext) {
        let bytes = std::fs::read(&path).map_err(|source| DocumentError::Read {
            path: path.clone(),
            source,
        })?;
        return Ok(Document {
            content_type,
            body: DocumentBody::Media(bytes),
        });
    }

    let text = read_lossy(&path)?;
    Ok(Document {
        content_type: HTML_CONTENT_TYPE,
        body: DocumentBody::Html(format!("<pre>{}</pre>", escape_html(&text))),
    })
}

/// Maps `relative_path` to a regular file inside `root`.
///
/// Only plain segments are accepted: `..`, absolute paths and drive
/// prefixes are refused outright. The canonical target must also stay under
/// the canonical root, which catches symlinks pointing outside it.
pub fn resolve(root: &Path, relative_path: &str) -> Result<PathBuf, DocumentError> {
    let not_found = || DocumentError::NotFound(relative_path.to_string());

    let relative = Path::new(relative_path);
    let mut joined = root.to_path_buf();
    let mut segments = 0;
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                joined.push(segment);
                segments += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(not_found());
            }
        }
    }
    if segments == 0 {
        return Err(not_found());
    }

    let canonical_root = root.canonicalize().map_err(|_| not_found())?;
    let canonical = joined.canonicalize().map_err(|_| not_found())?;
    if !canonical.starts_with(&canonical_root) {
        return Err(not_found());
    }

    let metadata = std::fs::metadata(&canonical).map_err(|_| not_found())?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    Ok(canonical)
}

fn read_lossy(path: &Path) -> Result<String, DocumentError> {
    let bytes = std::fs::read(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Markdown to HTML with the GitHub-flavoured extensions browsers expect.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// CLI entry point: prints a rendered document, or a summary for media.
pub fn run_get(config: &Config, relative_path: &str) -> anyhow::Result<()> {
    let doc = get_document(config, relative_path)?;

    println!("--- Document ---");
    println!("path:         {}", relative_path);
    println!("content_type: {}", doc.content_type);
    match doc.body {
        DocumentBody::Html(html) => {
            println!();
            println!("{}", html);
        }
        DocumentBody::Media(bytes) => {
            println!("size:         {} bytes", bytes.len());
        }
    }

    Ok(())
}
