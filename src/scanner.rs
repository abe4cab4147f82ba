//! Archive scanner.
//!
//! Walks the archive root with [`walkdir`] on every call. Entries that cannot
//! be read are logged and skipped; only a failure on the root itself is an
//! error. When symlinks are followed, only files whose target stays under
//! the root are listed, matching what document retrieval will serve.

use anyhow::{bail, Context, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::content::{extension_of, is_text_extension};
use crate::models::{FileEntry, ROOT_TAG};

/// Every regular file under the archive root, at any depth.
///
/// Entries are visited in file-name order within each directory, so two
/// scans of an unchanged tree agree.
pub fn list_files(config: &Config) -> Result<Vec<PathBuf>> {
    let root = &config.archive.root;
    let metadata = std::fs::metadata(root)
        .with_context(|| format!("Failed to read archive root: {}", root.display()))?;
    if !metadata.is_dir() {
        bail!("Archive root is not a directory: {}", root.display());
    }

    let canonical_root = if config.archive.follow_symlinks {
        let canonical = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve archive root: {}", root.display()))?;
        Some(canonical)
    } else {
        None
    };

    let walker = WalkDir::new(root)
        .follow_links(config.archive.follow_symlinks)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e)
                    .with_context(|| format!("Failed to list archive root: {}", root.display()));
            }
            Err(e) => {
                let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!(path = %path, error = %e, "skipping unreadable archive entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(canonical_root) = &canonical_root {
            if !resolves_under(entry.path(), canonical_root) {
                debug!(path = %entry.path().display(), "skipping link that leaves the archive root");
                continue;
            }
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

fn resolves_under(path: &Path, canonical_root: &Path) -> bool {
    path.canonicalize()
        .map(|target| target.starts_with(canonical_root))
        .unwrap_or(false)
}

/// Builds the [`FileEntry`] for a path produced by [`list_files`].
///
/// Returns `None` for paths outside the archive root.
pub fn file_entry(config: &Config, path: &Path) -> Option<FileEntry> {
    let relative = path.strip_prefix(&config.archive.root).ok()?;

    let segments: Vec<String> = relative
        .components()
        .map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    let (file_name, dirs) = segments.split_last()?;

    let tag = match dirs.first() {
        Some(top) => top.to_uppercase(),
        None => ROOT_TAG.to_string(),
    };
    let extension = extension_of(path);

    Some(FileEntry {
        path: path.to_path_buf(),
        relative_path: segments.join("/"),
        file_name: file_name.clone(),
        is_text: is_text_extension(&extension),
        extension,
        tag,
    })
}

/// CLI entry point: lists every file with its tag and classification.
pub fn run_files(config: &Config) -> Result<()> {
    let files = list_files(config)?;
    if files.is_empty() {
        println!("No files under {}.", config.archive.root.display());
        return Ok(());
    }

    for path in &files {
        let Some(entry) = file_entry(config, path) else {
            continue;
        };
        let kind = if entry.is_text { "text" } else { "binary" };
        println!("{:<12} {:<6} {}", entry.tag, kind, entry.relative_path);
    }
    println!();
    println!("{} files", files.len());

    Ok(())
}
