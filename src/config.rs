//! TOML configuration parsing.
//!
//! The archive root is fixed for the lifetime of the process: it is read
//! once here, canonicalized, and handed to every scan and retrieval call
//! through [`Config`].

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    pub root: PathBuf,
    #[serde(default)]
    pub follow_symlinks: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchConfig {
    #[serde(default)]
    pub snippet_window: SnippetWindow,
}

/// How a long matching line is cut down to a display snippet.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnippetWindow {
    /// Window arithmetic compatible with existing browser clients. The
    /// trailing ellipsis test runs against the already-prefixed string.
    #[default]
    Legacy,
    /// Cut `[start, end)` from the line, then add ellipses on whichever side
    /// text was dropped.
    Corrected,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: None,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Config {
    /// Default configuration serving `root`, with no further validation.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            archive: ArchiveConfig {
                root: root.into(),
                follow_symlinks: false,
            },
            search: SearchConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Replaces `[server].bind` with a command-line value, held to the same
    /// socket-address rule as the config file.
    pub fn override_bind(&mut self, bind: &str) -> Result<()> {
        bind.parse::<SocketAddr>().with_context(|| {
            format!(
                "--bind must be a socket address (e.g. 127.0.0.1:3000), got '{}'",
                bind
            )
        })?;
        self.server.bind = bind.to_string();
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&mut config)?;
    Ok(config)
}

fn validate(config: &mut Config) -> Result<()> {
    let root = &config.archive.root;
    if !root.is_dir() {
        bail!(
            "archive.root does not exist or is not a directory: {}",
            root.display()
        );
    }
    config.archive.root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve archive.root: {}", root.display()))?;

    if config.server.bind.parse::<SocketAddr>().is_err() {
        bail!(
            "server.bind must be a socket address (e.g. 127.0.0.1:3000), got '{}'",
            config.server.bind
        );
    }

    if let Some(ref dir) = config.server.static_dir {
        if !dir.is_dir() {
            bail!("server.static_dir is not a directory: {}", dir.display());
        }
    }

    Ok(())
}
