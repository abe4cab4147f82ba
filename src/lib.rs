//! # Materials Archive
//!
//! A small local document archive browser.
//!
//! Files under an archive root are walked on every request, searched by a
//! case-insensitive substring match over their relative paths and text
//! content, and rendered for a browser view (markdown as HTML, media as raw
//! bytes, everything else as preformatted text). There is no index and no
//! state between requests.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │   Scanner   │──▶│   Matcher   │──▶│ SearchResult │
//! │  (walkdir)  │   │ + snippets  │   │    (JSON)    │
//! └─────────────┘   └─────────────┘   └──────────────┘
//!        │
//!        ▼
//! ┌─────────────┐        ┌──────────┐   ┌──────────┐
//! │  Document   │───────▶│   CLI    │   │   HTTP   │
//! │  retrieval  │        │   (ma)   │   │  (axum)  │
//! └─────────────┘        └──────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ma files                      # list everything under the archive root
//! ma search "deployment"        # keyword search
//! ma get notes/readme.md        # render one document
//! ma serve                      # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | File entries and search results |
//! | [`content`] | Extension classification and text reading |
//! | [`scanner`] | Recursive archive walk |
//! | [`snippet`] | Display snippet extraction |
//! | [`search`] | Linear keyword search |
//! | [`document`] | Document resolution and rendering |
//! | [`server`] | HTTP server |

pub mod config;
pub mod content;
pub mod document;
pub mod models;
pub mod scanner;
pub mod search;
pub mod server;
pub mod snippet;
