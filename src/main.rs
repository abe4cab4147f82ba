//! # Materials Archive CLI (`ma`)
//!
//! Browses a local document archive from the terminal or serves it to a
//! browser over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! ma --config ./config/archive.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ma serve` | Start the HTTP server |
//! | `ma search "<query>"` | Search file names and text content |
//! | `ma get <path>` | Render a document by relative path |
//! | `ma files` | List every file under the archive root |
//!
//! Logging goes to stderr. `ARCHIVE_LOG` (an `EnvFilter` directive such as
//! `materials_archive=debug`) overrides `-v` and `-q`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use materials_archive::{config, document, scanner, search, server};

/// Materials Archive: a local document archive browser.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file naming the archive root.
#[derive(Parser)]
#[command(
    name = "ma",
    about = "Materials Archive: search and browse a local document archive",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/archive.toml")]
    config: PathBuf,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Serves `/search`, `/document/{path}` and `/health`, plus the static
    /// UI directory when `[server].static_dir` is configured.
    Serve {
        /// Override `[server].bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Search file names and text content.
    ///
    /// An empty query lists every file.
    Search {
        /// Case-insensitive substring to look for.
        #[arg(default_value = "")]
        query: String,

        /// Print the raw JSON returned by `GET /search`.
        #[arg(long)]
        json: bool,
    },

    /// Render a document by its path relative to the archive root.
    Get {
        /// Relative path, e.g. `notes/readme.md`.
        path: String,
    },

    /// List every file under the archive root.
    Files,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("ARCHIVE_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                cfg.override_bind(&bind)?;
            }
            server::run_server(&cfg).await?;
        }
        Commands::Search { query, json } => {
            search::run_search(&cfg, &query, json)?;
        }
        Commands::Get { path } => {
            document::run_get(&cfg, &path)?;
        }
        Commands::Files => {
            scanner::run_files(&cfg)?;
        }
    }

    Ok(())
}
