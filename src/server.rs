//! HTTP server for the browser UI.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/search?q=<query>` | JSON array of search results |
//! | `GET`  | `/document/{*path}` | Rendered HTML or raw media |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! When `[server].static_dir` is set, every other path is served from that
//! directory.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "File not found." } }
//! ```
//!
//! Error codes: `not_found` (404), `internal` (500). Messages are generic;
//! paths and causes only go to the server log.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::document::{get_document, DocumentBody, DocumentError};
use crate::models::SearchResult;
use crate::search::search_archive;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Builds the application router. Exposed so tests can serve it on an
/// ephemeral port.
pub fn router(config: Arc<Config>) -> Router {
    let static_dir = config.server.static_dir.clone();
    let state = AppState { config };

    let app = Router::new()
        .route("/search", get(handle_search))
        .route("/document/{*path}", get(handle_document))
        .route("/health", get(handle_health))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

/// Starts the HTTP server on `[server].bind` and runs until the process is
/// terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(Arc::new(config.clone()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        root = %config.archive.root.display(),
        "archive server listening on http://{}",
        bind_addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (`"not_found"` or `"internal"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Handler for `GET /search`.
///
/// The scan is blocking filesystem work, so it runs on the blocking pool.
/// Returns `500` only when the archive root itself cannot be listed.
async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    const MESSAGE: &str = "Internal server error during search.";

    let config = state.config.clone();
    let query = params.q;
    let outcome = tokio::task::spawn_blocking(move || search_archive(&config, &query)).await;

    match outcome {
        Ok(Ok(results)) => Ok(Json(results)),
        Ok(Err(e)) => {
            error!(error = %format!("{:#}", e), "search failed");
            Err(internal(MESSAGE))
        }
        Err(e) => {
            error!(error = %e, "search task failed");
            Err(internal(MESSAGE))
        }
    }
}

// ============ GET /document/{*path} ============

const DOCUMENT_ERROR_MESSAGE: &str = "Error retrieving document.";

/// Handler for `GET /document/{*path}`.
///
/// Markdown and plain text come back as HTML; media comes back as raw bytes
/// with a content type picked from the extension.
async fn handle_document(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let config = state.config.clone();
    let requested = path.clone();
    let outcome = tokio::task::spawn_blocking(move || get_document(&config, &requested)).await;

    let doc = match outcome {
        Ok(Ok(doc)) => doc,
        Ok(Err(e)) => return Err(document_error(&path, e)),
        Err(e) => {
            error!(path = %path, error = %e, "document task failed");
            return Err(internal(DOCUMENT_ERROR_MESSAGE));
        }
    };

    Ok(match doc.body {
        DocumentBody::Html(html) => Html(html).into_response(),
        DocumentBody::Media(bytes) => {
            ([(header::CONTENT_TYPE, doc.content_type)], bytes).into_response()
        }
    })
}

/// Maps a document failure to its response. The path and cause are logged,
/// never returned.
fn document_error(path: &str, err: DocumentError) -> AppError {
    match err {
        DocumentError::NotFound(_) => {
            info!(path = %path, "document not found");
            not_found("File not found.")
        }
        e @ DocumentError::Read { .. } => {
            error!(
                path = %path,
                error = %format!("{:#}", anyhow::Error::from(e)),
                "document read failed"
            );
            internal(DOCUMENT_ERROR_MESSAGE)
        }
    }
}
