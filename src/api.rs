//! HTTP surface for docsum.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /process` – Accept a multipart document upload (field `file`), store it, extract its
//!   text (OCR for images, per-page extraction for PDFs), summarize it chunk by chunk, and
//!   return the stored file URL, extracted text, summary, per-chunk failures, and keywords.
//! - `GET /metrics` – Observe processing counters.
//! - `GET /health` – Liveness probe.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Request and response body shapes live here, separate from the pipeline types.

use crate::extraction::ExtractionError;
use crate::processing::{ChunkFailure, ProcessingApi, ProcessingError, ProcessingOutcome};
use crate::storage::{self, StorageError};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Largest accepted upload, in bytes.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Build the HTTP router exposing the document processing API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: ProcessingApi + 'static,
{
    Router::new()
        .route("/process", post(process_document::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/health", get(get_health))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(service)
}

/// Success response for the `POST /process` endpoint.
#[derive(Serialize)]
struct ProcessResponse {
    /// Public URL of the stored upload.
    file_url: String,
    /// Cleaned text extracted from the document.
    extracted_text: String,
    /// Final summary joined from per-chunk successes.
    summary: String,
    /// Chunks whose summarization failed, in chunk order.
    failed_chunks: Vec<ChunkFailure>,
    /// Ranked key phrases for the document.
    keywords: Vec<String>,
    /// Human-readable completion note.
    message: String,
}

/// Process an uploaded document end to end.
///
/// The first multipart field named `file` is stored under the configured
/// upload directory and then run through the pipeline. Per-chunk
/// summarization failures do not fail the request; they are reported in
/// `failed_chunks` alongside the summary built from the surviving chunks.
async fn process_document<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, AppError>
where
    S: ProcessingApi,
{
    let (file_name, bytes) = read_file_field(&mut multipart).await?;
    let stored = storage::save_upload(&file_name, &bytes).await?;
    let outcome = service
        .process_document(&stored.path, &stored.extension)
        .await?;

    tracing::info!(
        file = %stored.file_name,
        uploaded_at = %stored.uploaded_at,
        chunks = outcome.chunk_count,
        failed = outcome.failed_chunks.len(),
        "Process request completed"
    );

    let message = completion_message(&outcome);
    Ok(Json(ProcessResponse {
        file_url: stored.url,
        extracted_text: outcome.extracted_text,
        summary: outcome.summary,
        failed_chunks: outcome.failed_chunks,
        keywords: outcome.keywords,
        message,
    }))
}

/// Pull the first `file` field out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|error| {
        AppError::BadRequest(format!("Malformed multipart body: {error}"))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Field 'file' is missing a filename".into()))?;
        let bytes = field.bytes().await.map_err(|error| {
            AppError::BadRequest(format!("Failed to read uploaded file: {error}"))
        })?;
        return Ok((file_name, bytes.to_vec()));
    }
    Err(AppError::BadRequest(
        "Multipart field 'file' is required".into(),
    ))
}

fn completion_message(outcome: &ProcessingOutcome) -> String {
    if outcome.failed_chunks.is_empty() {
        "document processed successfully".to_string()
    } else {
        format!(
            "summarized {} of {} chunks; {} failed",
            outcome.summarized_count(),
            outcome.chunk_count,
            outcome.failed_chunks.len()
        )
    }
}

/// Response body for `GET /metrics`.
#[derive(Serialize)]
struct MetricsResponse {
    documents_processed: u64,
    chunks_summarized: u64,
    chunks_failed: u64,
}

/// Return a concise metrics snapshot with processing counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsResponse>
where
    S: ProcessingApi,
{
    let snapshot = service.metrics_snapshot();
    Json(MetricsResponse {
        documents_processed: snapshot.documents_processed,
        chunks_summarized: snapshot.chunks_summarized,
        chunks_failed: snapshot.chunks_failed,
    })
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Liveness probe; healthy once routing and configuration are alive.
async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "process",
                method: "POST",
                path: "/process",
                description: "Upload a document as multipart/form-data (field 'file'), extract \
                              its text, summarize it chunk by chunk, and extract keywords. \
                              Response returns { file_url, extracted_text, summary, \
                              failed_chunks, keywords, message }.",
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return processing counters useful for observability dashboards.",
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Liveness probe returning { status: \"ok\" }.",
            },
        ],
    })
}

enum AppError {
    BadRequest(String),
    Storage(StorageError),
    Processing(ProcessingError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Storage(error) => (storage_status(error), error.to_string()),
            AppError::Processing(error) => (processing_status(error), error.to_string()),
        };
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "Request failed");
        } else {
            tracing::debug!(%status, error = %message, "Rejected request");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Client mistakes are 400s; infrastructure trouble is a 500.
fn storage_status(error: &StorageError) -> StatusCode {
    match error {
        StorageError::MissingExtension
        | StorageError::UnsupportedExtension(_)
        | StorageError::EmptyFile => StatusCode::BAD_REQUEST,
        StorageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn processing_status(error: &ProcessingError) -> StatusCode {
    match error {
        ProcessingError::Extraction(ExtractionError::UnsupportedType { .. })
        | ProcessingError::Extraction(ExtractionError::UnreadableImage(_))
        | ProcessingError::EmptyDocument
        | ProcessingError::InsufficientText { .. } => StatusCode::BAD_REQUEST,
        ProcessingError::Extraction(_) | ProcessingError::Chunking(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<StorageError> for AppError {
    fn from(inner: StorageError) -> Self {
        Self::Storage(inner)
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}
