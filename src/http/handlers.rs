//! HTTP request handlers for the docqa API
//!
//! Implements handlers for all endpoints: health, upload, ask,
//! summarize, and document listing/metadata/delete. Disk-bound
//! store operations run on the blocking thread pool so they never
//! stall unrelated requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Multipart, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tokio::task;
use uuid::Uuid;

use crate::core::error::{DocQaError, Result};
use crate::core::extract::extract_pdf_text;
use crate::core::services::Services;
use crate::core::types::*;

/// Health check handler
///
/// Returns server status and version information.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Upload handler
///
/// Accepts a multipart PDF upload, extracts its text with page
/// offsets, chunks and embeds it, and indexes it under a freshly
/// minted document id.
///
/// # Errors
///
/// - `RateLimited`: too many uploads from this client
/// - `InvalidRequest`: missing/empty/oversized file or wrong type
/// - `ExtractionFailed` / `EmptyDocument`: unreadable or textless PDF
/// - `Upstream` / `UpstreamTimeout`: embedding collaborator failure
pub async fn upload_handler(
    State(services): State<Arc<Services>>,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let client = client_identifier(&headers, connect.as_ref().map(|c| &c.0));
    let limits = &services.config.limits;
    if !services.rate_limiter.check(
        &client,
        limits.upload_max_requests,
        Duration::from_secs(limits.upload_window_secs),
    ) {
        tracing::warn!(client = %client, endpoint = "/api/upload", "rate limit exceeded");
        return Err(DocQaError::RateLimited {
            max_requests: limits.upload_max_requests,
            window_secs: limits.upload_window_secs,
        });
    }

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename = "untitled.pdf".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DocQaError::InvalidRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        if let Some(content_type) = field.content_type() {
            if content_type != "application/pdf" && content_type != "application/octet-stream" {
                return Err(DocQaError::InvalidRequest(
                    "Only PDF files are supported. Please upload a valid PDF file.".to_string(),
                ));
            }
        }
        if let Some(name) = field.file_name() {
            if !name.is_empty() {
                filename = name.to_string();
            }
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| DocQaError::InvalidRequest(format!("failed to read upload: {e}")))?;
        file_bytes = Some(bytes.to_vec());
        break;
    }

    let file_bytes = file_bytes.ok_or_else(|| {
        DocQaError::InvalidRequest("missing 'file' field in multipart body".to_string())
    })?;
    if file_bytes.is_empty() {
        return Err(DocQaError::InvalidRequest(
            "Uploaded file is empty.".to_string(),
        ));
    }
    if file_bytes.len() > limits.max_upload_bytes {
        return Err(DocQaError::InvalidRequest(format!(
            "File size exceeds maximum allowed size of {} MB.",
            limits.max_upload_bytes / (1024 * 1024)
        )));
    }

    tracing::info!(filename = %filename, size = file_bytes.len(), "processing uploaded document");

    // Extraction and chunking are CPU-bound
    let chunker = Arc::clone(&services.chunker);
    let (extracted, chunks) = task::spawn_blocking(move || {
        let extracted = extract_pdf_text(&file_bytes)?;
        if extracted.text.trim().is_empty() {
            return Err(DocQaError::EmptyDocument);
        }
        let chunks = chunker.chunk(&extracted.text, &extracted.page_spans)?;
        Ok((extracted, chunks))
    })
    .await
    .map_err(join_error)??;

    let (chunk_texts, chunk_metadata): (Vec<String>, Vec<ChunkMetadata>) =
        chunks.into_iter().map(|c| (c.text, c.metadata)).unzip();
    let chunk_count = chunk_texts.len();

    let embeddings = services.embedder.embed_texts(&chunk_texts).await?;

    let doc_id = Uuid::new_v4().to_string();
    let document = DocumentInfo {
        filename: Some(filename.clone()),
        upload_date: Some(Utc::now()),
        pages: Some(extracted.pages),
    };

    let storage = Arc::clone(&services.storage);
    {
        let doc_id = doc_id.clone();
        task::spawn_blocking(move || {
            storage.add(
                &doc_id,
                chunk_texts,
                embeddings,
                Some(chunk_metadata),
                Some(document),
            )
        })
        .await
        .map_err(join_error)??;
    }

    tracing::info!(
        doc_id = %doc_id,
        chunks = chunk_count,
        pages = extracted.pages,
        "document indexed"
    );

    Ok(Json(UploadResponse {
        doc_id,
        pages: extracted.pages,
        chunks: chunk_count,
        filename,
    }))
}

/// Ask handler
///
/// Embeds the question, retrieves the most similar chunks from the
/// document's index, and composes a grounded answer.
///
/// # Errors
///
/// - `RateLimited`: too many questions from this client
/// - `InvalidRequest`: empty or oversized question
/// - `DocumentNotFound`: no indexed content under this id
/// - `Upstream` / `UpstreamTimeout`: collaborator failure
pub async fn ask_handler(
    State(services): State<Arc<Services>>,
    Path(doc_id): Path<String>,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let client = client_identifier(&headers, connect.as_ref().map(|c| &c.0));
    let limits = &services.config.limits;
    if !services.rate_limiter.check(
        &client,
        limits.ask_max_requests,
        Duration::from_secs(limits.ask_window_secs),
    ) {
        tracing::warn!(client = %client, endpoint = "/api/ask", "rate limit exceeded");
        return Err(DocQaError::RateLimited {
            max_requests: limits.ask_max_requests,
            window_secs: limits.ask_window_secs,
        });
    }

    let question = req.question.trim().to_string();
    if question.is_empty() {
        return Err(DocQaError::InvalidRequest(
            "Question cannot be empty".to_string(),
        ));
    }
    if question.chars().count() > services.config.search.max_question_length {
        return Err(DocQaError::InvalidRequest(format!(
            "Question exceeds maximum length of {} characters",
            services.config.search.max_question_length
        )));
    }

    // Reject unknown documents before paying for an embedding call
    let storage = Arc::clone(&services.storage);
    let indexed = {
        let doc_id = doc_id.clone();
        task::spawn_blocking(move || storage.is_indexed(&doc_id))
            .await
            .map_err(join_error)??
    };
    if !indexed {
        return Err(DocQaError::DocumentNotFound(doc_id));
    }

    let query = services.embedder.embed_query(&question).await?;

    let top_k = req
        .top_k
        .unwrap_or(services.config.search.default_k)
        .clamp(1, services.config.search.max_k);

    let storage = Arc::clone(&services.storage);
    let hits = {
        let doc_id = doc_id.clone();
        task::spawn_blocking(move || storage.search(&doc_id, &query, top_k))
            .await
            .map_err(join_error)??
    };

    let contexts: Vec<String> = hits.iter().map(|h| h.text.clone()).collect();
    let answer = services
        .qa
        .answer(&question, &contexts, req.use_web_search)
        .await?;

    let contexts = hits
        .into_iter()
        .enumerate()
        .map(|(i, hit)| ContextSnippet {
            rank: i + 1,
            score: hit.score,
            text: hit.text,
            page_numbers: hit.page_numbers,
        })
        .collect();

    Ok(Json(AskResponse {
        doc_id,
        answer: answer.answer,
        sources: answer.sources,
        contexts,
    }))
}

/// Summarize handler
///
/// Joins the first stored chunks of a document and asks the chat
/// collaborator for a short summary.
///
/// # Errors
///
/// - `DocumentNotFound`: no indexed content under this id
/// - `Upstream` / `UpstreamTimeout`: chat collaborator failure
pub async fn summarize_handler(
    State(services): State<Arc<Services>>,
    Path(doc_id): Path<String>,
) -> Result<Json<SummarizeResponse>> {
    let storage = Arc::clone(&services.storage);
    let view = {
        let doc_id = doc_id.clone();
        task::spawn_blocking(move || storage.open(&doc_id))
            .await
            .map_err(join_error)??
    };
    if !view.is_indexed() {
        return Err(DocQaError::DocumentNotFound(doc_id));
    }

    // A prefix of the document is enough for a short summary
    let joined = view
        .chunks
        .iter()
        .take(20)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    let summary = services.qa.summarize(&joined, 220).await?;

    Ok(Json(SummarizeResponse { doc_id, summary }))
}

/// List documents handler
pub async fn list_documents_handler(
    State(services): State<Arc<Services>>,
) -> Result<Json<DocumentsResponse>> {
    let storage = Arc::clone(&services.storage);
    let documents = task::spawn_blocking(move || storage.list())
        .await
        .map_err(join_error)??;

    Ok(Json(DocumentsResponse { documents }))
}

/// Get document metadata handler
///
/// # Errors
///
/// - `DocumentNotFound`: no metadata artifact under this id
pub async fn get_document_handler(
    State(services): State<Arc<Services>>,
    Path(doc_id): Path<String>,
) -> Result<Json<DocumentSummary>> {
    let storage = Arc::clone(&services.storage);
    let summary = task::spawn_blocking(move || storage.document(&doc_id))
        .await
        .map_err(join_error)??;

    Ok(Json(summary))
}

/// Delete document handler
///
/// Removes both persisted artifacts for the document.
///
/// # Errors
///
/// - `DocumentNotFound`: nothing stored under this id
pub async fn delete_document_handler(
    State(services): State<Arc<Services>>,
    Path(doc_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let storage = Arc::clone(&services.storage);
    {
        let doc_id = doc_id.clone();
        task::spawn_blocking(move || storage.delete(&doc_id))
            .await
            .map_err(join_error)??;
    }

    tracing::info!(doc_id = %doc_id, "document deleted");

    Ok(Json(DeleteResponse {
        status: "deleted".to_string(),
        doc_id,
    }))
}

/// Resolve the client identity used for rate limiting
fn client_identifier(headers: &HeaderMap, addr: Option<&SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    addr.map(|a| a.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn join_error(e: task::JoinError) -> DocQaError {
    DocQaError::StorageError(format!("blocking task failed: {e}"))
}
