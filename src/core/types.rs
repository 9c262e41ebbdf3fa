//! Core data types for the docqa service.
//!
//! This module defines all data structures used throughout the
//! application, including chunks, page spans, search hits, and the
//! request/response types of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Character range of one source page within the concatenated
/// document text.
///
/// Ranges are disjoint and increase monotonically with `page_num`;
/// only pages that produced non-empty text get a span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpan {
    /// First character of the page in the concatenated text
    pub start_char: usize,

    /// One-past-last character of the page
    pub end_char: usize,

    /// 1-based source page number
    pub page_num: u32,
}

/// Metadata attached to a single chunk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Sorted distinct page numbers whose range overlaps the chunk
    #[serde(default)]
    pub page_numbers: Vec<u32>,

    /// Character offset of the chunk within the full document text,
    /// recomputed via prefix detokenization
    #[serde(default)]
    pub start_char: usize,

    /// Character offset one past the end of the chunk
    #[serde(default)]
    pub end_char: usize,
}

/// A single retrieval unit produced by the chunker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Detokenized chunk text
    pub text: String,

    /// Offsets and page attribution
    pub metadata: ChunkMetadata,
}

/// Document-level fields stored alongside the chunk lists.
///
/// All fields are optional: `add` calls without document metadata
/// leave them untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
}

impl DocumentInfo {
    /// Merge another record into this one; fields present in `other`
    /// win.
    pub fn merge(&mut self, other: DocumentInfo) {
        if other.filename.is_some() {
            self.filename = other.filename;
        }
        if other.upload_date.is_some() {
            self.upload_date = other.upload_date;
        }
        if other.pages.is_some() {
            self.pages = other.pages;
        }
    }
}

/// One ranked result from a similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Position of the chunk within the document's index
    pub chunk_index: usize,

    /// Inner-product similarity against the normalized query
    /// (equivalent to cosine similarity)
    pub score: f32,

    /// Stored chunk text
    pub text: String,

    /// Page attribution carried over from the chunk metadata
    pub page_numbers: Vec<u32>,
}

/// Summary row returned by the document listing endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub doc_id: String,
    pub filename: String,
    pub upload_date: Option<DateTime<Utc>>,
    pub pages: u32,
    pub chunks: usize,
    pub dim: usize,
}

/// A single web search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebResult {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub score: f32,
}

/// Which sources contributed to an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSources {
    /// True when document context was available
    pub document: bool,

    /// True when web search ran and returned results
    pub web: bool,

    /// Up to three web results included for transparency
    pub web_results: Vec<WebResult>,
}

/// Composed answer returned by the QA service
#[derive(Debug, Clone)]
pub struct Answer {
    pub answer: String,
    pub sources: AnswerSources,
}

// --- HTTP API types ---

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response from a document upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub doc_id: String,
    pub pages: u32,
    pub chunks: usize,
    pub filename: String,
}

/// Request to ask a question against an indexed document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,

    #[serde(default)]
    pub use_web_search: bool,

    /// Number of chunks to retrieve (defaults to the configured k)
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// One retrieved context snippet echoed back for transparency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub rank: usize,
    pub score: f32,
    pub text: String,
    pub page_numbers: Vec<u32>,
}

/// Response from the ask endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub doc_id: String,
    pub answer: String,
    pub sources: AnswerSources,
    pub contexts: Vec<ContextSnippet>,
}

/// Response from the summarize endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub doc_id: String,
    pub summary: String,
}

/// Response from listing documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsResponse {
    pub documents: Vec<DocumentSummary>,
}

/// Response from deleting a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    pub doc_id: String,
}
