//! Per-document index storage.
//!
//! Each document id owns two artifacts in the vector directory,
//! named deterministically so they can be located, listed, and
//! deleted as a pair:
//!
//! ```text
//! {vector_dir}/
//! ├── {doc_id}.meta.json    # dim, chunk texts, chunk metadata, document fields
//! └── {doc_id}.index.bin    # bincode-encoded VectorIndex
//! ```
//!
//! Every operation materializes its own view of a document from disk
//! at call time; there is no long-lived in-memory index. Writes to
//! the same id are serialized through a per-id lock, and artifacts
//! are replaced via temp-file-then-rename so a partially written
//! artifact is never visible.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::core::error::{DocQaError, Result};
use crate::core::index::vector::VectorIndex;
use crate::core::types::{ChunkMetadata, DocumentInfo, DocumentSummary, SearchHit};

/// Persisted metadata artifact for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub doc_id: String,
    pub dim: usize,
    pub chunks: Vec<String>,
    pub chunk_metadata: Vec<ChunkMetadata>,
    #[serde(flatten)]
    pub document: DocumentInfo,
}

/// Borrowed view of the metadata artifact used at persist time
#[derive(Serialize)]
struct IndexMetadataRef<'a> {
    doc_id: &'a str,
    dim: usize,
    chunks: &'a [String],
    chunk_metadata: &'a [ChunkMetadata],
    #[serde(flatten)]
    document: &'a DocumentInfo,
}

/// In-memory view of one document's index, loaded per call
#[derive(Debug)]
pub struct DocumentIndex {
    pub doc_id: String,
    /// None until the first add for this id
    pub index: Option<VectorIndex>,
    pub chunks: Vec<String>,
    pub chunk_metadata: Vec<ChunkMetadata>,
    pub document: DocumentInfo,
}

impl DocumentIndex {
    fn uninitialized(doc_id: &str) -> Self {
        Self {
            doc_id: doc_id.to_string(),
            index: None,
            chunks: Vec::new(),
            chunk_metadata: Vec::new(),
            document: DocumentInfo::default(),
        }
    }

    /// Whether this document has been through at least one add
    pub fn is_indexed(&self) -> bool {
        self.index.is_some() && !self.chunks.is_empty()
    }

    /// Rank stored chunks against a query embedding.
    ///
    /// Entries whose chunk index has no stored text (out-of-sync
    /// artifact pair) are skipped rather than returned empty.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let index = self
            .index
            .as_ref()
            .ok_or_else(|| DocQaError::IndexNotInitialized(self.doc_id.clone()))?;

        let mut hits = Vec::new();
        for (chunk_index, score) in index.search(query, top_k)? {
            let Some(text) = self.chunks.get(chunk_index) else {
                tracing::warn!(
                    doc_id = %self.doc_id,
                    chunk_index,
                    "stored vector has no chunk text; skipping"
                );
                continue;
            };
            let page_numbers = self
                .chunk_metadata
                .get(chunk_index)
                .map(|m| m.page_numbers.clone())
                .unwrap_or_default();
            hits.push(SearchHit {
                chunk_index,
                score,
                text: text.clone(),
                page_numbers,
            });
        }
        Ok(hits)
    }
}

/// Store managing per-document artifact pairs under one directory
pub struct DocumentStore {
    vector_dir: PathBuf,
    /// Per-id write serialization; entries are dropped on delete to
    /// keep the map bounded
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DocumentStore {
    pub fn new(vector_dir: PathBuf) -> Self {
        Self {
            vector_dir,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn vector_dir(&self) -> &Path {
        &self.vector_dir
    }

    fn meta_path(&self, doc_id: &str) -> PathBuf {
        self.vector_dir.join(format!("{doc_id}.meta.json"))
    }

    fn index_path(&self, doc_id: &str) -> PathBuf {
        self.vector_dir.join(format!("{doc_id}.index.bin"))
    }

    fn write_lock(&self, doc_id: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .write_locks
            .lock()
            .map_err(|_| DocQaError::StorageError("write lock map poisoned".to_string()))?;
        Ok(Arc::clone(
            locks.entry(doc_id.to_string()).or_default(),
        ))
    }

    /// Load the current view of a document.
    ///
    /// Absent metadata yields an uninitialized view; metadata
    /// without an index artifact yields an empty index of the
    /// recorded dimensionality (the pair is trusted as-is, per the
    /// no-self-healing policy).
    pub fn open(&self, doc_id: &str) -> Result<DocumentIndex> {
        let meta_path = self.meta_path(doc_id);
        if !meta_path.exists() {
            return Ok(DocumentIndex::uninitialized(doc_id));
        }

        let contents = fs::read_to_string(&meta_path)?;
        let meta: IndexMetadata = serde_json::from_str(&contents)?;

        let index_path = self.index_path(doc_id);
        let index = if index_path.exists() {
            let bytes = fs::read(&index_path)?;
            let (index, _): (VectorIndex, usize) =
                bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).map_err(
                    |e| {
                        DocQaError::StorageError(format!(
                            "corrupt index artifact for {doc_id}: {e}"
                        ))
                    },
                )?;
            index
        } else {
            VectorIndex::new(meta.dim.max(1))
        };

        Ok(DocumentIndex {
            doc_id: doc_id.to_string(),
            index: Some(index),
            chunks: meta.chunks,
            chunk_metadata: meta.chunk_metadata,
            document: meta.document,
        })
    }

    /// Whether a document has indexed content
    pub fn is_indexed(&self, doc_id: &str) -> Result<bool> {
        Ok(self.open(doc_id)?.is_indexed())
    }

    /// Whether a metadata artifact exists for this id
    pub fn exists(&self, doc_id: &str) -> bool {
        self.meta_path(doc_id).exists()
    }

    /// Append chunks and their embeddings to a document's index,
    /// creating it on first use, then persist the full state.
    ///
    /// Embeddings are L2-normalized before storage. `chunk_metadata`
    /// must match `chunk_texts` in length when supplied; otherwise
    /// each chunk gets an empty record. Document fields in
    /// `document` are merged over any previously stored ones. A
    /// dimensionality different from the document's first add is
    /// rejected.
    pub fn add(
        &self,
        doc_id: &str,
        chunk_texts: Vec<String>,
        embeddings: Vec<Vec<f32>>,
        chunk_metadata: Option<Vec<ChunkMetadata>>,
        document: Option<DocumentInfo>,
    ) -> Result<()> {
        if chunk_texts.is_empty() {
            return Err(DocQaError::InvalidRequest(
                "no chunks to add".to_string(),
            ));
        }
        if chunk_texts.len() != embeddings.len() {
            return Err(DocQaError::InvalidRequest(format!(
                "{} chunk texts but {} embeddings",
                chunk_texts.len(),
                embeddings.len()
            )));
        }
        if let Some(metadata) = &chunk_metadata {
            if metadata.len() != chunk_texts.len() {
                return Err(DocQaError::InvalidRequest(format!(
                    "{} chunk texts but {} metadata records",
                    chunk_texts.len(),
                    metadata.len()
                )));
            }
        }
        let dim = embeddings[0].len();
        if dim == 0 {
            return Err(DocQaError::InvalidRequest(
                "embeddings must be non-empty vectors".to_string(),
            ));
        }

        let lock = self.write_lock(doc_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| DocQaError::StorageError("write lock poisoned".to_string()))?;

        let mut view = self.open(doc_id)?;
        let index = view.index.get_or_insert_with(|| VectorIndex::new(dim));
        index.add(&embeddings)?;

        let added = chunk_texts.len();
        view.chunks.extend(chunk_texts);
        match chunk_metadata {
            Some(metadata) => view.chunk_metadata.extend(metadata),
            None => view
                .chunk_metadata
                .extend(std::iter::repeat_with(ChunkMetadata::default).take(added)),
        }
        if let Some(document) = document {
            view.document.merge(document);
        }

        self.persist(&view)
    }

    /// Rank a document's chunks against a query embedding
    pub fn search(&self, doc_id: &str, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let view = self.open(doc_id)?;
        if !view.is_indexed() {
            return Err(DocQaError::IndexNotInitialized(doc_id.to_string()));
        }
        view.search(query, top_k)
    }

    /// Remove both artifacts for a document.
    ///
    /// Succeeds when at least one artifact exists; removing a pair
    /// where only one artifact survives a partial write is still a
    /// successful delete.
    pub fn delete(&self, doc_id: &str) -> Result<()> {
        let lock = self.write_lock(doc_id)?;
        {
            let _guard = lock
                .lock()
                .map_err(|_| DocQaError::StorageError("write lock poisoned".to_string()))?;

            let meta_path = self.meta_path(doc_id);
            let index_path = self.index_path(doc_id);
            let had_meta = meta_path.exists();
            let had_index = index_path.exists();

            if !had_meta && !had_index {
                return Err(DocQaError::DocumentNotFound(doc_id.to_string()));
            }

            if had_meta {
                fs::remove_file(&meta_path)?;
            }
            if had_index {
                fs::remove_file(&index_path)?;
            }
        }

        if let Ok(mut locks) = self.write_locks.lock() {
            locks.remove(doc_id);
        }
        Ok(())
    }

    /// Read a document's metadata artifact
    pub fn metadata(&self, doc_id: &str) -> Result<IndexMetadata> {
        let meta_path = self.meta_path(doc_id);
        if !meta_path.exists() {
            return Err(DocQaError::DocumentNotFound(doc_id.to_string()));
        }
        let contents = fs::read_to_string(&meta_path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Summary of one document for the listing endpoints
    pub fn document(&self, doc_id: &str) -> Result<DocumentSummary> {
        Ok(summarize(doc_id, self.metadata(doc_id)?))
    }

    /// List all documents, newest upload first
    pub fn list(&self) -> Result<Vec<DocumentSummary>> {
        if !self.vector_dir.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(&self.vector_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(doc_id) = name.strip_suffix(".meta.json") else {
                continue;
            };
            match self.metadata(doc_id) {
                Ok(meta) => documents.push(summarize(doc_id, meta)),
                Err(e) => {
                    tracing::warn!(doc_id, error = %e, "skipping unreadable metadata artifact")
                }
            }
        }

        documents.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(documents)
    }

    /// Persist both artifacts for a loaded view
    fn persist(&self, view: &DocumentIndex) -> Result<()> {
        let index = view.index.as_ref().ok_or_else(|| {
            DocQaError::StorageError("cannot persist uninitialized index".to_string())
        })?;

        fs::create_dir_all(&self.vector_dir)?;

        let meta = IndexMetadataRef {
            doc_id: &view.doc_id,
            dim: index.dim(),
            chunks: &view.chunks,
            chunk_metadata: &view.chunk_metadata,
            document: &view.document,
        };
        let json = serde_json::to_vec(&meta)?;
        write_atomic(&self.meta_path(&view.doc_id), &json)?;

        let bytes = bincode::serde::encode_to_vec(index, bincode::config::standard())
            .map_err(|e| DocQaError::StorageError(format!("failed to encode index: {e}")))?;
        write_atomic(&self.index_path(&view.doc_id), &bytes)?;

        Ok(())
    }
}

/// Replace a file's contents atomically via a sibling temp file
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| DocQaError::StorageError(format!("no parent directory for {path:?}")))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| DocQaError::IoError(e.error))?;
    Ok(())
}

fn summarize(doc_id: &str, meta: IndexMetadata) -> DocumentSummary {
    DocumentSummary {
        doc_id: doc_id.to_string(),
        filename: meta
            .document
            .filename
            .unwrap_or_else(|| "Unknown".to_string()),
        upload_date: meta.document.upload_date,
        pages: meta.document.pages.unwrap_or(0),
        chunks: meta.chunks.len(),
        dim: meta.dim,
    }
}
