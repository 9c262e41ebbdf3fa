//! Per-document similarity indexing.
//!
//! # Architecture
//!
//! - **VectorIndex**: exact inner-product search over unit-norm
//!   vectors
//! - **DocumentStore**: per-document artifact pairs on disk, loaded
//!   lazily per call
//!
//! # Storage Structure
//!
//! ```text
//! {vector_dir}/
//! ├── {doc_id}.meta.json
//! └── {doc_id}.index.bin
//! ```

mod store;
mod vector;

pub use store::{DocumentIndex, DocumentStore, IndexMetadata};
pub use vector::{normalize_l2, VectorIndex};
