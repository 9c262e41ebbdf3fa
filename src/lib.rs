//! docqa - Retrieval-Augmented Document Q&A Service
//!
//! Ingests PDF documents, splits them into token-bounded chunks with
//! page attribution, embeds the chunks, and answers questions by
//! retrieving the most similar chunks from a per-document vector
//! index.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (transport-agnostic)
//!   - config, error, types, xdg
//!   - chunker (tokenizer trait, token-window chunking)
//!   - index (flat inner-product index, per-document storage)
//!   - extract (PDF text + page-offset table)
//!   - ratelimit (sliding-window limiter)
//!   - services (unified service container)
//!
//! - **clients**: External collaborators (depend on core)
//!   - embeddings, chat, web search, QA composition
//!
//! - **http**: REST API adapter (depends on core and clients)
//!   - router, handlers, middleware, error mapping
//!
//! # Key Properties
//!
//! - Deterministic chunking: identical input always yields identical
//!   chunks, with character offsets recovered by prefix
//!   detokenization
//! - Exact search: stored vectors are unit-normalized and ranked by
//!   inner product (cosine similarity)
//! - Append-only per-document indexes persisted as an artifact pair,
//!   replaced atomically via temp-file-then-rename

// Core domain logic (transport-agnostic)
pub mod core;

// External collaborator clients
pub mod clients;

// HTTP REST adapter
pub mod http;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{DocQaError, Result};
pub use crate::core::services::Services;
pub use crate::core::types::*;
