//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent of
//! the HTTP transport.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **chunker**: Token-window chunking with page attribution
//! - **index**: Per-document vector index and persistence
//! - **extract**: PDF text extraction with page offsets
//! - **ratelimit**: Sliding-window request limiting
//! - **services**: Unified service container

pub mod chunker;
pub mod config;
pub mod error;
pub mod extract;
pub mod index;
pub mod ratelimit;
pub mod services;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DocQaError, Result};
pub use services::Services;
