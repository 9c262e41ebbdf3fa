//! External collaborator clients.
//!
//! The indexing core never talks to the network; everything
//! long-latency lives here behind small traits so the HTTP layer and
//! tests can swap implementations. All clients carry explicit
//! request timeouts, and a timeout surfaces as its own error so the
//! caller can report "request timed out" rather than a generic
//! failure.

pub mod chat;
pub mod embeddings;
pub mod qa;
pub mod websearch;

pub use chat::{ChatModel, OpenAiChat};
pub use embeddings::{Embedder, OpenAiEmbeddings};
pub use qa::QaService;
pub use websearch::{format_web_context, WebSearchClient};

use crate::core::error::DocQaError;

/// Map a reqwest error to the service error taxonomy
pub(crate) fn map_upstream(what: &'static str) -> impl FnOnce(reqwest::Error) -> DocQaError {
    move |e| {
        if e.is_timeout() {
            DocQaError::UpstreamTimeout(format!("{what} request timed out"))
        } else {
            DocQaError::Upstream(format!("{what} request failed: {e}"))
        }
    }
}
