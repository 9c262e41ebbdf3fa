//! Unified service container for docqa
//!
//! Provides shared access to all core services and collaborator
//! clients.

use std::sync::Arc;

use crate::clients::{ChatModel, Embedder, OpenAiChat, OpenAiEmbeddings, QaService, WebSearchClient};
use crate::core::chunker::{Chunker, SubwordTokenizer, TextTokenizer, WordTokenizer};
use crate::core::config::Config;
use crate::core::error::{DocQaError, Result};
use crate::core::index::DocumentStore;
use crate::core::ratelimit::RateLimiter;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Per-document index storage
    pub storage: Arc<DocumentStore>,

    /// Token-window chunker
    pub chunker: Arc<Chunker>,

    /// Embedding collaborator
    pub embedder: Arc<dyn Embedder>,

    /// Answer and summary composition
    pub qa: Arc<QaService>,

    /// Sliding-window rate limiter
    pub rate_limiter: Arc<RateLimiter>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration, wiring the real
    /// collaborator clients.
    pub fn new(config: Config) -> Result<Self> {
        if config.openai.api_key.is_empty() {
            return Err(DocQaError::ConfigError(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        let embedder = Arc::new(OpenAiEmbeddings::new(&config)?);
        let chat = Arc::new(OpenAiChat::new(&config)?);
        let web = Arc::new(WebSearchClient::new(&config)?);

        Self::with_clients(config, embedder, chat, web)
    }

    /// Create services with injected collaborator implementations
    pub fn with_clients(
        config: Config,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        web: Arc<WebSearchClient>,
    ) -> Result<Self> {
        let storage = Arc::new(DocumentStore::new(config.storage.vector_dir.clone()));

        let tokenizer: Arc<dyn TextTokenizer> = match &config.chunking.tokenizer_file {
            Some(path) => Arc::new(SubwordTokenizer::from_file(path)?),
            None => Arc::new(WordTokenizer::new()),
        };
        let chunker = Arc::new(Chunker::new(tokenizer, config.chunking.max_tokens));

        let qa = Arc::new(QaService::new(chat, web));

        Ok(Self {
            storage,
            chunker,
            embedder,
            qa,
            rate_limiter: Arc::new(RateLimiter::new()),
            config: Arc::new(config),
        })
    }
}
