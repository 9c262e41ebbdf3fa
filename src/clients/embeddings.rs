//! Embedding collaborator.
//!
//! Converts chunk texts and query strings into fixed-dimension
//! vectors. The dimensionality is a property of the configured model
//! and is assumed stable for the lifetime of a document.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::clients::map_upstream;
use crate::core::config::Config;
use crate::core::error::{DocQaError, Result};

/// Capability interface for embedding generation
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of chunk texts, preserving input order
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

/// OpenAI embeddings API client
pub struct OpenAiEmbeddings {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct EmbeddingsPayload<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsBody {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiEmbeddings {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.limits.upstream_timeout_secs))
            .build()
            .map_err(|e| {
                DocQaError::ConfigError(format!("failed to build embeddings client: {e}"))
            })?;

        Ok(Self {
            http,
            api_key: config.openai.api_key.clone(),
            model: config.openai.embedding_model.clone(),
            base_url: config.openai.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn request(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingsPayload {
                model: &self.model,
                input,
            })
            .send()
            .await
            .map_err(map_upstream("embedding"))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DocQaError::Upstream(format!(
                "embedding request failed ({status}): {message}"
            )));
        }

        let body: EmbeddingsBody = response.json().await.map_err(map_upstream("embedding"))?;
        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbeddings {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let vectors = self.request(texts).await?;
        if vectors.len() != texts.len() {
            return Err(DocQaError::Upstream(format!(
                "embedding response returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.to_string()];
        let mut vectors = self.request(&input).await?;
        vectors
            .pop()
            .ok_or_else(|| DocQaError::Upstream("embedding response contained no data".to_string()))
    }
}
