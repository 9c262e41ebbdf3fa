//! Chat completion collaborator.
//!
//! Produces answers and summaries from composed prompts. The core
//! only needs a single system + user completion, so the trait stays
//! that narrow.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::clients::map_upstream;
use crate::core::config::Config;
use crate::core::error::{DocQaError, Result};

/// Capability interface for language-model completion
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete a system + user prompt pair into answer text
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// OpenAI chat completions API client
pub struct OpenAiChat {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatPayload<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatBody {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiChat {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.limits.upstream_timeout_secs))
            .build()
            .map_err(|e| DocQaError::ConfigError(format!("failed to build chat client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.openai.api_key.clone(),
            model: config.openai.chat_model.clone(),
            base_url: config.openai.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = ChatPayload {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(map_upstream("chat completion"))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DocQaError::Upstream(format!(
                "chat completion failed ({status}): {message}"
            )));
        }

        let body: ChatBody = response
            .json()
            .await
            .map_err(map_upstream("chat completion"))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        Ok(content)
    }
}
