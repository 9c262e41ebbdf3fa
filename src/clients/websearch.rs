//! Web search collaborator (Tavily).
//!
//! Entirely optional: without an API key every search returns no
//! results, and request failures degrade to an empty result list so
//! document-only answering keeps working.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clients::map_upstream;
use crate::core::config::Config;
use crate::core::error::{DocQaError, Result};
use crate::core::types::WebResult;

/// Tavily search client
pub struct WebSearchClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    max_results: usize,
}

#[derive(Serialize)]
struct SearchPayload<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    include_answer: bool,
    include_raw_content: bool,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(default)]
    results: Vec<WebResult>,

    #[serde(default)]
    answer: Option<String>,
}

impl WebSearchClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.websearch.timeout_secs))
            .build()
            .map_err(|e| {
                DocQaError::ConfigError(format!("failed to build web search client: {e}"))
            })?;

        let api_key = if config.websearch.api_key.is_empty() {
            None
        } else {
            Some(config.websearch.api_key.clone())
        };

        Ok(Self {
            http,
            api_key,
            base_url: config.websearch.base_url.trim_end_matches('/').to_string(),
            max_results: config.websearch.max_results,
        })
    }

    /// Whether a key is configured at all
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search the web, returning an empty list when disabled or on
    /// any failure.
    pub async fn search(&self, query: &str) -> Vec<WebResult> {
        let Some(api_key) = &self.api_key else {
            return Vec::new();
        };

        match self.request(api_key, query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "web search failed; continuing without web context");
                Vec::new()
            }
        }
    }

    async fn request(&self, api_key: &str, query: &str) -> Result<Vec<WebResult>> {
        let url = format!("{}/search", self.base_url);
        let payload = SearchPayload {
            api_key,
            query,
            max_results: self.max_results,
            include_answer: true,
            include_raw_content: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(map_upstream("web search"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocQaError::Upstream(format!(
                "web search failed with status {status}"
            )));
        }

        let body: SearchBody = response.json().await.map_err(map_upstream("web search"))?;

        let mut results = body.results;
        if let Some(answer) = body.answer {
            if !answer.is_empty() {
                results.insert(
                    0,
                    WebResult {
                        title: "Answer".to_string(),
                        url: String::new(),
                        content: answer,
                        score: 1.0,
                    },
                );
            }
        }
        Ok(results)
    }
}

/// Format web search results into a context block for the prompt
pub fn format_web_context(results: &[WebResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut formatted = vec!["=== Web Search Results ===\n".to_string()];
    for (i, result) in results.iter().take(5).enumerate() {
        formatted.push(format!("[{}] {}", i + 1, result.title));
        if !result.url.is_empty() {
            formatted.push(format!("URL: {}", result.url));
        }
        let content: String = result.content.chars().take(500).collect();
        formatted.push(format!("Content: {content}..."));
        formatted.push(String::new());
    }

    formatted.join("\n")
}
