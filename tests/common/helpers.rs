// Test helper functions and mock collaborators
//
// Shared across test binaries; not every binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tempfile::TempDir;

use docqa::clients::{ChatModel, Embedder, WebSearchClient};
use docqa::core::config::Config;
use docqa::core::error::Result;
use docqa::core::services::Services;

/// Deterministic embedder: 26-dimensional letter-frequency vectors.
///
/// Texts sharing words embed close together, which is enough for
/// ranking assertions without a model.
pub struct LetterEmbedder;

fn letter_frequencies(text: &str) -> Vec<f32> {
    let mut counts = vec![0.0f32; 26];
    for c in text.chars().flat_map(|c| c.to_lowercase()) {
        if c.is_ascii_lowercase() {
            counts[(c as u8 - b'a') as usize] += 1.0;
        }
    }
    counts
}

#[async_trait]
impl Embedder for LetterEmbedder {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| letter_frequencies(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(letter_frequencies(text))
    }
}

/// Chat stub returning a fixed completion
pub struct CannedChat(pub &'static str);

#[async_trait]
impl ChatModel for CannedChat {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Create test services over temporary storage with mock
/// collaborators; `tweak` adjusts the config before wiring.
pub fn create_test_services(tweak: impl FnOnce(&mut Config)) -> (Services, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = Config::default();
    config.storage.vector_dir = temp_dir.path().to_path_buf();
    tweak(&mut config);

    let web = Arc::new(WebSearchClient::new(&config).expect("web search client"));
    let services = Services::with_clients(
        config,
        Arc::new(LetterEmbedder),
        Arc::new(CannedChat("mock answer")),
        web,
    )
    .expect("services");

    (services, temp_dir)
}

/// Create a test router over temporary storage
pub fn create_test_app(tweak: impl FnOnce(&mut Config)) -> (Router, TempDir) {
    let (services, temp_dir) = create_test_services(tweak);
    (docqa::http::router(Arc::new(services)), temp_dir)
}

/// Encode a single-file multipart body
pub fn multipart_body(
    boundary: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
