//! Configuration management for the docqa service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{DocQaError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub websearch: WebSearchConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowlist; empty means permissive (development mode)
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the per-document index and metadata artifacts
    #[serde(default = "default_vector_dir")]
    pub vector_dir: PathBuf,
}

/// Chunking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Tokens per chunk window
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Path to a HuggingFace tokenizer.json; when unset, the
    /// word-level tokenizer is used
    #[serde(default)]
    pub tokenizer_file: Option<PathBuf>,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of chunks to retrieve per question
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum chunks per question
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Maximum question length in characters
    #[serde(default = "default_max_question_length")]
    pub max_question_length: usize,
}

/// Limits configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Maximum upload body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Upload rate limit: requests per window
    #[serde(default = "default_upload_max_requests")]
    pub upload_max_requests: usize,

    /// Upload rate limit window in seconds
    #[serde(default = "default_upload_window_secs")]
    pub upload_window_secs: u64,

    /// Ask rate limit: requests per window
    #[serde(default = "default_ask_max_requests")]
    pub ask_max_requests: usize,

    /// Ask rate limit window in seconds
    #[serde(default = "default_ask_window_secs")]
    pub ask_window_secs: u64,

    /// Timeout for upstream embedding/chat calls in seconds
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

/// OpenAI collaborator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    /// API key; normally supplied via OPENAI_API_KEY
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

/// Web search collaborator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebSearchConfig {
    /// Tavily API key; empty disables web search entirely
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_websearch_base_url")]
    pub base_url: String,

    #[serde(default = "default_websearch_max_results")]
    pub max_results: usize,

    #[serde(default = "default_websearch_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_vector_dir() -> PathBuf {
    PathBuf::from("./data/vectors")
}

fn default_max_tokens() -> usize {
    500
}

fn default_k() -> usize {
    3
}

fn default_max_k() -> usize {
    20
}

fn default_max_question_length() -> usize {
    2000
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_upload_max_requests() -> usize {
    5
}

fn default_upload_window_secs() -> u64 {
    3600
}

fn default_ask_max_requests() -> usize {
    20
}

fn default_ask_window_secs() -> u64 {
    60
}

fn default_upstream_timeout_secs() -> u64 {
    60
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_websearch_base_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_websearch_max_results() -> usize {
    5
}

fn default_websearch_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            vector_dir: default_vector_dir(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            tokenizer_file: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            max_question_length: default_max_question_length(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            upload_max_requests: default_upload_max_requests(),
            upload_window_secs: default_upload_window_secs(),
            ask_max_requests: default_ask_max_requests(),
            ask_window_secs: default_ask_window_secs(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            base_url: default_openai_base_url(),
        }
    }
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_websearch_base_url(),
            max_results: default_websearch_max_results(),
            timeout_secs: default_websearch_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DocQaError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// This method uses XDG Base Directory specification for file
    /// locations.
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with(None, &xdg)
    }

    /// Load config with an explicit file override and XDG directories
    ///
    /// Priority order for the file:
    /// 1. The `path` argument (e.g. from --config)
    /// 2. DOCQA_CONFIG env var
    /// 3. XDG config file (~/.config/docqa/config.toml)
    /// 4. Defaults
    pub fn load_with(path: Option<&Path>, xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Ok(config_path) = env::var("DOCQA_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else {
                Self::default()
            }
        };

        // Point storage at the XDG data directory unless explicitly set
        if env::var("DOCQA_VECTOR_DIR").is_err() && config.storage.vector_dir == default_vector_dir()
        {
            config.storage.vector_dir = xdg.vectors_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(host) = env::var("DOCQA_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("DOCQA_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(origins) = env::var("DOCQA_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Ok(dir) = env::var("DOCQA_VECTOR_DIR") {
            self.storage.vector_dir = PathBuf::from(dir);
        }

        if let Ok(max_tokens) = env::var("DOCQA_MAX_TOKENS") {
            if let Ok(n) = max_tokens.parse() {
                self.chunking.max_tokens = n;
            }
        }
        if let Ok(file) = env::var("DOCQA_TOKENIZER_FILE") {
            self.chunking.tokenizer_file = Some(PathBuf::from(file));
        }

        if let Ok(default_k) = env::var("DOCQA_DEFAULT_K") {
            if let Ok(k) = default_k.parse() {
                self.search.default_k = k;
            }
        }
        if let Ok(max_k) = env::var("DOCQA_MAX_K") {
            if let Ok(k) = max_k.parse() {
                self.search.max_k = k;
            }
        }

        // Collaborator credentials use the conventional variable names
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            self.openai.api_key = key;
        }
        if let Ok(model) = env::var("OPENAI_CHAT_MODEL") {
            self.openai.chat_model = model;
        }
        if let Ok(model) = env::var("OPENAI_EMBEDDING_MODEL") {
            self.openai.embedding_model = model;
        }
        if let Ok(url) = env::var("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Ok(key) = env::var("TAVILY_API_KEY") {
            self.websearch.api_key = key;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_tokens == 0 {
            return Err(DocQaError::ConfigError(
                "max_tokens must be non-zero".to_string(),
            ));
        }

        if self.search.default_k == 0 {
            return Err(DocQaError::ConfigError(
                "Default k must be non-zero".to_string(),
            ));
        }

        if self.search.default_k > self.search.max_k {
            return Err(DocQaError::ConfigError(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if self.search.max_question_length == 0 {
            return Err(DocQaError::ConfigError(
                "Max question length must be non-zero".to_string(),
            ));
        }

        if self.limits.max_upload_bytes == 0 {
            return Err(DocQaError::ConfigError(
                "Max upload size must be non-zero".to_string(),
            ));
        }

        if self.limits.upload_max_requests == 0
            || self.limits.upload_window_secs == 0
            || self.limits.ask_max_requests == 0
            || self.limits.ask_window_secs == 0
        {
            return Err(DocQaError::ConfigError(
                "Rate limit windows and counts must be non-zero".to_string(),
            ));
        }

        if self.limits.upstream_timeout_secs == 0 {
            return Err(DocQaError::ConfigError(
                "Upstream timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Host: {}:{}", self.server.host, self.server.port);
        tracing::info!("  Vector dir: {:?}", self.storage.vector_dir);
        tracing::info!("  Max tokens per chunk: {}", self.chunking.max_tokens);
        tracing::info!(
            "  Tokenizer: {}",
            self.chunking
                .tokenizer_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "word-level (built-in)".to_string())
        );
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!("  Max k: {}", self.search.max_k);
        tracing::info!(
            "  Max upload: {} MB",
            self.limits.max_upload_bytes / (1024 * 1024)
        );
        tracing::info!(
            "  Upload limit: {}/{}s",
            self.limits.upload_max_requests,
            self.limits.upload_window_secs
        );
        tracing::info!(
            "  Ask limit: {}/{}s",
            self.limits.ask_max_requests,
            self.limits.ask_window_secs
        );
        tracing::info!("  Chat model: {}", self.openai.chat_model);
        tracing::info!("  Embedding model: {}", self.openai.embedding_model);
        tracing::info!(
            "  OpenAI key configured: {}",
            !self.openai.api_key.is_empty()
        );
        tracing::info!(
            "  Web search enabled: {}",
            !self.websearch.api_key.is_empty()
        );
    }
}
