//! XDG Base Directory Support
//!
//! Implements XDG Base Directory specification for proper file
//! organization on Linux/Unix systems.

use std::env;
use std::fs;
use std::path::PathBuf;

/// XDG directory structure for docqa
///
/// Resolution priority (highest to lowest):
/// 1. Explicit DOCQA_* env vars
/// 2. XDG_* environment variables
/// 3. XDG defaults (~/.config, ~/.local/share, etc.)
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl XdgDirs {
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve("DOCQA_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: Self::resolve("DOCQA_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
            state_dir: Self::resolve("DOCQA_STATE_DIR", "XDG_STATE_HOME", &[".local", "state"]),
            cache_dir: Self::resolve("DOCQA_CACHE_DIR", "XDG_CACHE_HOME", &[".cache"]),
        }
    }

    fn resolve(app_var: &str, xdg_var: &str, default_segments: &[&str]) -> PathBuf {
        if let Ok(dir) = env::var(app_var) {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var(xdg_var) {
            return PathBuf::from(xdg).join("docqa");
        }

        let mut dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        for segment in default_segments {
            dir = dir.join(segment);
        }
        dir.join("docqa")
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        // DOCQA_CONFIG_FILE is an explicit override
        if let Ok(file) = env::var("DOCQA_CONFIG_FILE") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Get vector storage directory path
    pub fn vectors_dir(&self) -> PathBuf {
        self.data_dir.join("vectors")
    }

    /// Get logs directory path
    pub fn logs_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }

    /// Create all XDG directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(self.vectors_dir())?;
        fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// Log the resolved XDG paths
    pub fn log_paths(&self) {
        tracing::info!("XDG directories resolved:");
        tracing::info!("  Config: {:?}", self.config_dir);
        tracing::info!("  Data: {:?}", self.data_dir);
        tracing::info!("  State: {:?}", self.state_dir);
        tracing::info!("  Cache: {:?}", self.cache_dir);
        tracing::info!("  Config file: {:?}", self.config_file());
        tracing::info!("  Vectors: {:?}", self.vectors_dir());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
