use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,
    /// `None` selects the local hashing embedder.
    pub embedding_base_url: Option<String>,
    pub embedding_api_key: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub data_root: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_api_key = require_env("LLM_API_KEY")?;
        let chunk_size: usize = parse_env("CHUNK_SIZE", 1000)?;
        let chunk_overlap: usize = parse_env("CHUNK_OVERLAP", 200)?;
        if chunk_overlap >= chunk_size {
            bail!("CHUNK_OVERLAP ({chunk_overlap}) must be smaller than CHUNK_SIZE ({chunk_size})");
        }

        Ok(Config {
            embedding_api_key: std::env::var("EMBEDDING_API_KEY")
                .unwrap_or_else(|_| llm_api_key.clone()),
            llm_api_key,
            llm_base_url: env_or("LLM_BASE_URL", "https://openrouter.ai/api/v1"),
            llm_model: env_or("LLM_MODEL", "qwen/qwen-2.5-coder-7b-instruct:free"),
            llm_temperature: parse_env("LLM_TEMPERATURE", 0.7)?,
            llm_max_tokens: parse_env("LLM_MAX_TOKENS", 512)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 60)?,
            embedding_base_url: std::env::var("EMBEDDING_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            embedding_model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),
            embedding_dimension: parse_env("EMBEDDING_DIMENSION", 384)?,
            data_root: PathBuf::from(env_or("DATA_ROOT", ".")),
            chunk_size,
            chunk_overlap,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value (got '{raw}')")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Defaults for router tests: local embedder, data under `data_root`.
    pub fn for_tests(data_root: impl Into<PathBuf>) -> Self {
        Config {
            llm_api_key: "test-key".to_string(),
            llm_base_url: "http://localhost:0".to_string(),
            llm_model: "scripted".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 512,
            llm_timeout_secs: 60,
            embedding_base_url: None,
            embedding_api_key: "test-key".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimension: 64,
            data_root: data_root.into(),
            chunk_size: 1000,
            chunk_overlap: 200,
            port: 0,
            rust_log: "info".to_string(),
        }
    }
}
