use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything is optional: without a Groq key the parsing endpoints report
/// themselves unavailable and the rest of the API still works.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub skills_path: PathBuf,
    /// Force a similarity backend ("semantic" or "lexical") instead of
    /// probing for model availability.
    pub similarity_backend: Option<String>,
    pub embedding_cache_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: optional_env("GROQ_API_KEY"),
            skills_path: optional_env("SKILLS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets/skills.json")),
            similarity_backend: optional_env("SIMILARITY_BACKEND"),
            embedding_cache_dir: optional_env("EMBEDDING_CACHE_DIR").map(PathBuf::from),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and empty both read as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
