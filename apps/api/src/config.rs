use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a local-development default; nothing is required.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_url: String,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            allowed_origins: env_or(
                "ALLOWED_ORIGINS",
                "http://localhost:3000,http://localhost:3001",
            )
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect(),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
