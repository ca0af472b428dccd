use anyhow::{Context, Result};
use reqwest::Url;

pub const BACKEND_URL_VAR: &str = "BACKEND_URL";

/// Process-wide settings, resolved once at startup and handed to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    backend_url: String,
}

impl Config {
    pub fn new(backend_url: &str) -> Result<Self> {
        let trimmed = backend_url.trim().trim_end_matches('/');
        Url::parse(trimmed).with_context(|| format!("Invalid backend url {:?}", backend_url))?;
        Ok(Self {
            backend_url: trimmed.to_string(),
        })
    }

    /// Reads `BACKEND_URL`, honoring a `.env` file if one is present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let backend_url =
            std::env::var(BACKEND_URL_VAR).context("BACKEND_URL must be set")?;
        Self::new(&backend_url)
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }
}
