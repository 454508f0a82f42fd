use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
/// `HERALD_API_URL` is the backend API base including the `/api` prefix,
/// e.g. `http://localhost:8000/api`. `HERALD_SESSION_FILE` overrides where
/// the session store lives (default `herald_session.json`).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub timeouts: Timeouts,
    pub session_file: PathBuf,
    pub rust_log: String,
}

/// Per-operation call budgets. Scrapes run long on the backend; reads stay short.
#[derive(Debug, Clone)]
pub struct Timeouts {
    pub list: Duration,
    pub scrape: Duration,
    pub scrape_efficient: Duration,
    pub stats: Duration,
    pub mutation: Duration,
    pub auth: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(30),
            scrape: Duration::from_secs(60),
            scrape_efficient: Duration::from_secs(90),
            stats: Duration::from_secs(15),
            mutation: Duration::from_secs(15),
            auth: Duration::from_secs(15),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: normalize_base(&require_env("HERALD_API_URL")?),
            timeouts: Timeouts::default(),
            session_file: std::env::var("HERALD_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("herald_session.json")),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Builds a config pointing at `base_url` with default timeouts.
    /// Used by tests and by embedders that manage configuration themselves.
    pub fn with_base(base_url: impl Into<String>) -> Self {
        Config {
            api_base_url: normalize_base(&base_url.into()),
            timeouts: Timeouts::default(),
            session_file: PathBuf::from("herald_session.json"),
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn normalize_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
