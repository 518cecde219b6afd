use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Budget handed to the fixed-window limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub capacity: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 30,
            window: Duration::from_secs(60 * 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Empty when `GEMINI_API_KEY` is unset; requests still go out and the
    /// upstream rejection is forwarded to the caller.
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub public_dir: PathBuf,
    pub gemini: GeminiConfig,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = match lookup("GEMINI_API_KEY") {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                warn!("GEMINI_API_KEY is not set; generation requests will be rejected upstream");
                String::new()
            }
        };

        let port = match lookup("PORT").filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let api_base =
            lookup("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());
        let public_dir = lookup("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));

        Ok(Self {
            port,
            public_dir,
            gemini: GeminiConfig {
                api_key,
                model,
                api_base: api_base.trim_end_matches('/').to_string(),
            },
            rate_limit: RateLimitConfig::default(),
        })
    }
}
