use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::export::governor::{DEFAULT_DEADLINE, DEFAULT_MAX_PDF_BYTES};

/// Application configuration loaded from environment variables.
/// Every knob has a default, so the service starts with no environment at all;
/// a present-but-unparsable value aborts startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Max concurrently leased rendering surfaces (browser processes).
    pub surface_pool_size: usize,
    /// Wall-clock budget for one PDF conversion.
    pub render_deadline: Duration,
    /// Output-size ceiling for one PDF.
    pub max_pdf_bytes: usize,
    /// Explicit Chromium binary path; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
    /// Template asset override; the embedded template is used when unset.
    pub template_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parsed_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            surface_pool_size: parsed_env("SURFACE_POOL_SIZE", 2)?,
            render_deadline: Duration::from_secs(parsed_env(
                "RENDER_DEADLINE_SECS",
                DEFAULT_DEADLINE.as_secs(),
            )?),
            max_pdf_bytes: parsed_env("MAX_PDF_BYTES", DEFAULT_MAX_PDF_BYTES)?,
            chrome_path: std::env::var("CHROME_PATH").ok().map(PathBuf::from),
            template_path: std::env::var("RESUME_TEMPLATE_PATH").ok(),
        })
    }
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
