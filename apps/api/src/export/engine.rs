//! Render Engine Adapter — drives a headless Chromium over CDP.
//!
//! `PdfEngine` is a capability interface: the Governor and Orchestrator never
//! touch the concrete browser binding, tests substitute mocks, and the
//! automation library can be swapped without touching either of them.
//!
//! Surface lifecycle per request: lease a pooled browser process (launching
//! one lazily if the slot is empty), open a fresh tab, load the document,
//! print, close the tab. The lease rides inside the blocking task, so the
//! surface is returned to the pool even when the caller's future is dropped
//! at the governor's deadline.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use headless_chrome::browser::tab::Tab;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::export::options::PageLayoutOptions;
use crate::export::pool::{PoolClosed, SurfaceLease, SurfacePool};

/// Failures raised by the engine adapter. All of them classify as
/// `ENGINE_FAILURE` at the export boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("failed to load content: {0}")]
    Load(String),

    #[error("failed to print PDF: {0}")]
    Print(String),

    #[error(transparent)]
    Pool(#[from] PoolClosed),
}

/// Capability interface over the out-of-process rendering engine.
#[async_trait]
pub trait PdfEngine: Send + Sync {
    /// Converts a self-contained HTML document into PDF bytes.
    async fn convert_to_pdf(
        &self,
        html: &str,
        layout: &PageLayoutOptions,
    ) -> Result<Vec<u8>, EngineError>;
}

/// Tuning for the Chromium adapter.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Max concurrently leased browser processes.
    pub pool_capacity: usize,
    /// Explicit Chromium binary; `None` auto-detects.
    pub chrome_path: Option<PathBuf>,
    /// Upper bound on each CDP call, so a wedged tab cannot hold its lease
    /// forever after the governor abandons the request.
    pub op_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 2,
            chrome_path: None,
            op_timeout: Duration::from_secs(30),
        }
    }
}

/// Viewport fixed for reproducible layout across environments.
const WINDOW_SIZE: (u32, u32) = (1200, 800);
/// Pooled processes must survive gaps between requests; the crate default
/// (30s) would reap them mid-pool.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(3600);

/// The CDP implementation of `PdfEngine`, over the `headless_chrome` crate.
pub struct ChromiumEngine {
    pool: SurfacePool<Browser>,
    config: EngineConfig,
}

impl ChromiumEngine {
    /// Browsers launch lazily on first use, so constructing the engine does
    /// not require a Chromium install.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            pool: SurfacePool::new(config.pool_capacity),
            config,
        }
    }

    pub fn pool(&self) -> &SurfacePool<Browser> {
        &self.pool
    }
}

#[async_trait]
impl PdfEngine for ChromiumEngine {
    async fn convert_to_pdf(
        &self,
        html: &str,
        layout: &PageLayoutOptions,
    ) -> Result<Vec<u8>, EngineError> {
        let mut lease = self.pool.acquire().await?;
        let html = html.to_owned();
        let print_options = layout.to_print_options();
        let config = self.config.clone();

        // The CDP client is blocking; the whole surface interaction runs on
        // the blocking pool, with the lease inside it.
        let worker = tokio::task::spawn_blocking(move || {
            let result = print_on_lease(&mut lease, &config, &html, print_options);
            if result.is_err() {
                // Engine-level failure: discard the browser rather than
                // parking a surface in an unknown state.
                lease.poison();
            }
            result
        });

        worker
            .await
            .map_err(|e| EngineError::Print(format!("render worker panicked: {e}")))?
    }
}

fn print_on_lease(
    lease: &mut SurfaceLease<Browser>,
    config: &EngineConfig,
    html: &str,
    options: PrintToPdfOptions,
) -> Result<Vec<u8>, EngineError> {
    let browser = match lease.surface() {
        Some(browser) => browser.clone(),
        None => {
            let browser = launch_browser(config)?;
            lease.attach(browser.clone());
            browser
        }
    };

    let tab = browser
        .new_tab()
        .map_err(|e| EngineError::Launch(format!("failed to open tab: {e}")))?;
    tab.set_default_timeout(config.op_timeout);

    let result = print_on_tab(&tab, html, options);

    // One fresh tab per document, torn down on every exit path so no state
    // leaks between unrelated documents. A close failure is logged, never
    // surfaced to the caller.
    if let Err(e) = tab.close(true) {
        warn!("failed to close rendering tab: {e}");
    }

    result
}

fn print_on_tab(tab: &Tab, html: &str, options: PrintToPdfOptions) -> Result<Vec<u8>, EngineError> {
    // Inline the document as a data: URL — the page has nothing to fetch, so
    // fonts and styles must be template-local.
    let url = format!("data:text/html;base64,{}", BASE64.encode(html.as_bytes()));

    tab.navigate_to(&url)
        .map_err(|e| EngineError::Load(format!("navigation failed: {e}")))?;
    // Quiescence signal: layout and local resources have settled.
    tab.wait_until_navigated()
        .map_err(|e| EngineError::Load(format!("wait for load failed: {e}")))?;

    let bytes = tab
        .print_to_pdf(Some(options))
        .map_err(|e| EngineError::Print(e.to_string()))?;
    debug!("printed {} bytes of PDF", bytes.len());
    Ok(bytes)
}

fn launch_browser(config: &EngineConfig) -> Result<Browser, EngineError> {
    let mut builder = LaunchOptions::default_builder();
    builder
        .headless(true)
        .sandbox(false)
        .window_size(Some(WINDOW_SIZE))
        .idle_browser_timeout(IDLE_BROWSER_TIMEOUT);
    if let Some(path) = &config.chrome_path {
        builder.path(Some(path.clone()));
    }
    let options = builder
        .build()
        .map_err(|e| EngineError::Launch(format!("failed to build launch options: {e}")))?;

    let browser = Browser::new(options).map_err(|e| EngineError::Launch(e.to_string()))?;
    info!("launched headless browser");
    Ok(browser)
}
