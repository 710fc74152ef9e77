mod config;
mod errors;
mod export;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::engine::{ChromiumEngine, EngineConfig};
use crate::export::governor::RenderLimits;
use crate::export::orchestrator::ExportPipeline;
use crate::render::template::TemplateRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume export API v{}", env!("CARGO_PKG_VERSION"));

    // Parse the template asset up front: a broken asset must abort startup,
    // not surface per request.
    let renderer = match &config.template_path {
        Some(path) => TemplateRenderer::from_path(path)?,
        None => TemplateRenderer::from_embedded()?,
    };
    info!("Resume template parsed");

    // Browser processes launch lazily on first export.
    let engine = ChromiumEngine::new(EngineConfig {
        pool_capacity: config.surface_pool_size,
        chrome_path: config.chrome_path.clone(),
        op_timeout: config.render_deadline,
    });
    info!(
        "Render engine initialized (surface pool capacity: {})",
        config.surface_pool_size
    );

    let limits = RenderLimits {
        deadline: config.render_deadline,
        max_pdf_bytes: config.max_pdf_bytes,
    };
    let pipeline = ExportPipeline::new(Arc::new(renderer), Arc::new(engine), limits);

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
