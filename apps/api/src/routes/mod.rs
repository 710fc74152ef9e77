pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::export::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Export API
        .route("/api/v1/export/pdf", post(handlers::handle_export_pdf))
        .route(
            "/api/v1/export/pdf-from-html",
            post(handlers::handle_export_pdf_from_html),
        )
        .route("/api/v1/export/html", post(handlers::handle_export_html))
        .route("/api/v1/export/json", post(handlers::handle_export_json))
        .with_state(state)
}
