use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::error::{mib, ExportError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Export(err) => export_response(err),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                let body = Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An internal server error occurred"
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

/// Maps the export taxonomy onto the wire contract: a status code plus a
/// flat `{error, message, suggestion?}` body, with measured values where the
/// kind carries them.
fn export_response(err: ExportError) -> Response {
    let status = match &err {
        ExportError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ExportError::Engine(msg) => {
            tracing::error!("Render engine error: {msg}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ExportError::Timeout { elapsed, .. } => {
            tracing::warn!("PDF render timed out after {elapsed:?}");
            StatusCode::REQUEST_TIMEOUT
        }
        ExportError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
    };

    let mut body = json!({
        "error": err.kind(),
        "message": err.to_string(),
    });
    if let Some(suggestion) = err.suggestion() {
        body["suggestion"] = json!(suggestion);
    }
    if let ExportError::TooLarge {
        actual_bytes,
        max_bytes,
    } = &err
    {
        body["actual_size_mb"] = json!(mib(actual_bytes));
        body["max_size_mb"] = json!(mib(max_bytes));
    }

    (status, Json(body)).into_response()
}
