//! HTTP handlers for the export endpoints.
//!
//! Thin glue: deserialize the request, call the pipeline, shape the download
//! response. All failure classification happens below this layer.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::options::ThemeOptions;
use crate::export::orchestrator::RenderArtifact;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

/// Body of POST /api/v1/export/pdf-from-html.
#[derive(Debug, Deserialize)]
pub struct RawHtmlExportRequest {
    #[serde(default)]
    pub html_content: String,
    #[serde(default)]
    pub theme_options: ThemeOptions,
    #[serde(default)]
    pub filename: Option<String>,
}

/// POST /api/v1/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(resume): Json<ResumeDocument>,
) -> Result<Response, AppError> {
    let artifact = state
        .pipeline
        .export_resume(&resume, &ThemeOptions::default(), None)
        .await?;
    Ok(attachment_response(artifact, "application/pdf"))
}

/// POST /api/v1/export/pdf-from-html
pub async fn handle_export_pdf_from_html(
    State(state): State<AppState>,
    Json(req): Json<RawHtmlExportRequest>,
) -> Result<Response, AppError> {
    let layout = req.theme_options.layout_options();
    let filename = req.filename.as_deref().unwrap_or("resume.pdf");
    let artifact = state
        .pipeline
        .export_raw_html(&req.html_content, &layout, filename)
        .await?;
    Ok(attachment_response(artifact, "application/pdf"))
}

/// POST /api/v1/export/html
pub async fn handle_export_html(
    State(state): State<AppState>,
    Json(resume): Json<ResumeDocument>,
) -> Result<Response, AppError> {
    let artifact = state.pipeline.export_html(&resume, &ThemeOptions::default())?;
    Ok(attachment_response(artifact, "text/html; charset=utf-8"))
}

/// POST /api/v1/export/json
pub async fn handle_export_json(
    State(state): State<AppState>,
    Json(resume): Json<ResumeDocument>,
) -> Result<Response, AppError> {
    let artifact = state.pipeline.export_json(&resume)?;
    Ok(attachment_response(artifact, "application/json"))
}

/// Download response: typed body, attachment disposition, explicit length.
fn attachment_response(artifact: RenderArtifact, content_type: &str) -> Response {
    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        ),
        (header::CONTENT_LENGTH, artifact.bytes.len().to_string()),
    ];
    (headers, artifact.bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::export::engine::{EngineError, PdfEngine};
    use crate::export::governor::RenderLimits;
    use crate::export::options::PageLayoutOptions;
    use crate::export::orchestrator::ExportPipeline;
    use crate::render::template::TemplateRenderer;
    use crate::routes::build_router;

    struct FixedEngine {
        bytes: Vec<u8>,
    }

    #[async_trait]
    impl PdfEngine for FixedEngine {
        async fn convert_to_pdf(
            &self,
            _html: &str,
            _layout: &PageLayoutOptions,
        ) -> Result<Vec<u8>, EngineError> {
            Ok(self.bytes.clone())
        }
    }

    fn test_state(engine: Arc<dyn PdfEngine>, limits: RenderLimits) -> AppState {
        AppState {
            pipeline: Arc::new(ExportPipeline::new(
                Arc::new(TemplateRenderer::from_embedded().expect("embedded template parses")),
                engine,
                limits,
            )),
        }
    }

    fn pdf_state() -> AppState {
        test_state(
            Arc::new(FixedEngine {
                bytes: b"%PDF-1.7 test".to_vec(),
            }),
            RenderLimits::default(),
        )
    }

    fn resume_json() -> Value {
        serde_json::json!({
            "title": "Senior Software Engineer",
            "summary": "Backend engineer.",
            "experienceEntries": [{
                "role": "Engineer",
                "organization": "TechCorp Inc.",
                "startDate": "2022-01",
                "endDate": null,
                "achievements": ["Shipped the export pipeline"]
            }],
            "skillGroups": [{"groupName": "Languages", "skills": ["Rust"]}]
        })
    }

    async fn post(state: AppState, uri: &str, body: Value) -> axum::response::Response {
        build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_export_pdf_sets_download_headers() {
        let response = post(pdf_state(), "/api/v1/export/pdf", resume_json()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/pdf"
        );
        let disposition = response.headers()["content-disposition"].to_str().unwrap();
        assert!(disposition.contains("attachment"));
        assert!(disposition.contains("senior_software_engineer.pdf"));
        assert_eq!(response.headers()["content-length"].to_str().unwrap(), "13");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.7 test");
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected_with_400() {
        let mut body = resume_json();
        body["title"] = Value::String("   ".to_string());
        let response = post(pdf_state(), "/api/v1/export/pdf", body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_empty_html_content_returns_400() {
        let response = post(
            pdf_state(),
            "/api/v1/export/pdf-from-html",
            serde_json::json!({"html_content": ""}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["error"], "INVALID_INPUT");
        assert_eq!(error["message"], "HTML content is required");
    }

    #[tokio::test]
    async fn test_pdf_from_html_uses_requested_filename() {
        let response = post(
            pdf_state(),
            "/api/v1/export/pdf-from-html",
            serde_json::json!({
                "html_content": "<html><body>Test Resume</body></html>",
                "filename": "test_resume.pdf",
                "theme_options": {"page_size": "letter"}
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()["content-disposition"].to_str().unwrap();
        assert!(disposition.contains("test_resume.pdf"));
    }

    #[tokio::test]
    async fn test_oversized_pdf_maps_to_413_with_measured_sizes() {
        let state = test_state(
            Arc::new(FixedEngine {
                bytes: vec![0u8; 2 * 1024 * 1024],
            }),
            RenderLimits {
                deadline: Duration::from_secs(30),
                max_pdf_bytes: 1_572_864,
            },
        );
        let response = post(state, "/api/v1/export/pdf", resume_json()).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let error = body_json(response).await;
        assert_eq!(error["error"], "PDF_TOO_LARGE");
        assert!(error["suggestion"].as_str().unwrap().contains("reducing content"));
        assert_eq!(error["actual_size_mb"], 2.0);
        assert_eq!(error["max_size_mb"], 1.5);
    }

    #[tokio::test]
    async fn test_engine_failure_maps_to_500() {
        struct FailingEngine;

        #[async_trait]
        impl PdfEngine for FailingEngine {
            async fn convert_to_pdf(
                &self,
                _html: &str,
                _layout: &PageLayoutOptions,
            ) -> Result<Vec<u8>, EngineError> {
                Err(EngineError::Launch("chrome binary not found".to_string()))
            }
        }

        let state = test_state(Arc::new(FailingEngine), RenderLimits::default());
        let response = post(state, "/api/v1/export/pdf", resume_json()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error = body_json(response).await;
        assert_eq!(error["error"], "ENGINE_FAILURE");
    }

    #[tokio::test]
    async fn test_html_and_json_exports_set_content_types() {
        let response = post(pdf_state(), "/api/v1/export/html", resume_json()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "text/html; charset=utf-8"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8(bytes.to_vec()).unwrap().contains("TechCorp Inc."));

        let response = post(pdf_state(), "/api/v1/export/json", resume_json()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = build_router(pdf_state())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }
}
