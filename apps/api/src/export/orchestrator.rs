//! Export Orchestrator — the boundary-facing coordinator.
//!
//! Per request the pipeline is strictly sequential: Renderer →
//! Governor(Engine) → artifact. Requests are independent tasks with no
//! ordering between them; the only contention point is the engine's surface
//! pool.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use crate::export::engine::PdfEngine;
use crate::export::error::ExportError;
use crate::export::governor::{governed, RenderLimits};
use crate::export::options::{PageLayoutOptions, ThemeOptions};
use crate::models::resume::ResumeDocument;
use crate::render::template::TemplateRenderer;

/// A successful export: the payload plus the filename surfaced in
/// `Content-Disposition`. Size invariant: `bytes.len()` never exceeds the
/// governor's ceiling.
#[derive(Debug, Clone)]
pub struct RenderArtifact {
    pub bytes: Bytes,
    pub filename: String,
}

pub struct ExportPipeline {
    renderer: Arc<TemplateRenderer>,
    engine: Arc<dyn PdfEngine>,
    limits: RenderLimits,
}

impl ExportPipeline {
    pub fn new(
        renderer: Arc<TemplateRenderer>,
        engine: Arc<dyn PdfEngine>,
        limits: RenderLimits,
    ) -> Self {
        Self {
            renderer,
            engine,
            limits,
        }
    }

    /// Renders a resume to PDF. The filename falls back to a slug of the
    /// resume title when no hint is given.
    pub async fn export_resume(
        &self,
        resume: &ResumeDocument,
        theme: &ThemeOptions,
        filename_hint: Option<&str>,
    ) -> Result<RenderArtifact, ExportError> {
        let html = self.renderer.render(resume, theme)?;
        let layout = theme.layout_options();
        let bytes = governed(self.engine.convert_to_pdf(&html, &layout), &self.limits).await?;

        let filename = match filename_hint {
            Some(hint) => ensure_pdf_extension(hint),
            None => format!("{}.pdf", filename_stem(&resume.title)),
        };
        info!(
            "exported resume '{}' as {} ({} bytes)",
            resume.title,
            filename,
            bytes.len()
        );
        Ok(RenderArtifact {
            bytes: Bytes::from(bytes),
            filename,
        })
    }

    /// Converts caller-supplied HTML directly, bypassing the template
    /// renderer.
    pub async fn export_raw_html(
        &self,
        html: &str,
        layout: &PageLayoutOptions,
        filename: &str,
    ) -> Result<RenderArtifact, ExportError> {
        let html = self.renderer.render_raw(html)?;
        let bytes = governed(self.engine.convert_to_pdf(&html, layout), &self.limits).await?;
        Ok(RenderArtifact {
            bytes: Bytes::from(bytes),
            filename: ensure_pdf_extension(filename),
        })
    }

    /// Rendered-HTML passthrough export. No governor: there is no engine
    /// call to bound.
    pub fn export_html(
        &self,
        resume: &ResumeDocument,
        theme: &ThemeOptions,
    ) -> Result<RenderArtifact, ExportError> {
        let html = self.renderer.render(resume, theme)?;
        let filename = format!("{}.html", filename_stem(&resume.title));
        Ok(RenderArtifact {
            bytes: Bytes::from(html.into_bytes()),
            filename,
        })
    }

    /// JSON passthrough export of the resume record itself.
    pub fn export_json(&self, resume: &ResumeDocument) -> Result<RenderArtifact, ExportError> {
        let json = serde_json::to_vec_pretty(resume)
            .map_err(|e| ExportError::Engine(format!("resume serialization failed: {e}")))?;
        let filename = format!("{}.json", filename_stem(&resume.title));
        Ok(RenderArtifact {
            bytes: Bytes::from(json),
            filename,
        })
    }
}

/// Slug of a resume title: lower-cased, whitespace becomes `_`, anything
/// outside `[a-z0-9_-]` is dropped. Falls back to "resume".
fn filename_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if stem.is_empty() {
        "resume".to_string()
    } else {
        stem
    }
}

fn ensure_pdf_extension(filename: &str) -> String {
    let trimmed = filename.trim();
    if trimmed.is_empty() {
        return "resume.pdf".to_string();
    }
    if trimmed.to_lowercase().ends_with(".pdf") {
        trimmed.to_string()
    } else {
        format!("{trimmed}.pdf")
    }
}
