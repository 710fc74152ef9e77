//! Template Renderer — ResumeDocument + theme → a self-contained HTML page.
//!
//! The template asset is parsed exactly once at startup; a malformed or
//! missing asset aborts the process before it serves a single request, and
//! the parsed form is immutable afterwards (restart to pick up changes).
//! Rendering itself is pure: identical input yields byte-identical HTML.
//!
//! Scalar placeholders are HTML-escaped by Tera. The "Present" fallback for
//! open-ended date ranges and the elided-location policy live in the view
//! structs below, not in the template, so they are unit-testable without a
//! browser.

use anyhow::Context as _;
use serde::Serialize;
use tera::{Context, Tera};

use crate::export::error::ExportError;
use crate::export::options::ThemeOptions;
use crate::models::resume::{ExperienceEntry, ResumeDocument, SkillGroup};

/// Embedded default asset; `RESUME_TEMPLATE_PATH` overrides it at startup.
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/resume.html");
const TEMPLATE_NAME: &str = "resume.html";

pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Parses the embedded template asset.
    pub fn from_embedded() -> anyhow::Result<Self> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Parses a template asset read from `path`.
    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template asset '{path}'"))?;
        Self::from_source(&source)
    }

    fn from_source(source: &str) -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        // The ".html" name keeps Tera's HTML auto-escaping on.
        tera.add_raw_template(TEMPLATE_NAME, source)
            .context("resume template asset failed to parse")?;
        Ok(Self { tera })
    }

    /// Renders a resume into a complete HTML document.
    ///
    /// Sections whose backing data is empty are elided entirely — no empty
    /// section heading ever appears in the output.
    pub fn render(
        &self,
        resume: &ResumeDocument,
        theme: &ThemeOptions,
    ) -> Result<String, ExportError> {
        let title = resume.title.trim();
        if title.is_empty() {
            return Err(ExportError::InvalidInput(
                "Resume title is required".to_string(),
            ));
        }

        let experience: Vec<ExperienceView<'_>> = resume
            .experience_entries
            .iter()
            .map(ExperienceView::from)
            .collect();
        let skill_groups: Vec<SkillGroupView<'_>> = resume
            .skill_groups
            .iter()
            .filter(|group| !group.skills.is_empty())
            .map(SkillGroupView::from)
            .collect();

        let mut context = Context::new();
        context.insert("title", title);
        context.insert(
            "summary",
            &resume
                .summary
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        );
        context.insert("experience", &experience);
        context.insert("skill_groups", &skill_groups);
        context.insert("page_size", theme.page_size().css_name());

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| ExportError::Engine(format!("template rendering failed: {e}")))
    }

    /// Pass-through entry point for caller-supplied HTML: only validates
    /// that there is something to render.
    pub fn render_raw(&self, html: &str) -> Result<String, ExportError> {
        if html.trim().is_empty() {
            return Err(ExportError::InvalidInput(
                "HTML content is required".to_string(),
            ));
        }
        Ok(html.to_string())
    }
}

/// Display form of one experience entry. An open-ended range renders its end
/// as "Present"; a missing location omits the line entirely.
#[derive(Serialize)]
struct ExperienceView<'a> {
    role: &'a str,
    organization: &'a str,
    location: Option<&'a str>,
    dates: String,
    achievements: &'a [String],
}

impl<'a> From<&'a ExperienceEntry> for ExperienceView<'a> {
    fn from(entry: &'a ExperienceEntry) -> Self {
        let end = entry
            .end_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Present");
        Self {
            role: &entry.role,
            organization: &entry.organization,
            location: entry
                .location
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty()),
            dates: format!("{} - {}", entry.start_date.trim(), end),
            achievements: &entry.achievements,
        }
    }
}

#[derive(Serialize)]
struct SkillGroupView<'a> {
    name: &'a str,
    skills: &'a [String],
}

impl<'a> From<&'a SkillGroup> for SkillGroupView<'a> {
    fn from(group: &'a SkillGroup) -> Self {
        Self {
            name: &group.group_name,
            skills: &group.skills,
        }
    }
}
