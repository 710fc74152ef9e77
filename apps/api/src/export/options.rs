//! Page layout and theme options.
//!
//! Callers submit a free-form `theme_options` map; recognized keys override
//! the documented defaults and everything else is ignored, never an error.
//! The resolved `PageLayoutOptions` is what the render engine consumes.

use headless_chrome::types::PrintToPdfOptions;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Paper size of the generated PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    /// Paper dimensions in inches (width, height), as the CDP print call expects.
    pub fn dimensions_in(self) -> (f64, f64) {
        match self {
            PageSize::A4 => (8.27, 11.69),
            PageSize::Letter => (8.5, 11.0),
        }
    }

    /// The `@page size` CSS keyword for this paper size.
    pub fn css_name(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "letter",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "a4" => Some(PageSize::A4),
            "letter" => Some(PageSize::Letter),
            _ => None,
        }
    }
}

/// Margin presets, resolved to inches (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginPreset {
    Default,
    Narrow,
    Wide,
}

impl MarginPreset {
    pub fn inches(self) -> (f64, f64, f64, f64) {
        match self {
            MarginPreset::Default => (0.75, 0.5, 0.75, 0.5),
            MarginPreset::Narrow => (0.4, 0.3, 0.4, 0.3),
            MarginPreset::Wide => (1.0, 0.75, 1.0, 0.75),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "default" => Some(MarginPreset::Default),
            "narrow" => Some(MarginPreset::Narrow),
            "wide" => Some(MarginPreset::Wide),
            _ => None,
        }
    }
}

/// Footer printed on every page: a centered "Page N of M". The header stays
/// empty unless the theme overrides it.
pub const DEFAULT_FOOTER_TEMPLATE: &str = "<div style=\"font-size: 10px; text-align: center; \
     width: 100%; color: #666;\">Page <span class=\"pageNumber\"></span> of \
     <span class=\"totalPages\"></span></div>";

/// Resolved page layout handed to the render engine.
#[derive(Debug, Clone)]
pub struct PageLayoutOptions {
    pub page_size: PageSize,
    pub margins: MarginPreset,
    pub print_background: bool,
    pub display_header_footer: bool,
    pub header_template: String,
    pub footer_template: String,
    pub prefer_css_page_size: bool,
}

impl Default for PageLayoutOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margins: MarginPreset::Default,
            print_background: true,
            display_header_footer: true,
            header_template: String::new(),
            footer_template: DEFAULT_FOOTER_TEMPLATE.to_string(),
            prefer_css_page_size: true,
        }
    }
}

impl PageLayoutOptions {
    /// Maps onto the CDP `Page.printToPdf` options.
    pub fn to_print_options(&self) -> PrintToPdfOptions {
        let (width, height) = self.page_size.dimensions_in();
        let (top, right, bottom, left) = self.margins.inches();
        PrintToPdfOptions {
            print_background: Some(self.print_background),
            paper_width: Some(width),
            paper_height: Some(height),
            margin_top: Some(top),
            margin_right: Some(right),
            margin_bottom: Some(bottom),
            margin_left: Some(left),
            display_header_footer: Some(self.display_header_footer),
            header_template: Some(self.header_template.clone()),
            footer_template: Some(self.footer_template.clone()),
            prefer_css_page_size: Some(self.prefer_css_page_size),
            ..Default::default()
        }
    }
}

/// Theme options as submitted by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ThemeOptions(pub serde_json::Map<String, Value>);

impl ThemeOptions {
    /// Resolves the theme map onto concrete layout options, starting from
    /// the defaults. Keys with the wrong value type fall back to the default
    /// the same way unrecognized keys do.
    pub fn layout_options(&self) -> PageLayoutOptions {
        let mut layout = PageLayoutOptions::default();
        for (key, value) in &self.0 {
            match key.as_str() {
                "page_size" => {
                    if let Some(size) = value.as_str().and_then(PageSize::parse) {
                        layout.page_size = size;
                    }
                }
                "margins" => {
                    if let Some(preset) = value.as_str().and_then(MarginPreset::parse) {
                        layout.margins = preset;
                    }
                }
                "header_template" => {
                    if let Some(template) = value.as_str() {
                        layout.header_template = template.to_string();
                    }
                }
                "footer_template" => {
                    if let Some(template) = value.as_str() {
                        layout.footer_template = template.to_string();
                    }
                }
                "print_background" => {
                    if let Some(enabled) = value.as_bool() {
                        layout.print_background = enabled;
                    }
                }
                other => debug!("ignoring unrecognized theme option '{other}'"),
            }
        }
        layout
    }

    /// The paper size the template's `@page` rule should declare.
    pub fn page_size(&self) -> PageSize {
        self.0
            .get("page_size")
            .and_then(Value::as_str)
            .and_then(PageSize::parse)
            .unwrap_or(PageSize::A4)
    }
}
