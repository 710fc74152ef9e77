//! Export error taxonomy.
//!
//! Every failure inside the pipeline is classified into exactly one of four
//! kinds before it reaches the HTTP boundary; `errors.rs` maps them onto
//! status codes and the `{error, message, suggestion?}` JSON body. No raw
//! engine diagnostic crosses the boundary unclassified.

use std::time::Duration;

use thiserror::Error;

/// The four failure kinds a render attempt can end in.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Malformed or empty request data. Not retried; 400.
    #[error("{0}")]
    InvalidInput(String),

    /// Render-engine launch/load/convert failure, diagnostic preserved. 500.
    #[error("Failed to generate PDF: {0}")]
    Engine(String),

    /// The wall-clock deadline expired before the engine produced bytes. 408.
    #[error("PDF generation timed out after {} seconds", .deadline.as_secs())]
    Timeout { deadline: Duration, elapsed: Duration },

    /// The engine produced more bytes than the configured ceiling. 413.
    #[error("Generated PDF exceeds size limit of {:.1}MB", mib(.max_bytes))]
    TooLarge { actual_bytes: usize, max_bytes: usize },
}

impl ExportError {
    /// Machine-readable error code carried in the JSON error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::InvalidInput(_) => "INVALID_INPUT",
            ExportError::Engine(_) => "ENGINE_FAILURE",
            ExportError::Timeout { .. } => "PDF_GENERATION_TIMEOUT",
            ExportError::TooLarge { .. } => "PDF_TOO_LARGE",
        }
    }

    /// Actionable hint for the caller, where one exists.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ExportError::Timeout { .. } => {
                Some("Try again with simpler content or contact support if the issue persists")
            }
            ExportError::TooLarge { .. } => {
                Some("Consider reducing content or using a more compact layout")
            }
            _ => None,
        }
    }
}

/// Byte count as mebibytes, for human-facing messages and error bodies.
pub(crate) fn mib(bytes: &usize) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}
