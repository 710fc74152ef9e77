//! Render Governor — wall-clock deadline and output-size ceiling around one
//! render attempt.
//!
//! The deadline races the conversion itself; the size check is a pure
//! post-condition on an on-time result. Oversized output is discarded — the
//! governor never hands back a payload above the ceiling.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

use crate::export::engine::EngineError;
use crate::export::error::ExportError;

/// Default wall-clock budget for one conversion.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);
/// Default output ceiling: 1.5 MiB.
pub const DEFAULT_MAX_PDF_BYTES: usize = 1_572_864;

/// Budgets applied to every render attempt.
#[derive(Debug, Clone, Copy)]
pub struct RenderLimits {
    pub deadline: Duration,
    pub max_pdf_bytes: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
            max_pdf_bytes: DEFAULT_MAX_PDF_BYTES,
        }
    }
}

/// Runs `op` under the limits.
///
/// On deadline expiry the conversion future is dropped; the engine's lease
/// travels with its detached blocking task, so the rendering surface is
/// still reclaimed once that task unwinds.
pub async fn governed<F>(op: F, limits: &RenderLimits) -> Result<Vec<u8>, ExportError>
where
    F: Future<Output = Result<Vec<u8>, EngineError>>,
{
    let started = Instant::now();
    let bytes = match tokio::time::timeout(limits.deadline, op).await {
        Err(_) => {
            let elapsed = started.elapsed();
            warn!(
                "render abandoned after {elapsed:?} (deadline {:?})",
                limits.deadline
            );
            return Err(ExportError::Timeout {
                deadline: limits.deadline,
                elapsed,
            });
        }
        Ok(Err(e)) => return Err(ExportError::Engine(e.to_string())),
        Ok(Ok(bytes)) => bytes,
    };

    if bytes.len() > limits.max_pdf_bytes {
        return Err(ExportError::TooLarge {
            actual_bytes: bytes.len(),
            max_bytes: limits.max_pdf_bytes,
        });
    }
    Ok(bytes)
}
