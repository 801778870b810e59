pub mod bridge;
pub mod normalizer;

use anyhow::Result;
use std::path::Path;

pub use bridge::DetrBridge;

/// Seam to the object-detection model. One instance is shared across a run
/// and the pipeline calls it one page at a time, never concurrently.
pub trait Detector {
    /// Idempotent readiness check: retried until the first success, a no-op
    /// afterwards. Failure here makes the whole run unavailable.
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Raw model output for one rendered page image, as loosely-typed JSON
    /// records. The vocabulary is open; normalization closes it.
    fn detect_page(&self, image: &Path) -> Result<Vec<serde_json::Value>>;
}
