use thiserror::Error;

/// Run-fatal failures. Page-local problems never reach this type: a page
/// that cannot be rendered or detected simply contributes zero detections.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Rasterization produced no usable pages.
    #[error("document could not be rasterized: {0}")]
    Document(String),

    /// The shared detection model failed to initialize.
    #[error("detector unavailable: {0}")]
    DetectorUnavailable(String),
}
