use crate::core::model::Detection;

/// Sentinel reported when the detector found nothing at all: high confidence
/// in the negative finding, not a measured quantity.
pub const NO_FINDINGS_CONFIDENCE: f32 = 0.95;

/// Arithmetic mean of all detection confidences; the sentinel for the empty
/// list. Total over any input.
pub fn aggregate_confidence(detections: &[Detection]) -> f32 {
    if detections.is_empty() {
        return NO_FINDINGS_CONFIDENCE;
    }
    let sum: f32 = detections.iter().map(|d| d.confidence).sum();
    sum / detections.len() as f32
}
