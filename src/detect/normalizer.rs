use serde::Deserialize;
use serde_json::Value;

use crate::core::geometry::{BoundingBox, RawBox};
use crate::core::model::{Category, Detection};

/// Substring rules applied to the lower-cased model label; first match wins.
/// The table is not exhaustive: a label matching no rule yields no detection.
/// Specific names come before generic ones so "electronic_signature" resolves
/// before the bare "signature" rule. The tail covers the generic-object
/// vocabulary of detectors without a document-specific head.
const LABEL_RULES: &[(&str, Category)] = &[
    ("handwritten", Category::HandwrittenSignature),
    ("electronic", Category::ElectronicSignature),
    ("digital", Category::ElectronicSignature),
    ("signature", Category::HandwrittenSignature),
    ("annotation", Category::Annotation),
    ("modification", Category::Modification),
    ("correction", Category::Modification),
    ("stamp", Category::ElectronicSignature),
    ("person", Category::HandwrittenSignature),
    ("hand", Category::HandwrittenSignature),
    ("book", Category::Annotation),
    ("paper", Category::Annotation),
];

pub fn map_label(label: &str) -> Option<Category> {
    let lower = label.to_lowercase();
    LABEL_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, category)| *category)
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    label: String,
    #[serde(rename = "box")]
    bounds: RawBox,
    #[serde(default)]
    score: f32,
}

/// One raw record to at most one detection. A record that is not an object or
/// lacks a usable `label`/`box` is skipped, as is any label outside the
/// mapping table; a missing `score` reads as 0. Never fails.
pub fn normalize_record(value: &Value, page: u32) -> Option<Detection> {
    let record: RawRecord = serde_json::from_value(value.clone()).ok()?;
    let category = map_label(&record.label)?;
    Some(Detection {
        category,
        page,
        bbox: BoundingBox::from_raw(&record.bounds),
        confidence: record.score,
        description: format!(
            "{} detected with {:.0}% confidence",
            record.label,
            f64::from(record.score) * 100.0
        ),
    })
}

/// Normalizes one page's worth of raw records, preserving emission order.
pub fn normalize_page(values: &[Value], page: u32) -> Vec<Detection> {
    values
        .iter()
        .filter_map(|value| normalize_record(value, page))
        .collect()
}
