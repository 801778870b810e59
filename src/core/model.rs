use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::geometry::BoundingBox;

/// Closed taxonomy of contract findings. Raw model labels are mapped into
/// these four kinds before anything downstream sees them; open-ended strings
/// never reach the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    HandwrittenSignature,
    ElectronicSignature,
    Annotation,
    Modification,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::HandwrittenSignature => "handwritten_signature",
            Category::ElectronicSignature => "electronic_signature",
            Category::Annotation => "annotation",
            Category::Modification => "modification",
        }
    }
}

/// One located finding on one page. Immutable once normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub category: Category,
    /// 1-based page number in the source document.
    pub page: u32,
    pub bbox: BoundingBox,
    pub confidence: f32,
    /// Display text only; never consulted by the classifier.
    pub description: String,
}

/// The five mutually exclusive document verdicts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCase {
    Untouched,
    HandwrittenSigned,
    ElectronicSigned,
    Annotated,
    Mixed,
}

impl DocumentCase {
    pub fn id(self) -> u8 {
        match self {
            DocumentCase::Untouched => 1,
            DocumentCase::HandwrittenSigned => 2,
            DocumentCase::ElectronicSigned => 3,
            DocumentCase::Annotated => 4,
            DocumentCase::Mixed => 5,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DocumentCase::Untouched => "No modification of the document",
            DocumentCase::HandwrittenSigned => "Presence of a handwritten signature",
            DocumentCase::ElectronicSigned => "Presence of an electronic signature",
            DocumentCase::Annotated => "Presence of annotations other than a signature",
            DocumentCase::Mixed => "Presence of both annotations and a signature",
        }
    }
}

/// Document-level verdict. The four booleans are the only inputs the case
/// decision depends on; pages and boxes feed the justification text only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub case: DocumentCase,
    pub description: String,
    pub justification: String,
    pub has_modification: bool,
    pub has_handwritten_signature: bool,
    pub has_electronic_signature: bool,
    pub has_annotation: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Analyzing,
    Completed,
    Error,
}

/// Output of one successful analysis run. Written once by the pipeline,
/// read-only for every consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: String,
    pub file_name: String,
    pub timestamp: DateTime<Utc>,
    pub status: AnalysisStatus,
    pub classification: Classification,
    /// Page-ascending; within a page, model emission order.
    pub detections: Vec<Detection>,
    pub confidence: f32,
}
