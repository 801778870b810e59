use std::collections::BTreeSet;

use crate::core::model::{Category, Classification, Detection, DocumentCase};

/// Derives the document verdict from the detection list. Pure and total:
/// every list, including the empty one, lands in exactly one of the five
/// cases.
///
/// Only the presence or absence of each category selects the case. A
/// modification with nothing else falls through to `Mixed`; the rule table
/// never had a modification-only case and downstream consumers rely on that
/// asymmetry staying put.
pub fn classify(detections: &[Detection]) -> Classification {
    let present = |category: Category| detections.iter().any(|d| d.category == category);

    let has_modification = present(Category::Modification);
    let has_handwritten = present(Category::HandwrittenSignature);
    let has_electronic = present(Category::ElectronicSignature);
    let has_annotation = present(Category::Annotation);

    let (case, justification) =
        if !has_modification && !has_handwritten && !has_electronic && !has_annotation {
            (
                DocumentCase::Untouched,
                "Original document with no modification, signature or annotation detected."
                    .to_string(),
            )
        } else if has_handwritten && !has_annotation {
            (
                DocumentCase::HandwrittenSigned,
                format!(
                    "Handwritten signature detected on page {}.",
                    first_page_of(detections, Category::HandwrittenSignature)
                ),
            )
        } else if has_electronic && !has_annotation && !has_handwritten {
            (
                DocumentCase::ElectronicSigned,
                format!(
                    "Electronic signature detected on page {}.",
                    first_page_of(detections, Category::ElectronicSignature)
                ),
            )
        } else if has_annotation && !has_handwritten && !has_electronic {
            (
                DocumentCase::Annotated,
                format!(
                    "Annotations detected without signature: pages {}.",
                    annotation_pages(detections)
                ),
            )
        } else {
            (
                DocumentCase::Mixed,
                "Combination of signatures and annotations detected.".to_string(),
            )
        };

    Classification {
        case,
        description: case.description().to_string(),
        justification,
        has_modification,
        has_handwritten_signature: has_handwritten,
        has_electronic_signature: has_electronic,
        has_annotation,
    }
}

fn first_page_of(detections: &[Detection], category: Category) -> u32 {
    detections
        .iter()
        .find(|d| d.category == category)
        .map(|d| d.page)
        .unwrap_or(0)
}

/// Distinct annotation pages, ascending, regardless of emission order.
fn annotation_pages(detections: &[Detection]) -> String {
    let pages: BTreeSet<u32> = detections
        .iter()
        .filter(|d| d.category == Category::Annotation)
        .map(|d| d.page)
        .collect();
    pages
        .iter()
        .map(|page| page.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
