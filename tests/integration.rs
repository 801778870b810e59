use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde_json::{json, Value};

use contrascan::core::model::{AnalysisStatus, DocumentCase};
use contrascan::detect::Detector;
use contrascan::error::AnalysisError;
use contrascan::pipeline::{analyze_document, export_analysis, PipelineConfig};
use contrascan::render::{Rasterizer, RenderedPage};

/// Rasterizer double returning a fixed page list without touching poppler.
struct FixedRasterizer {
    pages: Vec<u32>,
}

impl FixedRasterizer {
    fn with_pages(pages: &[u32]) -> Self {
        Self {
            pages: pages.to_vec(),
        }
    }
}

impl Rasterizer for FixedRasterizer {
    fn rasterize(&self, _pdf_path: &Path) -> Result<Vec<RenderedPage>> {
        Ok(self
            .pages
            .iter()
            .map(|&page_number| RenderedPage {
                page_number,
                path: PathBuf::from(format!("page_{page_number:03}-{page_number}.png")),
                width: 1240,
                height: 1754,
            })
            .collect())
    }
}

struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<RenderedPage>> {
        anyhow::bail!("no pages of {} could be rendered", pdf_path.display())
    }
}

/// Detector double replaying one scripted response per page, in page order.
struct ScriptedDetector {
    responses: RefCell<VecDeque<Result<Vec<Value>>>>,
}

impl ScriptedDetector {
    fn new(responses: Vec<Result<Vec<Value>>>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
        }
    }
}

impl Detector for ScriptedDetector {
    fn detect_page(&self, _image: &Path) -> Result<Vec<Value>> {
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

struct UnavailableDetector;

impl Detector for UnavailableDetector {
    fn ensure_ready(&self) -> Result<()> {
        anyhow::bail!("detection bridge probe failed: model missing")
    }

    fn detect_page(&self, _image: &Path) -> Result<Vec<Value>> {
        unreachable!("detect_page must not be called when the probe fails")
    }
}

fn raw_record(label: &str, score: f64) -> Value {
    json!({
        "label": label,
        "box": {"xmin": 10.0, "ymin": 20.0, "xmax": 110.0, "ymax": 60.0},
        "score": score
    })
}

fn temp_config(prefix: &str) -> PipelineConfig {
    let mut out = std::env::temp_dir();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    out.push(format!("{prefix}-{}-{now}", std::process::id()));
    PipelineConfig::new(PathBuf::from("contract.pdf"), out)
}

#[test]
fn one_failed_page_does_not_fail_the_run() -> Result<()> {
    let config = temp_config("contrascan-partial");
    let rasterizer = FixedRasterizer::with_pages(&[1, 2, 3]);
    let detector = ScriptedDetector::new(vec![
        Ok(vec![raw_record("person", 0.9)]),
        Err(anyhow::anyhow!("inference crashed")),
        Ok(vec![raw_record("hand", 0.8)]),
    ]);

    let result = analyze_document(&config, &rasterizer, &detector)?;

    assert_eq!(result.status, AnalysisStatus::Completed);
    let pages: Vec<u32> = result.detections.iter().map(|d| d.page).collect();
    assert_eq!(pages, vec![1, 3]);
    assert_eq!(result.classification.case, DocumentCase::HandwrittenSigned);
    Ok(())
}

#[test]
fn detections_are_page_ascending() -> Result<()> {
    let config = temp_config("contrascan-order");
    let rasterizer = FixedRasterizer::with_pages(&[1, 2, 3]);
    let detector = ScriptedDetector::new(vec![
        Ok(vec![raw_record("book", 0.5), raw_record("paper", 0.6)]),
        Ok(vec![raw_record("book", 0.7)]),
        Ok(vec![raw_record("paper", 0.8)]),
    ]);

    let result = analyze_document(&config, &rasterizer, &detector)?;

    let pages: Vec<u32> = result.detections.iter().map(|d| d.page).collect();
    assert_eq!(pages, vec![1, 1, 2, 3]);
    assert_eq!(result.classification.case, DocumentCase::Annotated);
    assert!(result
        .classification
        .justification
        .contains("pages 1, 2, 3."));
    Ok(())
}

#[test]
fn unmapped_labels_never_reach_the_verdict() -> Result<()> {
    let config = temp_config("contrascan-unmapped");
    let rasterizer = FixedRasterizer::with_pages(&[1]);
    let detector = ScriptedDetector::new(vec![Ok(vec![
        raw_record("unknown_widget", 0.99),
        raw_record("car", 0.98),
    ])]);

    let result = analyze_document(&config, &rasterizer, &detector)?;

    assert!(result.detections.is_empty());
    assert_eq!(result.classification.case, DocumentCase::Untouched);
    // Sentinel confidence for a clean document, not an average.
    assert_eq!(result.confidence, 0.95);
    Ok(())
}

#[test]
fn mean_confidence_spans_all_pages() -> Result<()> {
    let config = temp_config("contrascan-confidence");
    let rasterizer = FixedRasterizer::with_pages(&[1, 2]);
    let detector = ScriptedDetector::new(vec![
        Ok(vec![raw_record("person", 0.8)]),
        Ok(vec![raw_record("book", 0.6)]),
    ]);

    let result = analyze_document(&config, &rasterizer, &detector)?;

    assert!((result.confidence - 0.70).abs() < 1e-6);
    Ok(())
}

#[test]
fn unavailable_detector_is_fatal() {
    let config = temp_config("contrascan-probe");
    let rasterizer = FixedRasterizer::with_pages(&[1]);

    let err = analyze_document(&config, &rasterizer, &UnavailableDetector)
        .expect_err("probe failure must abort the run");

    assert!(matches!(err, AnalysisError::DetectorUnavailable(_)));
}

#[test]
fn unrenderable_document_is_fatal() {
    let config = temp_config("contrascan-noraster");
    let detector = ScriptedDetector::new(vec![]);

    let err = analyze_document(&config, &FailingRasterizer, &detector)
        .expect_err("zero rendered pages must abort the run");

    assert!(matches!(err, AnalysisError::Document(_)));
}

#[test]
fn full_run_exports_json_report_and_overlays() -> Result<()> {
    let config = temp_config("contrascan-export");
    fs::create_dir_all(config.pages_dir())?;
    // Stand-ins for the rasterizer's output files.
    fs::write(config.pages_dir().join("page_001-1.png"), [])?;
    fs::write(config.pages_dir().join("page_002-2.png"), [])?;

    let rasterizer = FixedRasterizer::with_pages(&[1, 2]);
    let detector = ScriptedDetector::new(vec![
        Ok(vec![raw_record("person", 0.9)]),
        Ok(vec![raw_record("book", 0.7)]),
    ]);

    let result = analyze_document(&config, &rasterizer, &detector)?;
    export_analysis(&result, &config)?;

    let json = fs::read_to_string(config.output.join("analysis.json"))?;
    assert!(json.contains("handwritten_signature"));
    assert!(json.contains("mixed"));

    let report = fs::read_to_string(config.output.join("report.txt"))?;
    assert!(report.contains("Case 5"));

    let overlay = fs::read_to_string(config.pages_dir().join("page_001.html"))?;
    assert!(overlay.contains("class='bbox handwritten_signature'"));

    let _ = fs::remove_dir_all(&config.output);
    Ok(())
}
