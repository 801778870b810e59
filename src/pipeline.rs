use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};

use crate::core::classifier::classify;
use crate::core::confidence::aggregate_confidence;
use crate::core::model::{AnalysisResult, AnalysisStatus, Detection};
use crate::detect::{normalizer, Detector};
use crate::error::AnalysisError;
use crate::export::{Exporter, JsonExporter, OverlayExporter, ReportExporter};
use crate::render::Rasterizer;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl PipelineConfig {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self { input, output }
    }

    /// Directory the rasterizer renders into and the overlay export reads
    /// back from.
    pub fn pages_dir(&self) -> PathBuf {
        self.output.join("pages")
    }
}

/// Runs one analysis attempt end to end: probe the detector, rasterize,
/// detect page by page, normalize, classify, aggregate.
///
/// Collaborators are injected so concurrent runs can be given independent
/// detector instances; within a run the detector is called sequentially. A
/// fatal error yields no result at all, never a partial or fallback verdict.
pub fn analyze_document(
    config: &PipelineConfig,
    rasterizer: &dyn Rasterizer,
    detector: &dyn Detector,
) -> Result<AnalysisResult, AnalysisError> {
    detector
        .ensure_ready()
        .map_err(|err| AnalysisError::DetectorUnavailable(format!("{err:#}")))?;

    let pages = rasterizer
        .rasterize(&config.input)
        .map_err(|err| AnalysisError::Document(format!("{err:#}")))?;
    if pages.is_empty() {
        return Err(AnalysisError::Document(
            "rasterizer returned no pages".to_string(),
        ));
    }
    info!(
        "rasterized {} page(s) of {}",
        pages.len(),
        config.input.display()
    );

    let mut detections: Vec<Detection> = Vec::new();
    for page in &pages {
        match detector.detect_page(&page.path) {
            Ok(records) => {
                detections.extend(normalizer::normalize_page(&records, page.page_number));
            }
            // Contained at the page boundary: the page contributes nothing.
            Err(err) => warn!("detection failed on page {}: {err:#}", page.page_number),
        }
    }
    info!("{} detection(s) after normalization", detections.len());

    let classification = classify(&detections);
    let confidence = aggregate_confidence(&detections);

    let now = Utc::now();
    Ok(AnalysisResult {
        id: format!("analysis_{}", now.timestamp_millis()),
        file_name: file_name_of(&config.input),
        timestamp: now,
        status: AnalysisStatus::Completed,
        classification,
        detections,
        confidence,
    })
}

/// Writes every export for a completed run: analysis.json and report.txt in
/// the output root, per-page HTML overlays next to the rendered images.
pub fn export_analysis(result: &AnalysisResult, config: &PipelineConfig) -> Result<()> {
    let json_exporter = JsonExporter::new(config.output.clone());
    json_exporter.export(result)?;

    let report_exporter = ReportExporter::new(config.output.clone());
    report_exporter.export(result)?;

    let overlay_exporter = OverlayExporter::new(config.pages_dir());
    overlay_exporter.export(result)?;

    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
