use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::AnalysisResult;
use crate::export::Exporter;

/// Plain-text verdict report for the output directory.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    out_dir: PathBuf,
}

impl ReportExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn render(result: &AnalysisResult) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "Contract analysis: {}", result.file_name);
        let _ = writeln!(text, "Analyzed: {}", result.timestamp.to_rfc3339());
        let _ = writeln!(
            text,
            "Case {}: {}",
            result.classification.case.id(),
            result.classification.description
        );
        let _ = writeln!(text, "Justification: {}", result.classification.justification);
        let _ = writeln!(
            text,
            "Overall confidence: {:.0}%",
            f64::from(result.confidence) * 100.0
        );
        text.push('\n');

        if result.detections.is_empty() {
            text.push_str("No detections.\n");
        } else {
            let _ = writeln!(text, "Detections ({}):", result.detections.len());
            for detection in &result.detections {
                let _ = writeln!(
                    text,
                    "  page {:>3}  {:<22}  {:>3.0}%  x:{} y:{} w:{} h:{}",
                    detection.page,
                    detection.category.label(),
                    f64::from(detection.confidence) * 100.0,
                    detection.bbox.x,
                    detection.bbox.y,
                    detection.bbox.width,
                    detection.bbox.height
                );
            }
        }
        text
    }
}

impl Exporter for ReportExporter {
    fn export(&self, result: &AnalysisResult) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("report.txt");
        fs::write(path, Self::render(result))?;
        Ok(())
    }
}
