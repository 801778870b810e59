use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::AnalysisResult;
use crate::export::Exporter;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, result: &AnalysisResult) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("analysis.json");
        let data = serde_json::to_string_pretty(result)?;
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::core::classifier::classify;
    use crate::core::geometry::BoundingBox;
    use crate::core::model::{AnalysisStatus, Category, Detection};

    #[test]
    fn writes_pretty_json_with_detections() -> Result<()> {
        let mut out = std::env::temp_dir();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        out.push(format!("contrascan-json-{}-{}", std::process::id(), now));

        let detections = vec![Detection {
            category: Category::HandwrittenSignature,
            page: 3,
            bbox: BoundingBox {
                x: 10,
                y: 20,
                width: 100,
                height: 40,
            },
            confidence: 0.9,
            description: "person detected with 90% confidence".to_string(),
        }];
        let result = AnalysisResult {
            id: "analysis_1".to_string(),
            file_name: "contract.pdf".to_string(),
            timestamp: Utc::now(),
            status: AnalysisStatus::Completed,
            classification: classify(&detections),
            detections,
            confidence: 0.9,
        };

        JsonExporter::new(out.clone()).export(&result)?;

        let contents = fs::read_to_string(out.join("analysis.json"))?;
        assert!(contents.contains("handwritten_signature"));
        assert!(contents.contains("contract.pdf"));
        assert!(contents.contains("completed"));

        let _ = fs::remove_dir_all(&out);
        Ok(())
    }
}
