use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use crate::detect::Detector;

pub const DEFAULT_MODEL: &str = "detr-resnet-50";

/// Shells out to the Python detection bridge, which loads the object-detection
/// model and prints a JSON array of `{label, box, score}` records per image.
#[derive(Debug)]
pub struct DetrBridge {
    work_dir: PathBuf,
    script_path: PathBuf,
    model: String,
    ready: OnceLock<()>,
}

impl DetrBridge {
    pub fn new(work_dir: PathBuf) -> Self {
        Self {
            work_dir,
            script_path: PathBuf::from("bridge/detect_bridge.py"),
            model: DEFAULT_MODEL.to_string(),
            ready: OnceLock::new(),
        }
    }

    pub fn with_script(mut self, script_path: PathBuf) -> Self {
        self.script_path = script_path;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }
}

impl Detector for DetrBridge {
    fn ensure_ready(&self) -> Result<()> {
        if self.ready.get().is_some() {
            return Ok(());
        }

        let output = Command::new("python3")
            .arg(&self.script_path)
            .arg("--probe")
            .arg("--model")
            .arg(&self.model)
            .output()
            .with_context(|| "failed to invoke python detection bridge")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("detection bridge probe failed: {stderr}");
        }

        // Latched only after a successful probe; earlier failures retry.
        let _ = self.ready.set(());
        Ok(())
    }

    fn detect_page(&self, image: &Path) -> Result<Vec<serde_json::Value>> {
        fs::create_dir_all(&self.work_dir)?;
        let output = Command::new("python3")
            .arg(&self.script_path)
            .arg("--image")
            .arg(image)
            .arg("--model")
            .arg(&self.model)
            .arg("--work-dir")
            .arg(&self.work_dir)
            .output()
            .with_context(|| "failed to invoke python detection bridge")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("detection bridge failed: {stderr}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let records: Vec<serde_json::Value> = serde_json::from_str(&stdout)
            .with_context(|| "failed to parse detection JSON response")?;
        Ok(records)
    }
}
