use anyhow::{Context, Result};
use image::ImageReader;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::render::pdf_reader::page_count;
use crate::render::{Rasterizer, RenderedPage};

/// Rasterizes pages one at a time with pdftoppm at a fixed DPI.
#[derive(Debug, Clone)]
pub struct PdfRasterizer {
    out_dir: PathBuf,
    dpi: u32,
}

impl PdfRasterizer {
    pub fn new(out_dir: PathBuf, dpi: u32) -> Self {
        Self { out_dir, dpi }
    }

    fn render_page(&self, pdf_path: &Path, page_number: u32) -> Result<RenderedPage> {
        let prefix = self.out_dir.join(format!("page_{page_number:03}"));
        let prefix_str = prefix
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-UTF8 output path not supported"))?;

        let status = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg(pdf_path)
            .arg(prefix_str)
            .status()
            .with_context(|| "failed to invoke pdftoppm; is poppler-utils installed?")?;

        if !status.success() {
            anyhow::bail!("pdftoppm failed with status: {status}");
        }

        // pdftoppm names the single-page output `<prefix>-<page>.png`
        let image_path = self
            .out_dir
            .join(format!("page_{page_number:03}-{page_number}.png"));

        if !image_path.exists() {
            anyhow::bail!(
                "expected rendered image not found: {}",
                image_path.display()
            );
        }

        let (width, height) = ImageReader::open(&image_path)?
            .into_dimensions()
            .with_context(|| format!("failed to read dimensions of {}", image_path.display()))?;

        Ok(RenderedPage {
            page_number,
            path: image_path,
            width,
            height,
        })
    }
}

impl Rasterizer for PdfRasterizer {
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<RenderedPage>> {
        fs::create_dir_all(&self.out_dir)?;
        let total = page_count(pdf_path)?;

        let mut pages = Vec::with_capacity(total);
        for page_number in 1..=total as u32 {
            match self.render_page(pdf_path, page_number) {
                Ok(page) => pages.push(page),
                // Page-local failure: the page just contributes nothing.
                Err(err) => warn!("page {page_number} failed to render: {err:#}"),
            }
        }

        if pages.is_empty() {
            anyhow::bail!("no pages of {} could be rendered", pdf_path.display());
        }
        Ok(pages)
    }
}
