use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{AnalysisResult, Detection};
use crate::export::Exporter;

/// Writes one HTML viewer per rendered page: the page image with the
/// detected regions drawn over it, color-coded by category. Lives in the
/// same directory the rasterizer rendered into so images are referenced by
/// relative name.
#[derive(Debug, Clone)]
pub struct OverlayExporter {
    pages_dir: PathBuf,
}

impl OverlayExporter {
    pub fn new(pages_dir: PathBuf) -> Self {
        Self { pages_dir }
    }

    fn detection_to_div(detection: &Detection) -> String {
        let category = detection.category.label();
        format!(
            r#"<div class='bbox {category}' style='left:{x}px; top:{y}px; width:{w}px; height:{h}px;' data-category='{category}' data-page='{page}' data-confidence='{conf:.3}' data-description='{desc}'></div>"#,
            x = detection.bbox.x,
            y = detection.bbox.y,
            w = detection.bbox.width,
            h = detection.bbox.height,
            page = detection.page,
            conf = detection.confidence,
            desc = html_escape::encode_single_quoted_attribute(&detection.description),
        )
    }

    /// Rendered page images in this directory, by ascending page number.
    fn rendered_pages(&self) -> Result<Vec<(u32, String)>> {
        let mut pages = Vec::new();
        for entry in fs::read_dir(&self.pages_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(page_number) = parse_page_number(&name) {
                pages.push((page_number, name));
            }
        }
        pages.sort();
        Ok(pages)
    }
}

/// Extracts the page number from the rasterizer's `page_NNN-N.png` naming.
fn parse_page_number(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(".png")?;
    let rest = stem.strip_prefix("page_")?;
    let (number, _) = rest.split_once('-')?;
    number.parse().ok()
}

impl Exporter for OverlayExporter {
    fn export(&self, result: &AnalysisResult) -> Result<()> {
        if !self.pages_dir.exists() {
            // Nothing rendered, nothing to overlay.
            return Ok(());
        }

        for (page_number, image_name) in self.rendered_pages()? {
            let mut boxes_html = String::new();
            for detection in result.detections.iter().filter(|d| d.page == page_number) {
                boxes_html.push_str(&OverlayExporter::detection_to_div(detection));
            }

            let html = format!(
                r#"<!DOCTYPE html>
<html>
<head>
<meta charset='utf-8'>
<title>{file_name} - page {page_number}</title>
<style>
body {{ margin: 0; font-family: Arial, sans-serif; }}
#canvas {{ position: relative; }}
#canvas img {{ display: block; }}
.bbox {{ position: absolute; border: 2px solid; box-sizing: border-box; }}
.bbox.handwritten_signature {{ border-color: rgba(0,128,0,0.7); background: rgba(0,128,0,0.1); }}
.bbox.electronic_signature {{ border-color: rgba(0,0,255,0.7); background: rgba(0,0,255,0.1); }}
.bbox.annotation {{ border-color: rgba(255,165,0,0.8); background: rgba(255,165,0,0.15); }}
.bbox.modification {{ border-color: rgba(255,0,0,0.7); background: rgba(255,0,0,0.1); }}
#info {{ position: fixed; right: 10px; top: 10px; background: #fff; padding: 10px; border: 1px solid #ddd; max-width: 300px; }}
#legend {{ position: fixed; right: 10px; bottom: 10px; background: #fff; padding: 10px; border: 1px solid #ddd; font-size: 12px; }}
.legend-item {{ margin: 5px 0; }}
.legend-box {{ display: inline-block; width: 20px; height: 15px; border: 2px solid; vertical-align: middle; margin-right: 5px; }}
</style>
</head>
<body>
<div id='info'>Click a region to inspect.</div>
<div id='legend'>
<div class='legend-item'><span class='legend-box' style='background: rgba(0,128,0,0.1); border-color: rgba(0,128,0,0.7);'></span>Handwritten signature</div>
<div class='legend-item'><span class='legend-box' style='background: rgba(0,0,255,0.1); border-color: rgba(0,0,255,0.7);'></span>Electronic signature</div>
<div class='legend-item'><span class='legend-box' style='background: rgba(255,165,0,0.15); border-color: rgba(255,165,0,0.8);'></span>Annotation</div>
<div class='legend-item'><span class='legend-box' style='background: rgba(255,0,0,0.1); border-color: rgba(255,0,0,0.7);'></span>Modification</div>
</div>
<div id='canvas'>
<img src='{image}' />
{boxes}
</div>
<script>
const info = document.getElementById('info');
for (const el of document.querySelectorAll('.bbox')) {{
  el.addEventListener('click', () => {{
    info.innerHTML = `category: ${{el.dataset.category}}<br/>page: ${{el.dataset.page}}<br/>confidence: ${{el.dataset.confidence}}<br/>${{el.dataset.description}}`;
  }});
}}
</script>
</body>
</html>"#,
                file_name = html_escape::encode_text(&result.file_name),
                page_number = page_number,
                image = image_name,
                boxes = boxes_html
            );

            let path = self.pages_dir.join(format!("page_{page_number:03}.html"));
            fs::write(path, html)?;
        }
        Ok(())
    }
}
