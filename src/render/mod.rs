pub mod pdf_reader;
pub mod rasterizer;

pub use rasterizer::PdfRasterizer;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// One page image produced at the detection resolution.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 1-based page number in the source document.
    pub page_number: u32,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Seam to the page-rendering collaborator.
pub trait Rasterizer {
    /// Renders every page it can, in ascending page order. A page that fails
    /// to render is omitted; zero renderable pages is an error.
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<RenderedPage>>;
}
