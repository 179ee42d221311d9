//! PDF access: page rasterization, footer sampling and chunk extraction.

mod document;
mod footer;

pub use document::PdfDocument;
#[cfg(test)]
pub(crate) use document::synthetic;
pub use footer::{FooterCrop, FooterZones, ZoneRect};

use std::path::Path;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Produces the two footer crops the scanner reads for each page.
pub trait FooterSampler {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Crop the case and page-counter zones of a 0-based page.
    fn sample(&self, page: usize, dpi: u32, bottom_fraction: f64) -> Result<FooterCrop>;
}

/// Writes an inclusive 0-based page range of the source as a new document.
pub trait ChunkWriter {
    /// Write pages `start..=end` to `dest`. A failed write leaves no file.
    fn write_chunk(&self, start: usize, end: usize, dest: &Path) -> Result<()>;
}

impl<T: FooterSampler + ?Sized> FooterSampler for &T {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn sample(&self, page: usize, dpi: u32, bottom_fraction: f64) -> Result<FooterCrop> {
        (**self).sample(page, dpi, bottom_fraction)
    }
}

impl<T: ChunkWriter + ?Sized> ChunkWriter for &T {
    fn write_chunk(&self, start: usize, end: usize, dest: &Path) -> Result<()> {
        (**self).write_chunk(start, end, dest)
    }
}
