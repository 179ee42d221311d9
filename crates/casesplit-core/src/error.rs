//! Error types for the casesplit-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the casesplit library.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The source document does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Summary output error.
    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Page index outside the document.
    #[error("invalid page index: {0}")]
    InvalidPage(usize),

    /// No usable raster image on a page.
    #[error("failed to extract page image: {0}")]
    ImageExtraction(String),

    /// Failed to write an extracted page range.
    #[error("failed to write chunk: {0}")]
    Write(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors raised while writing the chunk summary.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the casesplit library.
pub type Result<T> = std::result::Result<T, SplitError>;
