//! Core library for splitting scanned case bundles.
//!
//! This crate provides:
//! - PDF access (page rasterization, footer crops, page-range extraction)
//! - Footer OCR through a pluggable [`ocr::TextRecognizer`]
//! - Fuzzy case-number and "page N of M" detection
//! - The boundary scanner that cuts a bundle into per-case documents
//! - A CSV summary of every document written

pub mod detect;
pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod scan;

pub use detect::{Detection, IdentifierDetector, PageCounter, normalize_case_number};
pub use error::{OcrError, PdfError, Result, SplitError, SummaryError};
pub use models::{
    Chunk, EnhanceOptions, ModelConfig, OutputConfig, ScanConfig, SplitConfig, SummaryRecorder,
    SummaryRow,
};
pub use ocr::TextRecognizer;
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pdf::{ChunkWriter, FooterSampler, PdfDocument};
pub use scan::{
    BoundaryScanner, CancelFlag, EventSink, FnSink, NoopSink, RunReport, ScanEvent, ScanOutcome,
    SplitJob,
};
