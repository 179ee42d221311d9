//! Boundary scanner: walks pages in order and cuts the document into chunks.

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::carry::CarryState;
use super::events::{CancelFlag, EventSink, ScanEvent};
use crate::detect::{Detection, IdentifierDetector, PageCounter, normalize_case_number, parse_counter};
use crate::models::{Chunk, EnhanceOptions, ScanConfig, SplitConfig, SummaryRecorder};
use crate::ocr::TextRecognizer;
use crate::pdf::{ChunkWriter, FooterSampler};

/// Result of scanning forward from one chunk start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkScan {
    /// Both identifiers resolved on page `anchor`.
    Boundary {
        anchor: usize,
        counter: PageCounter,
        case: String,
    },
    /// The last page was reached without resolving a boundary.
    Exhausted,
    /// Cancellation was requested before a boundary resolved.
    Cancelled,
}

/// How a whole run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Every page was assigned to a chunk.
    Completed,
    /// Pages from the last cursor onward never resolved a boundary.
    NoBoundaryFound,
    /// The host cancelled the run.
    Cancelled,
}

/// Chunks produced by one run, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub outcome: ScanOutcome,
    /// Chunks written successfully.
    pub chunks: Vec<Chunk>,
    /// Chunks whose write failed; these are absent from the summary.
    pub failed: Vec<Chunk>,
}

/// Page-ordered boundary scanner over a footer sampler and a recognizer.
pub struct BoundaryScanner<S, R> {
    sampler: S,
    recognizer: R,
    detector: IdentifierDetector,
    scan: ScanConfig,
    enhance: EnhanceOptions,
    extension: String,
}

impl<S: FooterSampler, R: TextRecognizer> BoundaryScanner<S, R> {
    pub fn new(sampler: S, recognizer: R, config: &SplitConfig) -> Self {
        Self {
            sampler,
            recognizer,
            detector: IdentifierDetector::new()
                .with_case_threshold(config.scan.case_threshold)
                .with_counter_threshold(config.scan.counter_threshold),
            scan: config.scan.clone(),
            enhance: config.enhance,
            extension: config.output.extension.clone(),
        }
    }

    /// Scan the whole document, writing each chunk into `output_dir` as
    /// soon as its boundary resolves.
    ///
    /// Successfully written chunks are recorded in `summary`. A failed
    /// write is logged and skipped; the run carries on with the next chunk.
    pub fn run<W: ChunkWriter>(
        &self,
        writer: &W,
        output_dir: &Path,
        summary: &mut SummaryRecorder,
        events: &dyn EventSink,
        cancel: &CancelFlag,
    ) -> ScanReport {
        let total = self.sampler.page_count();
        let mut cursor = 0;
        let mut chunks = Vec::new();
        let mut failed = Vec::new();
        let mut outcome = ScanOutcome::Completed;
        let mut carry = CarryState::new();

        while cursor < total {
            if cancel.is_cancelled() {
                outcome = ScanOutcome::Cancelled;
                break;
            }

            let message = format!("Scanning chunks starting from page {}...", cursor + 1);
            info!("{}", message);
            events.emit(ScanEvent::progress(fraction(cursor, total), message));

            let (anchor, counter, case) = match self.scan_chunk(cursor, &mut carry, events, cancel) {
                ChunkScan::Boundary {
                    anchor,
                    counter,
                    case,
                } => (anchor, counter, case),
                ChunkScan::Exhausted => {
                    warn!("No valid pattern found in remaining pages");
                    outcome = ScanOutcome::NoBoundaryFound;
                    break;
                }
                ChunkScan::Cancelled => {
                    outcome = ScanOutcome::Cancelled;
                    break;
                }
            };

            carry.reset();

            // Saturating, so a huge declared total clamps to the last page.
            // `anchor < total`, so the cursor always moves forward.
            let end_exclusive = anchor
                .saturating_add(counter.remaining())
                .saturating_add(1)
                .min(total);
            let case_id = normalize_case_number(&case);
            let label = Chunk::label_for(Some(&case_id), &self.extension, cursor, end_exclusive);
            let chunk = Chunk::new(cursor, end_exclusive - 1, label);

            match writer.write_chunk(chunk.start_page, chunk.end_page, &output_dir.join(&chunk.label)) {
                Ok(()) => {
                    info!(
                        "Saved {} (pages {}-{}, {} pages)",
                        chunk.label,
                        chunk.start_page + 1,
                        chunk.end_page + 1,
                        chunk.page_count()
                    );
                    events.emit(ScanEvent::info(
                        fraction(end_exclusive, total),
                        format!("Saved {}", chunk.label),
                    ));
                    summary.record(&chunk);
                    chunks.push(chunk);
                }
                Err(e) => {
                    error!("Failed to save chunk {}: {}", chunk.label, e);
                    events.emit(ScanEvent::error(format!(
                        "Failed to save {}: {}",
                        chunk.label, e
                    )));
                    failed.push(chunk);
                }
            }

            cursor = end_exclusive;
        }

        ScanReport {
            outcome,
            chunks,
            failed,
        }
    }

    /// Scan forward from `chunk_start` until a page resolves both a case
    /// number and an "N of M" counter.
    ///
    /// `carry` must be empty at the chunk start; the caller resets it once
    /// the boundary has been turned into a chunk.
    pub fn scan_chunk(
        &self,
        chunk_start: usize,
        carry: &mut CarryState,
        events: &dyn EventSink,
        cancel: &CancelFlag,
    ) -> ChunkScan {
        let total = self.sampler.page_count();

        for page in chunk_start..total {
            if cancel.is_cancelled() {
                info!("Scan cancelled at page {}", page + 1);
                return ChunkScan::Cancelled;
            }

            events.emit(ScanEvent::progress(
                fraction(page, total),
                format!("Scanning page {}...", page + 1),
            ));

            let detection = self.read_page(page, carry);
            let resolved = carry.absorb(detection);
            debug!(
                "P{}: case={:?}, page={:?}",
                page + 1,
                resolved.case,
                resolved.page_counter
            );

            if let (Some(case), Some(counter)) = (
                resolved.case,
                resolved.page_counter.as_deref().and_then(parse_counter),
            ) {
                return ChunkScan::Boundary {
                    anchor: page,
                    counter,
                    case,
                };
            }
        }

        ChunkScan::Exhausted
    }

    /// Sample and recognize one page, detecting only fields not yet carried.
    fn read_page(&self, page: usize, carry: &CarryState) -> Detection {
        let crop = match self
            .sampler
            .sample(page, self.scan.dpi, self.scan.bottom_fraction)
        {
            Ok(crop) => crop,
            Err(e) => {
                warn!("Failed to sample page {}: {}", page + 1, e);
                return Detection::default();
            }
        };

        let case_lines = self.recognize(page, &crop.case_zone, &self.enhance);
        // Counters are small and crisp; upscaling only blurs them.
        let counter_lines = self.recognize(page, &crop.counter_zone, &self.enhance.with_upscale(1.0));

        self.detector.detect(
            &case_lines,
            &counter_lines,
            carry.has_case(),
            carry.has_page_counter(),
        )
    }

    /// Recognize with enhancement, falling back to the raw crop once.
    fn recognize(&self, page: usize, image: &DynamicImage, options: &EnhanceOptions) -> Vec<String> {
        match self.recognizer.recognize(image, Some(options)) {
            Ok(lines) => lines,
            Err(e) => {
                debug!("Enhanced OCR failed on page {}: {}; retrying raw crop", page + 1, e);
                self.recognizer.recognize(image, None).unwrap_or_else(|e| {
                    warn!("OCR failed on page {}: {}", page + 1, e);
                    Vec::new()
                })
            }
        }
    }
}

fn fraction(done: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        done as f64 / total as f64
    }
}
