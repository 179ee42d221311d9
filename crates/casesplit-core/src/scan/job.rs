//! One split run: input checks, scanning and the summary table.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::events::{CancelFlag, EventSink, ScanEvent};
use super::scanner::{BoundaryScanner, ScanOutcome};
use crate::error::{OcrError, Result, SplitError};
use crate::models::{Chunk, SplitConfig, SummaryRecorder};
use crate::ocr::TextRecognizer;
use crate::pdf::PdfDocument;

/// Summary of a finished (non-fatal) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub outcome: ScanOutcome,
    pub chunks: Vec<Chunk>,
    pub failed: Vec<Chunk>,
    /// Location of the summary table, if it could be written.
    pub summary_path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Split one scanned PDF into per-case documents.
#[derive(Debug, Clone)]
pub struct SplitJob {
    input: PathBuf,
    output_dir: PathBuf,
    config: SplitConfig,
}

impl SplitJob {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, config: SplitConfig) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            config,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Run with the ONNX recognizer loaded from the configured model files.
    ///
    /// The recognizer lives for this run only.
    #[cfg(feature = "native")]
    pub fn run(&self, events: &dyn EventSink, cancel: &CancelFlag) -> Result<RunReport> {
        self.run_with_loader(events, cancel, || {
            crate::ocr::PureOcrEngine::from_config(&self.config.models)
        })
    }

    /// Run with a caller-supplied recognizer.
    pub fn run_with<R: TextRecognizer>(
        &self,
        recognizer: R,
        events: &dyn EventSink,
        cancel: &CancelFlag,
    ) -> Result<RunReport> {
        self.run_with_loader(events, cancel, move || Ok(recognizer))
    }

    fn run_with_loader<R, F>(&self, events: &dyn EventSink, cancel: &CancelFlag, load: F) -> Result<RunReport>
    where
        R: TextRecognizer,
        F: FnOnce() -> std::result::Result<R, OcrError>,
    {
        self.execute(events, cancel, load).inspect_err(|e| {
            error!("Processing error: {}", e);
            events.emit(ScanEvent::error(e.to_string()));
        })
    }

    fn execute<R, F>(&self, events: &dyn EventSink, cancel: &CancelFlag, load: F) -> Result<RunReport>
    where
        R: TextRecognizer,
        F: FnOnce() -> std::result::Result<R, OcrError>,
    {
        let started_at = Utc::now();

        self.config.validate()?;
        if !self.input.exists() {
            return Err(SplitError::InputNotFound(self.input.clone()));
        }
        std::fs::create_dir_all(&self.output_dir)?;

        let name = self
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string());
        let message = format!("Starting processing for {}", name);
        info!("{}", message);
        events.emit(ScanEvent::info(0.0, message));

        let document = PdfDocument::open(&self.input)?;
        let recognizer = load()?;
        info!("{} has {} pages", name, document.page_count());

        let scanner = BoundaryScanner::new(&document, recognizer, &self.config);
        let mut summary = SummaryRecorder::new();
        let scan = scanner.run(&document, &self.output_dir, &mut summary, events, cancel);

        let summary_path = self.write_summary(&summary, events);

        let terminal = match scan.outcome {
            ScanOutcome::Completed => ScanEvent::Complete {
                message: "Processing completed successfully.".to_string(),
            },
            ScanOutcome::NoBoundaryFound => ScanEvent::NoBoundary {
                message: "No valid pattern found in remaining pages.".to_string(),
            },
            ScanOutcome::Cancelled => ScanEvent::Cancelled {
                message: "Processing cancelled.".to_string(),
            },
        };
        info!(
            "{} ({} chunks written, {} failed)",
            terminal.message(),
            scan.chunks.len(),
            scan.failed.len()
        );
        events.emit(terminal);

        Ok(RunReport {
            input: self.input.clone(),
            output_dir: self.output_dir.clone(),
            outcome: scan.outcome,
            chunks: scan.chunks,
            failed: scan.failed,
            summary_path,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// A summary that cannot be written is reported but does not fail the run.
    fn write_summary(&self, summary: &SummaryRecorder, events: &dyn EventSink) -> Option<PathBuf> {
        let path = self.output_dir.join(&self.config.output.summary_file);

        match summary.write_csv(&path) {
            Ok(()) => {
                events.emit(ScanEvent::info(
                    1.0,
                    format!("Summary saved to {}", self.config.output.summary_file),
                ));
                Some(path)
            }
            Err(e) => {
                error!("Failed to save summary: {}", e);
                events.emit(ScanEvent::error(format!("Failed to save summary: {}", e)));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, GenericImageView};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::EnhanceOptions;
    use crate::pdf::synthetic::scanned_pdf;
    use crate::scan::events::EventLog;

    /// Answers by page shade; the wide crop is the case zone.
    struct ShadeRecognizer {
        pages: Vec<(u8, &'static str, &'static str)>,
    }

    impl TextRecognizer for ShadeRecognizer {
        fn recognize(
            &self,
            image: &DynamicImage,
            _enhance: Option<&EnhanceOptions>,
        ) -> std::result::Result<Vec<String>, OcrError> {
            let shade = image.to_luma8().get_pixel(0, 0)[0];
            let is_case_zone = image.dimensions().0 >= 40;

            Ok(self
                .pages
                .iter()
                .find(|(s, _, _)| s.abs_diff(shade) <= 3)
                .map(|(_, case, counter)| {
                    let line = if is_case_zone { *case } else { *counter };
                    vec![line.to_string()]
                })
                .unwrap_or_default())
        }
    }

    fn two_case_recognizer() -> ShadeRecognizer {
        ShadeRecognizer {
            pages: vec![
                (100, "Case Number: 55-1111", "Page 1 of 4"),
                (200, "Case Number: 66-2222", "Page 1 of 2"),
            ],
        }
    }

    fn write_pdf(dir: &Path, shades: &[u8]) -> PathBuf {
        let path = dir.join("scan.pdf");
        let shades = shades.to_vec();
        std::fs::write(&path, scanned_pdf(shades.len(), |i| shades[i])).unwrap();
        path
    }

    fn terminal_events(events: &EventLog) -> Vec<ScanEvent> {
        events.events().into_iter().filter(ScanEvent::is_terminal).collect()
    }

    #[test]
    fn test_run_writes_chunks_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pdf(dir.path(), &[100, 0, 0, 0, 200, 0]);
        let out = dir.path().join("out");
        let events = EventLog::new();

        let job = SplitJob::new(&input, &out, SplitConfig::default());
        let report = job
            .run_with(two_case_recognizer(), &events, &CancelFlag::new())
            .unwrap();

        assert_eq!(report.outcome, ScanOutcome::Completed);
        assert_eq!(
            report.chunks,
            vec![
                Chunk::new(0, 3, "I-55-1111.pdf"),
                Chunk::new(4, 5, "I-66-2222.pdf"),
            ]
        );

        let first = PdfDocument::open(&out.join("I-55-1111.pdf")).unwrap();
        assert_eq!(first.page_count(), 4);
        let second = PdfDocument::open(&out.join("I-66-2222.pdf")).unwrap();
        assert_eq!(second.page_count(), 2);

        let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
        assert_eq!(
            summary,
            "PDF File Generated Name,PDF Start Location,PDF End Location\n\
             I-55-1111.pdf,1,4\n\
             I-66-2222.pdf,5,6\n"
        );
        assert_eq!(report.summary_path, Some(out.join("summary.csv")));

        let all = events.events();
        assert_eq!(all[0].message(), "Starting processing for scan.pdf");
        assert_eq!(terminal_events(&events).len(), 1);
        assert!(matches!(all.last(), Some(ScanEvent::Complete { .. })));
    }

    #[test]
    fn test_no_boundary_still_writes_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pdf(dir.path(), &[0, 0, 0]);
        let out = dir.path().join("out");
        let events = EventLog::new();

        let report = SplitJob::new(&input, &out, SplitConfig::default())
            .run_with(two_case_recognizer(), &events, &CancelFlag::new())
            .unwrap();

        assert_eq!(report.outcome, ScanOutcome::NoBoundaryFound);
        assert!(report.chunks.is_empty());
        let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
        assert_eq!(summary, "PDF File Generated Name,PDF Start Location,PDF End Location\n");
        assert!(matches!(
            terminal_events(&events).as_slice(),
            [ScanEvent::NoBoundary { .. }]
        ));
    }

    #[test]
    fn test_cancelled_run_reports_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pdf(dir.path(), &[100, 0, 0, 0]);
        let out = dir.path().join("out");
        let events = EventLog::new();
        let cancel = CancelFlag::new();
        cancel.cancel();

        let report = SplitJob::new(&input, &out, SplitConfig::default())
            .run_with(two_case_recognizer(), &events, &cancel)
            .unwrap();

        assert_eq!(report.outcome, ScanOutcome::Cancelled);
        assert!(out.join("summary.csv").exists());
        assert!(matches!(
            terminal_events(&events).as_slice(),
            [ScanEvent::Cancelled { .. }]
        ));
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let events = EventLog::new();

        let result = SplitJob::new(dir.path().join("nope.pdf"), dir.path().join("out"), SplitConfig::default())
            .run_with(two_case_recognizer(), &events, &CancelFlag::new());

        assert!(matches!(result, Err(SplitError::InputNotFound(_))));
        assert!(!dir.path().join("out").exists());
        assert!(matches!(events.events().as_slice(), [ScanEvent::Error { .. }]));
    }

    #[test]
    fn test_unreadable_pdf_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.pdf");
        std::fs::write(&input, b"not a pdf").unwrap();
        let events = EventLog::new();

        let result = SplitJob::new(&input, dir.path().join("out"), SplitConfig::default())
            .run_with(two_case_recognizer(), &events, &CancelFlag::new());

        assert!(matches!(result, Err(SplitError::Pdf(_))));
        assert!(matches!(events.events().last(), Some(ScanEvent::Error { .. })));
        assert!(terminal_events(&events).is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pdf(dir.path(), &[0]);
        let mut config = SplitConfig::default();
        config.scan.dpi = 0;

        let result = SplitJob::new(&input, dir.path().join("out"), config)
            .run_with(two_case_recognizer(), &crate::scan::NoopSink, &CancelFlag::new());

        assert!(matches!(result, Err(SplitError::Config(_))));
    }

    #[test]
    fn test_report_serializes_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pdf(dir.path(), &[200, 0]);
        let out = dir.path().join("out");

        let report = SplitJob::new(&input, &out, SplitConfig::default())
            .run_with(two_case_recognizer(), &EventLog::new(), &CancelFlag::new())
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "completed");
        assert_eq!(json["chunks"][0]["label"], "I-66-2222.pdf");
    }
}
