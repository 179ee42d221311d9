//! Per-run summary of emitted chunks.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::chunk::Chunk;
use crate::error::SummaryError;

/// Column headers of the summary table.
pub const SUMMARY_HEADERS: [&str; 3] = [
    "PDF File Generated Name",
    "PDF Start Location",
    "PDF End Location",
];

/// One row of the summary table. Page bounds are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "PDF File Generated Name")]
    pub filename: String,
    #[serde(rename = "PDF Start Location")]
    pub start_page: usize,
    #[serde(rename = "PDF End Location")]
    pub end_page: usize,
}

impl From<&Chunk> for SummaryRow {
    fn from(chunk: &Chunk) -> Self {
        Self {
            filename: chunk.label.clone(),
            start_page: chunk.start_page + 1,
            end_page: chunk.end_page + 1,
        }
    }
}

/// Append-only collection of summary rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryRecorder {
    rows: Vec<SummaryRow>,
}

impl SummaryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully written chunk.
    pub fn record(&mut self, chunk: &Chunk) {
        self.rows.push(SummaryRow::from(chunk));
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as CSV into any writer.
    pub fn write_to<W: std::io::Write>(&self, writer: W) -> Result<(), SummaryError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        // Headers are written explicitly so an empty run still gets them.
        wtr.write_record(SUMMARY_HEADERS)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write the table as a CSV file.
    pub fn write_csv(&self, path: &Path) -> Result<(), SummaryError> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)?;
        info!("Summary saved to: {}", path.display());
        Ok(())
    }
}
