//! Case-number and page-counter detection over recognized footer lines.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::fuzzy::partial_ratio;
use super::patterns::{CASE_NUMBER_PHRASE, COUNTER_NUMBERS, PAGE_COUNTER_LINE, PAGE_COUNTER_PHRASE};

/// Raw identifiers read from one page. Recomputed for every page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Raw case-number line.
    pub case: Option<String>,
    /// Cleaned page-counter line, e.g. `"page 2 of 10"`.
    ///
    /// Always lowercase with `I` mapped to `1`; [`parse_counter`] only
    /// matches a lowercase "of".
    pub page_counter: Option<String>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.case.is_none() && self.page_counter.is_none()
    }
}

/// "N of M" numbers of a page counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCounter {
    /// Position of the page within its sub-document (N).
    pub position: usize,
    /// Declared length of the sub-document (M).
    pub total: usize,
}

impl PageCounter {
    /// Pages left in the sub-document after the current one.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.position)
    }
}

/// Parse the "N of M" part of a counter string.
///
/// Returns `None` when the pattern is absent or a number does not fit.
pub fn parse_counter(counter: &str) -> Option<PageCounter> {
    let caps = COUNTER_NUMBERS.captures(counter)?;
    let position = caps[1].parse().ok()?;
    let total = caps[2].parse().ok()?;
    Some(PageCounter { position, total })
}

/// Fuzzy detector for the case-number and page-counter footer lines.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierDetector {
    case_threshold: f64,
    counter_threshold: f64,
}

impl IdentifierDetector {
    /// Create a detector with the default threshold of 70 for both fields.
    pub fn new() -> Self {
        Self {
            case_threshold: 70.0,
            counter_threshold: 70.0,
        }
    }

    /// Set the minimum score for case-number lines.
    pub fn with_case_threshold(mut self, threshold: u8) -> Self {
        self.case_threshold = f64::from(threshold);
        self
    }

    /// Set the minimum score for page-counter lines.
    pub fn with_counter_threshold(mut self, threshold: u8) -> Self {
        self.counter_threshold = f64::from(threshold);
        self
    }

    /// Pick the line that best resembles "case number:".
    ///
    /// The first line wins ties. The returned line is trimmed but otherwise
    /// untouched; see [`super::normalize_case_number`].
    pub fn detect_case<S: AsRef<str>>(&self, lines: &[S]) -> Option<String> {
        let mut best: Option<(f64, &str)> = None;

        for line in lines.iter().map(AsRef::as_ref) {
            let score = partial_ratio(&line.to_lowercase(), CASE_NUMBER_PHRASE);
            trace!("case score {:.1} for {:?}", score, line);

            if score >= self.case_threshold && best.is_none_or(|(s, _)| score > s) {
                best = Some((score, line));
            }
        }

        best.map(|(_, line)| line.trim().to_string())
    }

    /// Pick the "page N of M" line that best resembles "page x of y".
    ///
    /// Only lines matching the counter pattern are scored. The winner has
    /// every `I` replaced by `1` and is returned trimmed and lowercased.
    pub fn detect_page_counter<S: AsRef<str>>(&self, lines: &[S]) -> Option<String> {
        let mut best: Option<(f64, &str)> = None;

        for line in lines.iter().map(AsRef::as_ref) {
            if !PAGE_COUNTER_LINE.is_match(line) {
                continue;
            }

            let score = partial_ratio(&line.to_lowercase(), PAGE_COUNTER_PHRASE);
            trace!("counter score {:.1} for {:?}", score, line);

            if score >= self.counter_threshold && best.is_none_or(|(s, _)| score > s) {
                best = Some((score, line));
            }
        }

        best.map(|(_, line)| line.replace('I', "1").trim().to_lowercase())
    }

    /// Run both detections, skipping any field already known.
    pub fn detect<S: AsRef<str>>(
        &self,
        case_lines: &[S],
        counter_lines: &[S],
        skip_case: bool,
        skip_counter: bool,
    ) -> Detection {
        Detection {
            case: if skip_case { None } else { self.detect_case(case_lines) },
            page_counter: if skip_counter {
                None
            } else {
                self.detect_page_counter(counter_lines)
            },
        }
    }
}

impl Default for IdentifierDetector {
    fn default() -> Self {
        Self::new()
    }
}
