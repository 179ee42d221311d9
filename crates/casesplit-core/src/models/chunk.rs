//! Page ranges assigned to one output sub-document.

use serde::{Deserialize, Serialize};

/// A contiguous inclusive page range with its output label.
///
/// Pages are 0-based. A chunk is created once when a boundary resolves
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// First page of the chunk (inclusive).
    pub start_page: usize,
    /// Last page of the chunk (inclusive).
    pub end_page: usize,
    /// Output file name, extension included.
    pub label: String,
}

impl Chunk {
    pub fn new(start_page: usize, end_page: usize, label: impl Into<String>) -> Self {
        Self {
            start_page,
            end_page,
            label: label.into(),
        }
    }

    /// Number of pages covered.
    pub fn page_count(&self) -> usize {
        self.end_page + 1 - self.start_page
    }

    /// Label for a chunk: the normalized case id plus extension, or a
    /// page-range placeholder when no case id was read.
    ///
    /// `end_exclusive` is the 0-based exclusive end, which equals the
    /// 1-based inclusive last page.
    pub fn label_for(
        case_id: Option<&str>,
        extension: &str,
        start_page: usize,
        end_exclusive: usize,
    ) -> String {
        match case_id {
            Some(id) => format!("{}{}", id, extension),
            None => format!(
                "Unknown_pages_{}-{}{}",
                start_page + 1,
                end_exclusive,
                extension
            ),
        }
    }
}
