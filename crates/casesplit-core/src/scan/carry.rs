//! Identifiers carried across the pages of one chunk.

use crate::detect::Detection;

/// Identifiers seen without their counterpart, kept until the counterpart
/// turns up on a later page of the same chunk.
///
/// Once a field is carried it is never overwritten: later readings of the
/// same field are ignored until [`CarryState::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarryState {
    pending_case: Option<String>,
    pending_page_counter: Option<String>,
}

/// Identifiers known after folding in one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub case: Option<String>,
    pub page_counter: Option<String>,
}

impl CarryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_case(&self) -> bool {
        self.pending_case.is_some()
    }

    pub fn has_page_counter(&self) -> bool {
        self.pending_page_counter.is_some()
    }

    pub fn pending_case(&self) -> Option<&str> {
        self.pending_case.as_deref()
    }

    pub fn pending_page_counter(&self) -> Option<&str> {
        self.pending_page_counter.as_deref()
    }

    /// Fold one page's fresh detection into the carry and return what is
    /// now known for the chunk.
    pub fn absorb(&mut self, detection: Detection) -> Resolved {
        // Carried fields win over anything read on this page.
        let fresh_case = if self.has_case() { None } else { detection.case };
        let fresh_counter = if self.has_page_counter() {
            None
        } else {
            detection.page_counter
        };

        let resolved = Resolved {
            case: self.pending_case.clone().or_else(|| fresh_case.clone()),
            page_counter: self
                .pending_page_counter
                .clone()
                .or_else(|| fresh_counter.clone()),
        };

        match (fresh_case, fresh_counter) {
            (Some(case), None) => self.pending_case = Some(case),
            (None, Some(counter)) => self.pending_page_counter = Some(counter),
            _ => {}
        }

        resolved
    }

    /// Forget everything; called when a chunk is emitted.
    pub fn reset(&mut self) {
        self.pending_case = None;
        self.pending_page_counter = None;
    }
}
