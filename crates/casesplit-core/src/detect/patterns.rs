//! Regex patterns for footer text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Page 3 of 12", "pg 1 of I" ('I' is a frequent misread of '1')
    pub static ref PAGE_COUNTER_LINE: Regex = Regex::new(
        r"(?i)(page|pg)\s*[0-9I]+\s*of\s*[0-9I]+"
    ).unwrap();

    // Numbers of an already cleaned counter
    pub static ref COUNTER_NUMBERS: Regex = Regex::new(
        r"([0-9]+)\s*of\s*([0-9]+)"
    ).unwrap();

    // Characters a case number can be built from after OCR
    pub static ref CASE_NUMBER_CHARS: Regex = Regex::new(
        r"[\dIl-]+"
    ).unwrap();
}

/// Phrase a case-number line is scored against.
pub const CASE_NUMBER_PHRASE: &str = "case number:";

/// Canonical phrase a page-counter line is scored against.
pub const PAGE_COUNTER_PHRASE: &str = "page x of y";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_counter_line() {
        assert!(PAGE_COUNTER_LINE.is_match("Page 2 of 10"));
        assert!(PAGE_COUNTER_LINE.is_match("PG I of 3"));
        assert!(PAGE_COUNTER_LINE.is_match("page1of2"));
        assert!(!PAGE_COUNTER_LINE.is_match("Page two of ten"));
        assert!(!PAGE_COUNTER_LINE.is_match("Case Number: 12-345"));
    }

    #[test]
    fn test_counter_numbers() {
        let caps = COUNTER_NUMBERS.captures("page 3 of 12").unwrap();
        assert_eq!(&caps[1], "3");
        assert_eq!(&caps[2], "12");
    }
}
