//! Footer identifier detection: fuzzy scoring, case numbers and page counters.

pub mod detector;
pub mod fuzzy;
pub mod normalize;
pub mod patterns;

pub use detector::{Detection, IdentifierDetector, PageCounter, parse_counter};
pub use fuzzy::partial_ratio;
pub use normalize::normalize_case_number;
