//! Case-number normalization.

use super::patterns::CASE_NUMBER_CHARS;

/// Prefix of every normalized case id.
pub const CASE_ID_PREFIX: &str = "I-";

/// Canonicalize a noisy case-number line.
///
/// Keeps only digits, `I`, `l` and `-`, maps `I`/`l` to `1`, drops any
/// leading `1-` runs (a misread colon before the number), then builds the
/// id from the `-` separated segments: the last three characters of the
/// first segment, the first three of every middle segment and the whole
/// last segment.
///
/// Input without any usable segment yields the bare prefix `"I-"`.
pub fn normalize_case_number(raw: &str) -> String {
    let kept: String = CASE_NUMBER_CHARS
        .find_iter(raw)
        .map(|m| m.as_str())
        .collect::<String>()
        .replace(['I', 'l'], "1");

    let trimmed = kept.trim_start_matches("1-");

    let segments: Vec<&str> = trimmed.split('-').filter(|s| !s.is_empty()).collect();

    let Some((first, rest)) = segments.split_first() else {
        return CASE_ID_PREFIX.to_string();
    };

    let mut parts: Vec<&str> = Vec::with_capacity(segments.len());
    parts.push(tail(first, 3));

    if let Some((last, middle)) = rest.split_last() {
        parts.extend(middle.iter().map(|seg| head(seg, 3)));
        parts.push(last);
    }

    format!("{}{}", CASE_ID_PREFIX, parts.join("-"))
}

// Segments only contain ASCII digits at this point, so byte slicing is safe.
fn tail(s: &str, n: usize) -> &str {
    &s[s.len().saturating_sub(n)..]
}

fn head(s: &str, n: usize) -> &str {
    &s[..s.len().min(n)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_segments() {
        assert_eq!(normalize_case_number("CASE NUMBER: 123-4567-89"), "I-123-456-89");
    }

    #[test]
    fn test_two_segments() {
        assert_eq!(normalize_case_number("Case Number: 55-1111"), "I-55-1111");
    }

    #[test]
    fn test_first_segment_keeps_last_three() {
        assert_eq!(normalize_case_number("Case Number: 20231234-77"), "I-234-77");
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(normalize_case_number("Case Number: 98765"), "I-765");
    }

    #[test]
    fn test_ocr_confusions_map_to_one() {
        // 'I' and 'l' read for '1'
        assert_eq!(normalize_case_number("Case Number: I23-45l-9"), "I-123-451-9");
    }

    #[test]
    fn test_misread_colon_prefix_is_dropped() {
        assert_eq!(normalize_case_number("Case Number l-123-4567-89"), "I-123-456-89");
        assert_eq!(normalize_case_number("1-1-55-1111"), "I-55-1111");
    }

    #[test]
    fn test_empty_segments_ignored() {
        assert_eq!(normalize_case_number("Case Number: 123--4567---89-"), "I-123-456-89");
    }

    #[test]
    fn test_no_segments_is_bare_prefix() {
        assert_eq!(normalize_case_number("Case Number:"), "I-");
        assert_eq!(normalize_case_number("---"), "I-");
        assert_eq!(normalize_case_number(""), "I-");
    }
}
