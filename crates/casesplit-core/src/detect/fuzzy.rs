//! Fuzzy string similarity tolerant of OCR insertions and deletions.
//!
//! Scores are on a 0 - 100 scale. Each window is scored with the
//! normalized indel similarity `2 * LCS / (len_a + len_b)`;
//! [`partial_ratio`] slides the shorter string over the longer one and
//! keeps the best-aligning window.

/// Best similarity between the shorter string and any same-length window
/// of the longer one (0 - 100).
///
/// Windows that run past either end of the longer string are considered
/// too, so a needle that is only partly present still scores.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let n = short.len();
    let m = long.len();
    let mut best = 0.0f64;

    // Left edge: prefixes of `long` shorter than the needle.
    for end in 1..n.min(m) {
        best = best.max(ratio_chars(&short, &long[..end]));
    }

    // Full windows.
    for start in 0..=(m - n) {
        best = best.max(ratio_chars(&short, &long[start..start + n]));
        if best >= 100.0 {
            return 100.0;
        }
    }

    // Right edge: suffixes of `long` shorter than the needle.
    for start in (m - n + 1)..m {
        best = best.max(ratio_chars(&short, &long[start..]));
    }

    best
}

/// Indel similarity between two char slices (0 - 100).
fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Length of the longest common subsequence, single-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}
