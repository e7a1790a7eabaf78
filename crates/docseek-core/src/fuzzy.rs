//! Bounded edit distance for typo-tolerant term matching.

/// Edit distance between `a` and `b` if it is at most `max`.
///
/// Two early exits keep the common miss cheap: the length difference is a
/// lower bound on the distance, and once every cell of a DP row exceeds
/// `max` no later row can come back under it.
///
/// ```rust
/// use docseek_core::fuzzy::bounded_levenshtein;
///
/// assert_eq!(bounded_levenshtein("routing", "ruoting", 2), Some(2));
/// assert_eq!(bounded_levenshtein("routing", "router", 1), None);
/// ```
pub fn bounded_levenshtein(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ac) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];

        for (j, bc) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ac != bc);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
            row_min = row_min.min(row[j + 1]);
        }

        if row_min > max {
            return None;
        }
    }

    let distance = row[b.len()];
    (distance <= max).then_some(distance)
}

/// Maximum edits allowed for a query term under a fuzzy setting.
///
/// Fractions below `1.0` scale with the term length (rounded, capped at
/// six edits); larger values are an absolute edit count.
pub fn max_edits(term_len: usize, fuzzy: f64) -> usize {
    if !fuzzy.is_finite() || fuzzy <= 0.0 {
        return 0;
    }
    if fuzzy < 1.0 {
        let scaled = (term_len as f64 * fuzzy).round() as usize;
        scaled.min(MAX_FRACTIONAL_EDITS)
    } else {
        fuzzy as usize
    }
}

const MAX_FRACTIONAL_EDITS: usize = 6;
