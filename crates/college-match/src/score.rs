//! Similarity scoring for the manual fuzzy passes.
//!
//! Blends token-set overlap (Jaccard) with character edit distance
//! (Levenshtein) and penalizes pairs of very different length.

use std::collections::HashSet;

use rapidfuzz::distance::levenshtein;

use college_normalization::normalize_name;

const TOKEN_WEIGHT: f64 = 0.6;
const CHAR_WEIGHT: f64 = 0.4;
/// Length ratios above this are not penalized.
const LENGTH_RATIO_FLOOR: f64 = 0.7;

/// Similarity of two raw names in `[0, 1]`. Both inputs are normalized first.
///
/// ```
/// use college_match::similarity;
///
/// assert_eq!(similarity("Govt. Medical College", "GOVERNMENT MEDICAL COLLEGE"), 1.0);
/// assert!(similarity("GOVERNMENT MEDICAL COLLEGE", "ARMY DENTAL CORPS") < 0.5);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_normalized(&normalize_name(a), &normalize_name(b))
}

/// Similarity of two names that are already normalized.
pub fn similarity_normalized(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let token_similarity = jaccard(a, b);

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let longest = len_a.max(len_b);
    let shortest = len_a.min(len_b);
    if longest == 0 {
        return 1.0;
    }

    let distance = levenshtein::distance(a.chars(), b.chars());
    let char_similarity = 1.0 - distance as f64 / longest as f64;

    let blended = TOKEN_WEIGHT * token_similarity + CHAR_WEIGHT * char_similarity;
    let ratio = shortest as f64 / longest as f64;
    if ratio > LENGTH_RATIO_FLOOR {
        blended
    } else {
        blended * ratio
    }
}

/// Jaccard index of the space-separated word sets.
fn jaccard(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<&str> = a.split(' ').filter(|t| !t.is_empty()).collect();
    let tokens_b: HashSet<&str> = b.split(' ').filter(|t| !t.is_empty()).collect();
    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return 0.0;
    }
    tokens_a.intersection(&tokens_b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn identical_after_normalization_scores_one() {
        assert_eq!(similarity("Govt Dental Coll.", "GOVERNMENT DENTAL COLLEGE"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn blends_tokens_and_characters() {
        // 3 of 4 tokens shared; edit distance 7 over 33 characters.
        let expected = 0.6 * 0.75 + 0.4 * (1.0 - 7.0 / 33.0);
        assert_close(
            similarity_normalized(
                "GOVERNMENT MEDICAL COLLEGE",
                "GOVERNMENT MEDICAL COLLEGE MYSORE",
            ),
            expected,
        );
    }

    #[test]
    fn penalizes_large_length_difference() {
        // No shared tokens, distance 7 over 10, length ratio 0.3.
        let expected = (0.4 * 0.3) * 0.3;
        assert_close(similarity_normalized("ABC", "ABCDEFGHIJ"), expected);
    }

    #[test]
    fn empty_against_non_empty_scores_zero() {
        assert_eq!(similarity_normalized("", "MEDICAL COLLEGE"), 0.0);
    }

    #[test]
    fn jaccard_ignores_duplicates() {
        assert_close(jaccard("A A B", "A B"), 1.0);
        assert_close(jaccard("A B", "C D"), 0.0);
    }
}
