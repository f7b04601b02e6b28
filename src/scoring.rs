//! String similarity scorers on a 0–100 scale.
//!
//! The default is the token-sort ratio: both strings have their whitespace
//! separated tokens sorted before an indel similarity is computed, so word
//! order does not matter ("123 Main St" and "Main St 123" score 100).
//! Abbreviations ("St" vs "Street") still cost points.

use serde::{Deserialize, Serialize};

/// Highest possible score.
pub const PERFECT_SCORE: f64 = 100.0;

/// Compares a query string against one candidate.
pub trait Scorer: Send + Sync {
    /// Similarity of `query` and `candidate`, from 0 (unrelated) to 100 (equal).
    fn score(&self, query: &str, candidate: &str) -> f64;
}

impl<F> Scorer for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn score(&self, query: &str, candidate: &str) -> f64 {
        self(query, candidate)
    }
}

/// Built-in scorers selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Indel similarity of the token-sorted strings.
    #[default]
    TokenSortRatio,
    /// Indel similarity of the strings as given.
    Ratio,
    /// Normalized Levenshtein similarity of the token-sorted strings.
    TokenSortLevenshtein,
    /// Jaro-Winkler similarity of the token-sorted strings.
    JaroWinkler,
}

impl Scorer for ScorerKind {
    fn score(&self, query: &str, candidate: &str) -> f64 {
        match self {
            Self::TokenSortRatio => token_sort_ratio(query, candidate),
            Self::Ratio => ratio(query, candidate),
            Self::TokenSortLevenshtein => {
                PERFECT_SCORE * strsim::normalized_levenshtein(&sort_tokens(query), &sort_tokens(candidate))
            }
            Self::JaroWinkler => {
                PERFECT_SCORE * strsim::jaro_winkler(&sort_tokens(query), &sort_tokens(candidate))
            }
        }
    }
}

/// Normalized indel similarity: `100 * 2 * LCS / (len_a + len_b)` over chars.
///
/// This is the same normalized indel similarity as rapidfuzz's `fuzz.ratio`.
/// Two empty strings are identical and score 100.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return PERFECT_SCORE;
    }
    #[allow(clippy::cast_precision_loss)]
    let score = PERFECT_SCORE * (2 * lcs_len(&a, &b)) as f64 / total as f64;
    score
}

/// `ratio` after sorting the whitespace-separated tokens of each string.
#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sort_tokens(a), &sort_tokens(b))
}

/// Tokens sorted and joined by single spaces.
#[must_use]
pub fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_identical() {
        assert!(close(ratio("456 Oak Ave", "456 Oak Ave"), 100.0));
    }

    #[test]
    fn test_ratio_disjoint() {
        assert!(close(ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_ratio_partial() {
        // LCS("abcd", "abed") = 3, so 2 * 3 / 8.
        assert!(close(ratio("abcd", "abed"), 75.0));
    }

    #[test]
    fn test_ratio_matches_indel_reference_value() {
        // One insertion: LCS 14 over 14 + 15 chars.
        assert!(close(ratio("this is a test", "this is a test!"), 2800.0 / 29.0));
    }

    #[test]
    fn test_ratio_empty_strings() {
        assert!(close(ratio("", ""), 100.0));
        assert!(close(ratio("", "1 Main St"), 0.0));
    }

    #[test]
    fn test_token_sort_ignores_order() {
        assert!(close(token_sort_ratio("123 Main St", "Main St 123"), 100.0));
        assert!(ratio("123 Main St", "Main St 123") < 100.0);
    }

    #[test]
    fn test_token_sort_collapses_whitespace() {
        assert!(close(token_sort_ratio("12  Elm   St", " Elm St 12 "), 100.0));
    }

    #[test]
    fn test_token_sort_is_case_sensitive() {
        assert!(token_sort_ratio("123 MAIN ST", "123 Main St") < 100.0);
    }

    #[test]
    fn test_sort_tokens() {
        assert_eq!(sort_tokens("St Main 123"), "123 Main St");
    }

    #[test]
    fn test_scorer_kinds_range() {
        for kind in [
            ScorerKind::TokenSortRatio,
            ScorerKind::Ratio,
            ScorerKind::TokenSortLevenshtein,
            ScorerKind::JaroWinkler,
        ] {
            assert!(close(kind.score("4120 Lee Ave", "4120 Lee Ave"), 100.0), "{kind:?}");
            let partial = kind.score("4120 Lee Ave", "4102 Lea Av");
            assert!((0.0..100.0).contains(&partial), "{kind:?} scored {partial}");
        }
    }

    #[test]
    fn test_closure_is_a_scorer() {
        let fixed = |_: &str, _: &str| 42.0;
        assert!(close(fixed.score("a", "b"), 42.0));
    }

    #[test]
    fn test_scorer_kind_serde_names() {
        let kind: ScorerKind = serde_json::from_str("\"token_sort_levenshtein\"").unwrap();
        assert_eq!(kind, ScorerKind::TokenSortLevenshtein);
        assert_eq!(serde_json::to_string(&ScorerKind::default()).unwrap(), "\"token_sort_ratio\"");
    }
}
