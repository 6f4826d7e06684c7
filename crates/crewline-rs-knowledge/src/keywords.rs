//! Keyword extraction and set similarity for topic matching.
//!
//! Deliberately stemming-free: "Migration" and "Migrating" are distinct
//! tokens, so near-duplicate topics with different word forms score lower
//! than an embedding-based check would report. Callers rely on this exact
//! heuristic.

use regex::Regex;
use std::collections::HashSet;

/// Tokens dropped during extraction.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "how",
    "what", "when", "where", "why",
];

/// Maximum keywords kept per topic.
const MAX_KEYWORDS: usize = 10;

/// Extract up to ten keywords from a topic, in original order.
///
/// Lowercases the input, takes maximal alphabetic runs, and drops tokens of
/// length two or less along with the stop-word set.
pub fn extract_keywords(topic: &str) -> Vec<String> {
    let Ok(word) = Regex::new(r"[a-zA-Z]+") else {
        return Vec::new();
    };
    word.find_iter(&topic.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|token| token.len() > 2 && !STOP_WORDS.contains(&token.as_str()))
        .take(MAX_KEYWORDS)
        .collect()
}

/// Jaccard index of two keyword sets; 0 when either set is empty.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extraction_lowercases_and_drops_stop_words() {
        let keywords = extract_keywords("How to Migrate a Database to Kubernetes");
        assert_eq!(keywords, vec!["migrate", "database", "kubernetes"]);
    }

    #[test]
    fn extraction_drops_short_tokens_and_digits() {
        let keywords = extract_keywords("Go 1.22 vs C++ 20: API design");
        // "go" and "vs" are too short; digits never form tokens.
        assert_eq!(keywords, vec!["api", "design"]);
    }

    #[test]
    fn extraction_caps_at_ten_keywords() {
        let topic = "alpha bravo charlie delta echo foxtrot golf hotel india juliett kilo lima";
        let keywords = extract_keywords(topic);
        assert_eq!(keywords.len(), 10);
        assert_eq!(keywords.first().map(String::as_str), Some("alpha"));
        assert_eq!(keywords.last().map(String::as_str), Some("juliett"));
    }

    /// Word forms are not stemmed; this is load-bearing for similarity.
    #[test]
    fn extraction_keeps_distinct_word_forms() {
        assert_eq!(extract_keywords("Migration"), vec!["migration"]);
        assert_eq!(extract_keywords("Migrating"), vec!["migrating"]);
    }

    #[test]
    fn jaccard_of_overlapping_sets() {
        let a: HashSet<&str> = ["kubernetes", "saga", "pattern"].into_iter().collect();
        let b: HashSet<&str> = ["kubernetes", "saga", "retry"].into_iter().collect();
        assert_eq!(jaccard(&a, &b), 0.5);
    }

    #[test]
    fn jaccard_treats_empty_sets_as_zero() {
        let empty = HashSet::new();
        let a: HashSet<&str> = ["kubernetes"].into_iter().collect();
        assert_eq!(jaccard(&empty, &a), 0.0);
        assert_eq!(jaccard(&a, &empty), 0.0);
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }
}
