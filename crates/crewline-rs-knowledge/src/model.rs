//! Persisted knowledge document models.
//!
//! Field names and nesting match the on-disk JSON produced by earlier
//! deployments, so existing `web_search_results.json` and
//! `article_memory.json` files round-trip unchanged.

use serde::{Deserialize, Serialize};

/// One result row from a web search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    /// Result snippet; some search backends emit this as `body`.
    #[serde(default, alias = "body")]
    pub snippet: String,
    /// Result URL; some search backends emit this as `href`.
    #[serde(default, alias = "href")]
    pub link: String,
}

/// One recorded search query with its results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchRecord {
    pub timestamp: String,
    pub query: String,
    #[serde(default)]
    pub topic: String,
    pub results_count: usize,
    pub results: Vec<SearchResult>,
}

/// The `web_search_results.json` document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchLog {
    #[serde(default)]
    pub searches: Vec<SearchRecord>,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub description: String,
}

impl Default for SearchLog {
    fn default() -> Self {
        Self {
            searches: Vec::new(),
            last_updated: String::new(),
            description: "Web search results storage for the crew knowledge system".to_string(),
        }
    }
}

/// One completed content-generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArticleRecord {
    pub timestamp: String,
    pub topic: String,
    #[serde(default)]
    pub topic_keywords: Vec<String>,
    #[serde(default)]
    pub article_path: String,
    #[serde(default)]
    pub post_path: String,
    #[serde(default)]
    pub status: String,
}

/// The `article_memory.json` document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleMemory {
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
    /// Deduplicated, lowercased projection of article topics.
    #[serde(default)]
    pub topics_covered: Vec<String>,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub description: String,
}

impl Default for ArticleMemory {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            topics_covered: Vec::new(),
            last_updated: String::new(),
            description: "Article memory tracking to prevent topic repetition".to_string(),
        }
    }
}

/// One stored article judged similar to a candidate topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarTopic {
    pub topic: String,
    /// Jaccard score over keyword sets, rounded to two decimals.
    pub similarity: f64,
    pub timestamp: String,
    pub article_path: String,
}

/// Result of a topic-repetition advisory query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicCheck {
    /// True when at least one stored article clears the threshold.
    pub covered: bool,
    /// Top matches, descending by similarity (at most three).
    pub similar_articles: Vec<SimilarTopic>,
    pub recommendation: String,
}
