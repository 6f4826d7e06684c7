//! JSON-backed knowledge store with advisory topic-similarity queries.

use crate::error::KnowledgeError;
use crate::keywords::{extract_keywords, jaccard};
use crate::model::{
    ArticleMemory, ArticleRecord, SearchLog, SearchRecord, SearchResult, SimilarTopic, TopicCheck,
};
use chrono::{SecondsFormat, Utc};
use fs2::FileExt;
use log::{debug, error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Search records retained before the oldest are evicted.
const SEARCH_RETENTION: usize = 50;
/// Similar articles returned from a topic check.
const MAX_SIMILAR: usize = 3;
/// Default Jaccard threshold for calling a topic covered.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Which collections a reset truncates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// The web search log only.
    Search,
    /// The article memory only.
    Articles,
    /// Both documents.
    All,
}

/// Read-only aggregate over both documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeStats {
    pub search_count: usize,
    pub article_count: usize,
    pub topics_covered_count: usize,
    pub last_search_time: String,
    pub last_article_time: String,
}

/// Durable store for search and article history.
///
/// Both documents are rewritten whole on every mutation: load, mutate in
/// memory, write a temp file, rename it over the original. Each cycle holds
/// an exclusive lock on a sidecar file so concurrent processes serialize
/// their read-modify-write sections instead of losing updates.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    search_path: PathBuf,
    article_path: PathBuf,
    lock_path: PathBuf,
}

impl KnowledgeStore {
    /// Open (and if needed seed) the store under a project root.
    ///
    /// Creates `knowledge/` plus the `output/articles` and `output/posts`
    /// directories the crews write into.
    pub fn new(project_root: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let root = project_root.as_ref();
        let knowledge_dir = root.join("knowledge");
        fs::create_dir_all(&knowledge_dir)?;
        fs::create_dir_all(root.join("output").join("articles"))?;
        fs::create_dir_all(root.join("output").join("posts"))?;

        let store = Self {
            search_path: knowledge_dir.join("web_search_results.json"),
            article_path: knowledge_dir.join("article_memory.json"),
            lock_path: knowledge_dir.join(".knowledge.lock"),
        };
        store.seed_missing_documents()?;
        info!(
            "initialized knowledge store (dir={})",
            knowledge_dir.display()
        );
        Ok(store)
    }

    /// Record a search query and its results. Enforces the retention cap.
    pub fn record_search(&self, query: &str, results: &[SearchResult], topic: &str) -> bool {
        let locked = self.with_lock(|| {
            let mut log = self.load_document::<SearchLog>(&self.search_path);
            log.searches.push(SearchRecord {
                timestamp: now(),
                query: query.to_string(),
                topic: topic.to_string(),
                results_count: results.len(),
                results: results.to_vec(),
            });
            if log.searches.len() > SEARCH_RETENTION {
                let excess = log.searches.len() - SEARCH_RETENTION;
                log.searches.drain(..excess);
            }
            log.last_updated = now();
            self.write_document(&self.search_path, &log)
        });
        match locked {
            Ok(()) => {
                info!(
                    "stored web search results (query='{query}', results={})",
                    results.len()
                );
                true
            }
            Err(err) => {
                error!("failed to store web search results: {err}");
                false
            }
        }
    }

    /// Record a completed article, deriving its keyword set and updating the
    /// covered-topics projection.
    pub fn record_article(&self, topic: &str, article_path: &str, post_path: &str) -> bool {
        let locked = self.with_lock(|| {
            let mut memory = self.load_document::<ArticleMemory>(&self.article_path);
            memory.articles.push(ArticleRecord {
                timestamp: now(),
                topic: topic.to_string(),
                topic_keywords: extract_keywords(topic),
                article_path: article_path.to_string(),
                post_path: post_path.to_string(),
                status: "completed".to_string(),
            });

            let topic_lower = topic.trim().to_lowercase();
            let already_covered = memory
                .topics_covered
                .iter()
                .any(|covered| covered.to_lowercase() == topic_lower);
            if !already_covered {
                memory.topics_covered.push(topic_lower);
            }

            memory.last_updated = now();
            self.write_document(&self.article_path, &memory)
        });
        match locked {
            Ok(()) => {
                info!("stored article memory (topic='{topic}')");
                true
            }
            Err(err) => {
                error!("failed to store article memory: {err}");
                false
            }
        }
    }

    /// Check whether a candidate topic overlaps previously written articles.
    ///
    /// Keyword-overlap Jaccard scoring, not semantic similarity; word forms
    /// must match exactly. Never fails: an unreadable store behaves as empty.
    pub fn check_similarity(&self, topic: &str, threshold: f64) -> TopicCheck {
        let memory = match self.with_lock(|| Ok(self.load_document::<ArticleMemory>(&self.article_path)))
        {
            Ok(memory) => memory,
            Err(err) => {
                error!("failed to check topic coverage: {err}");
                return TopicCheck {
                    covered: false,
                    similar_articles: Vec::new(),
                    recommendation: "Error checking coverage - proceeding with caution".to_string(),
                };
            }
        };

        if memory.articles.is_empty() {
            return TopicCheck {
                covered: false,
                similar_articles: Vec::new(),
                recommendation: "No previous articles found - topic is fresh!".to_string(),
            };
        }

        let candidate_keywords = extract_keywords(topic);
        let candidate: HashSet<&str> = candidate_keywords.iter().map(String::as_str).collect();

        let mut similar_articles = Vec::new();
        for article in &memory.articles {
            let stored: HashSet<&str> = article.topic_keywords.iter().map(String::as_str).collect();
            let similarity = jaccard(&candidate, &stored);
            if similarity >= threshold {
                similar_articles.push(SimilarTopic {
                    topic: article.topic.clone(),
                    similarity: (similarity * 100.0).round() / 100.0,
                    timestamp: article.timestamp.clone(),
                    article_path: article.article_path.clone(),
                });
            }
        }
        similar_articles.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        let covered = !similar_articles.is_empty();
        let match_count = similar_articles.len();
        similar_articles.truncate(MAX_SIMILAR);
        debug!(
            "topic coverage check (topic='{topic}', threshold={threshold}, matches={match_count})"
        );

        let recommendation = if covered {
            format!(
                "Topic may be too similar to {match_count} previous article(s). Consider a different angle or more specific focus."
            )
        } else {
            "Topic appears fresh and unique - good to proceed!".to_string()
        };
        TopicCheck {
            covered,
            similar_articles,
            recommendation,
        }
    }

    /// Truncate the named collections back to their seeded state. Idempotent.
    pub fn reset(&self, scope: ResetScope) -> bool {
        let locked = self.with_lock(|| {
            if matches!(scope, ResetScope::Search | ResetScope::All) {
                self.write_document(&self.search_path, &seeded_search_log())?;
            }
            if matches!(scope, ResetScope::Articles | ResetScope::All) {
                self.write_document(&self.article_path, &seeded_article_memory())?;
            }
            Ok(())
        });
        match locked {
            Ok(()) => {
                info!("knowledge reset completed (scope={scope:?})");
                true
            }
            Err(err) => {
                error!("knowledge reset failed (scope={scope:?}): {err}");
                false
            }
        }
    }

    /// Aggregate counts and last-write times across both documents.
    pub fn stats(&self) -> KnowledgeStats {
        let (log, memory) = match self.with_lock(|| {
            Ok((
                self.load_document::<SearchLog>(&self.search_path),
                self.load_document::<ArticleMemory>(&self.article_path),
            ))
        }) {
            Ok(documents) => documents,
            Err(err) => {
                error!("failed to read knowledge stats: {err}");
                (SearchLog::default(), ArticleMemory::default())
            }
        };
        KnowledgeStats {
            search_count: log.searches.len(),
            article_count: memory.articles.len(),
            topics_covered_count: memory.topics_covered.len(),
            last_search_time: or_never(log.last_updated),
            last_article_time: or_never(memory.last_updated),
        }
    }

    /// Seed either document when it does not exist yet.
    fn seed_missing_documents(&self) -> Result<(), KnowledgeError> {
        let _guard = self.lock_file()?;
        if !self.search_path.exists() {
            self.write_document(&self.search_path, &seeded_search_log())?;
        }
        if !self.article_path.exists() {
            self.write_document(&self.article_path, &seeded_article_memory())?;
        }
        Ok(())
    }

    /// Run a read-modify-write section under the exclusive sidecar lock.
    fn with_lock<T>(
        &self,
        section: impl FnOnce() -> Result<T, KnowledgeError>,
    ) -> Result<T, KnowledgeError> {
        let guard = self.lock_file()?;
        let result = section();
        let _ = FileExt::unlock(&guard);
        result
    }

    fn lock_file(&self) -> Result<File, KnowledgeError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.lock_path)?;
        file.lock_exclusive()?;
        Ok(file)
    }

    /// Load a document, treating a missing or corrupt file as empty.
    fn load_document<T: DeserializeOwned + Default>(&self, path: &Path) -> T {
        if !path.exists() {
            return T::default();
        }
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("failed to read {}: {err}", path.display());
                return T::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(err) => {
                warn!(
                    "failed to parse {}; treating as empty store: {err}",
                    path.display()
                );
                T::default()
            }
        }
    }

    /// Atomically replace a document: write a temp file, rename it over.
    fn write_document<T: Serialize>(&self, path: &Path, document: &T) -> Result<(), KnowledgeError> {
        let temp_path = path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(document)?;
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

// Fixed microsecond precision keeps timestamp strings ordered when compared
// lexicographically.
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn or_never(last_updated: String) -> String {
    if last_updated.is_empty() {
        "Never".to_string()
    } else {
        last_updated
    }
}

fn seeded_search_log() -> SearchLog {
    SearchLog {
        last_updated: now(),
        ..SearchLog::default()
    }
}

fn seeded_article_memory() -> ArticleMemory {
    ArticleMemory {
        last_updated: now(),
        ..ArticleMemory::default()
    }
}
