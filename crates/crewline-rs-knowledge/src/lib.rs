//! Search and article knowledge tracking for content crews.
//!
//! Two JSON documents record past web searches and completed article topics;
//! a keyword-overlap similarity query flags topic repetition before a new
//! piece is written. The store is an advisory cache: write failures are
//! logged and reported as `false`, never raised.

mod error;
mod keywords;
mod model;
mod store;

/// Knowledge error type (internal to store operations).
pub use error::KnowledgeError;
/// Keyword extraction and set similarity.
pub use keywords::{extract_keywords, jaccard};
/// Persisted document and record models.
pub use model::{
    ArticleMemory, ArticleRecord, SearchLog, SearchRecord, SearchResult, SimilarTopic, TopicCheck,
};
/// The JSON-backed store.
pub use store::{DEFAULT_SIMILARITY_THRESHOLD, KnowledgeStats, KnowledgeStore, ResetScope};
