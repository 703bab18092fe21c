//! # GovSearch Core
//!
//! Hybrid search and rank fusion engine for government documents (bills,
//! executive orders, presidential documents).
//!
//! - **Query preprocessing**: abbreviation expansion, identifier extraction
//!   ("H.R. 3684" → `HR-3684`), sponsor-name candidates, conversational
//!   query reduction
//! - **Lexical search**: FTS5/BM25 through a [`FullTextIndex`], with a
//!   weighted token scan when the index is missing or silent
//! - **Semantic search**: cosine similarity against stored document
//!   embeddings, query vectors from an injected [`EmbeddingProvider`]
//! - **Metadata search**: identifier and sponsor lookups
//! - **Weighted RRF**: rank fusion with title bonuses, confidence scoring
//!   and follow-up suggestions
//!
//! Strategies run concurrently, each under its own time budget. A failing
//! collaborator shrinks the result set; only request validation returns
//! an error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use govsearch_core::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let corpus = Arc::new(MemoryCorpus::with_documents(vec![Document::new(
//!     "hr3684-117",
//!     DocumentType::Bill,
//!     "HR-3684-117",
//!     "Infrastructure Investment and Jobs Act",
//! )]));
//!
//! let engine = SearchEngine::new(SearchConfig::from_env(), Collaborators::new(corpus))?;
//! let response = engine.search(&SearchRequest::new("H.R. 3684")).await?;
//!
//! for result in response.top_documents(5) {
//!     println!("{} {:.3}", result.document.identifier, result.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): SQLite corpus with FTS5 and embedding blobs
//! - `embeddings` (default): local query embeddings with fastembed
//! - `encryption`: SQLCipher-encrypted corpus (instead of `bundled-sqlite`)
//! - `metal`: Metal acceleration for fastembed on Apple Silicon

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod document;
pub mod embeddings;
pub mod engine;
pub mod error;
pub mod query;
pub mod search;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use config::{FusionConfig, PhraseBonusConfig, SearchConfig, SemanticConfig, StrategyWeights};

pub use document::{Chamber, CorpusSnapshot, Document, DocumentType, SearchFilters, Sponsor};

pub use engine::{
    Collaborators, SearchEngine, SearchMode, SearchRequest, SearchResponse, StrategyReport,
    StrategyStatus, DEFAULT_LIMIT,
};

pub use error::{CollaboratorError, SearchError, MAX_LIMIT, MAX_QUERY_CHARS, MIN_LIMIT};

pub use query::{ProcessedQuery, QueryPreprocessor};

pub use search::{FusedResult, RankFusion, ScoredCandidate, StrategyKind, FALLBACK_SUGGESTIONS};

pub use storage::{DocumentStore, FullTextIndex, MemoryCorpus, VectorStore};

#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub use storage::{SqliteCorpus, StorageError};

pub use embeddings::{cosine_similarity, Embedding, EmbeddingError, EmbeddingProvider};

#[cfg(feature = "embeddings")]
#[cfg_attr(docsrs, doc(cfg(feature = "embeddings")))]
pub use embeddings::FastembedProvider;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding model used by [`FastembedProvider`]
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-ai/nomic-embed-text-v1.5";

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Collaborators, Document, DocumentType, FusedResult, MemoryCorpus, SearchConfig,
        SearchEngine, SearchError, SearchFilters, SearchMode, SearchRequest, SearchResponse,
        Sponsor, StrategyKind,
    };

    pub use crate::{DocumentStore, EmbeddingProvider, FullTextIndex, VectorStore};

    #[cfg(feature = "sqlite")]
    pub use crate::SqliteCorpus;

    #[cfg(feature = "embeddings")]
    pub use crate::FastembedProvider;
}
