//! Error Types
//!
//! `SearchError` is the only error a caller of the engine ever sees.
//! `CollaboratorError` is what index, store and embedding clients return;
//! strategies swallow it and degrade to an empty list.

use crate::embeddings::EmbeddingError;

#[cfg(feature = "sqlite")]
use crate::storage::StorageError;

/// Maximum query length in characters
pub const MAX_QUERY_CHARS: usize = 500;

/// Smallest page a caller may request
pub const MIN_LIMIT: usize = 1;

/// Largest page a caller may request
pub const MAX_LIMIT: usize = 50;

// ============================================================================
// SEARCH ERRORS
// ============================================================================

/// Validation and setup errors surfaced by [`crate::SearchEngine`]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Query was empty after trimming
    #[error("Query cannot be empty")]
    EmptyQuery,
    /// Query longer than [`MAX_QUERY_CHARS`]
    #[error("Query is {length} characters long, maximum is {max}")]
    QueryTooLong { length: usize, max: usize },
    /// Limit outside [`MIN_LIMIT`]..=[`MAX_LIMIT`]
    #[error("Limit {limit} is outside the allowed range {min}..={max}")]
    InvalidLimit { limit: usize, min: usize, max: usize },
    /// Configuration rejected at engine construction
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),
}

/// Engine result type
pub type Result<T> = std::result::Result<T, SearchError>;

// ============================================================================
// COLLABORATOR ERRORS
// ============================================================================

/// Failure reported by an external collaborator (index, store, embedder)
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// Service could not be reached or is not configured
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    /// Service answered with an error
    #[error("Backend error: {0}")]
    Backend(String),
    /// Embedding generation failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    /// SQLite adapter error
    #[cfg(feature = "sqlite")]
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
