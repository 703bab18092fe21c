//! Storage Module
//!
//! Collaborator contracts the engine reads from, plus two corpora that
//! implement them:
//! - [`MemoryCorpus`]: copy-on-write in-memory corpus (no full-text index)
//! - [`SqliteCorpus`]: SQLite with an FTS5 index and embedding blobs
//!   (feature `sqlite`)

mod memory;

#[cfg(feature = "sqlite")]
mod migrations;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryCorpus;

#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub use migrations::{Migration, MIGRATIONS};
#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub use sqlite::{fts5_match_expression, SqliteCorpus, StorageError};

use async_trait::async_trait;
use std::sync::Arc;

use crate::document::{CorpusSnapshot, Document};
use crate::error::CollaboratorError;

// ============================================================================
// COLLABORATOR CONTRACTS
// ============================================================================

/// Full-text index over title, summary, body and identifier
#[async_trait]
pub trait FullTextIndex: Send + Sync {
    /// Ranked `(document_id, score)` pairs, best first
    async fn search(&self, text: &str, limit: usize) -> Result<Vec<(String, f64)>, CollaboratorError>;
}

/// Read access to documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document
    async fn get(&self, id: &str) -> Result<Option<Arc<Document>>, CollaboratorError>;

    /// Consistent view of the whole corpus, taken once per request
    async fn snapshot(&self) -> Result<Arc<CorpusSnapshot>, CollaboratorError>;
}

/// Precomputed document embeddings
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embedding for one document, `None` if it was never embedded
    async fn get_embedding(&self, id: &str) -> Result<Option<Vec<f32>>, CollaboratorError>;

    /// Embeddings for many documents, in the order of `ids`
    ///
    /// Documents without an embedding are skipped.
    async fn embeddings_for(&self, ids: &[String]) -> Result<Vec<(String, Vec<f32>)>, CollaboratorError> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(vector) = self.get_embedding(id).await? {
                out.push((id.clone(), vector));
            }
        }
        Ok(out)
    }
}
