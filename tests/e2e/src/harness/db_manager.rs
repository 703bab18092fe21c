//! Test Database Manager
//!
//! Provides isolated SQLite corpora for testing:
//! - Temporary databases that are automatically cleaned up
//! - Pre-seeded corpora with documents and embeddings
//! - Corpus snapshots and restoration
//! - Engines wired to the database as every collaborator

use govsearch_core::{Collaborators, Document, SearchConfig, SearchEngine, SqliteCorpus};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::mocks::MockEmbeddingProvider;

/// Manager for test databases
///
/// Creates an isolated corpus per test to prevent interference.
/// Automatically cleans up temporary databases when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabaseManager::new_temp();
/// db.seed_documents(&TestDataFactory::legislative_corpus());
///
/// let engine = db.engine(SearchConfig::default());
/// // Database is automatically deleted when `db` goes out of scope
/// ```
pub struct TestDatabaseManager {
    /// The corpus instance
    pub corpus: Arc<SqliteCorpus>,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: Option<TempDir>,
    /// Path to the database file
    db_path: PathBuf,
    /// Snapshot data for restore operations
    snapshot: Option<Vec<Document>>,
}

impl TestDatabaseManager {
    /// Create a new test database in a temporary directory
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_govsearch.db");

        let corpus = SqliteCorpus::open(Some(db_path.clone())).expect("Failed to open test corpus");

        Self {
            corpus: Arc::new(corpus),
            _temp_dir: Some(temp_dir),
            db_path,
            snapshot: None,
        }
    }

    /// Create a test database at a specific path
    ///
    /// The database is NOT automatically deleted.
    pub fn new_at_path(path: PathBuf) -> Self {
        let corpus = SqliteCorpus::open(Some(path.clone())).expect("Failed to open test corpus");

        Self {
            corpus: Arc::new(corpus),
            _temp_dir: None,
            db_path: path,
            snapshot: None,
        }
    }

    /// Get the database path
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Check if the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.document_count() == 0
    }

    /// Number of stored documents
    pub fn document_count(&self) -> usize {
        self.corpus.document_count().unwrap_or(0)
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Store documents, returning how many were written
    pub fn seed_documents(&self, documents: &[Document]) -> usize {
        self.corpus
            .upsert_documents(documents)
            .expect("Failed to seed documents")
    }

    /// Embed every stored document with the mock provider
    pub fn seed_embeddings(&self, provider: &MockEmbeddingProvider) -> usize {
        let documents = self.corpus.load_documents().expect("Failed to load documents");
        for doc in &documents {
            let vector = provider.document_vector(doc);
            self.corpus
                .put_embedding(&doc.id, &vector, provider.name())
                .expect("Failed to store embedding");
        }
        documents.len()
    }

    // ========================================================================
    // ENGINES
    // ========================================================================

    /// Engine using this database for documents and full-text search only
    pub fn engine(&self, config: SearchConfig) -> SearchEngine {
        let collaborators =
            Collaborators::new(self.corpus.clone()).with_full_text(self.corpus.clone());
        SearchEngine::new(config, collaborators).expect("Failed to build engine")
    }

    /// Engine using this database for every collaborator, plus an embedder
    pub fn engine_with_embeddings(
        &self,
        config: SearchConfig,
        embedder: Arc<dyn govsearch_core::EmbeddingProvider>,
    ) -> SearchEngine {
        let collaborators = Collaborators::new(self.corpus.clone())
            .with_full_text(self.corpus.clone())
            .with_embeddings(embedder, self.corpus.clone());
        SearchEngine::new(config, collaborators).expect("Failed to build engine")
    }

    // ========================================================================
    // SNAPSHOT / RESTORE
    // ========================================================================

    /// Remember the current documents
    pub fn take_snapshot(&mut self) {
        self.snapshot = Some(self.corpus.load_documents().expect("Failed to load documents"));
    }

    /// Put the remembered documents back, removing anything added since
    pub fn restore_snapshot(&mut self) -> bool {
        let Some(saved) = self.snapshot.clone() else {
            return false;
        };

        let current = self.corpus.load_documents().expect("Failed to load documents");
        for doc in current {
            if !saved.iter().any(|s| s.id == doc.id) {
                let _ = self.corpus.delete_document(&doc.id);
            }
        }
        self.corpus
            .upsert_documents(&saved)
            .expect("Failed to restore documents");
        true
    }
}
