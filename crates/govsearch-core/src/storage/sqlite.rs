//! SQLite Corpus
//!
//! Document store, FTS5 full-text index and embedding store in one
//! database file. Uses separate reader/writer connections so ingestion
//! never blocks behind a long search query.

use async_trait::async_trait;
use chrono::NaiveDate;
use directories::ProjectDirs;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{DocumentStore, FullTextIndex, VectorStore};
use crate::document::{Chamber, CorpusSnapshot, Document, DocumentType, Sponsor};
use crate::embeddings::Embedding;
use crate::error::CollaboratorError;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Metadata (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
type Result<T> = std::result::Result<T, StorageError>;

const DOCUMENT_COLUMNS: &str = "id, document_type, identifier, title, summary, full_text, status, \
     chamber, introduced_date, last_action_date, sponsor_name, sponsor_party, sponsor_state, \
     sponsor_bioguide_id, metadata";

// ============================================================================
// SQLITE CORPUS
// ============================================================================

struct Connections {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    /// Last snapshot built, tagged with the reader's `data_version`
    snapshot: Mutex<Option<(i64, Arc<CorpusSnapshot>)>>,
}

/// SQLite-backed corpus
///
/// Cheap to clone; clones share the same connections. All methods take
/// `&self`.
#[derive(Clone)]
pub struct SqliteCorpus {
    inner: Arc<Connections>,
}

impl SqliteCorpus {
    /// Apply PRAGMAs and optional encryption to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        // Apply encryption key if SQLCipher is enabled and key is provided
        #[cfg(feature = "encryption")]
        {
            if let Ok(key) = std::env::var("GOVSEARCH_ENCRYPTION_KEY") {
                if !key.is_empty() {
                    conn.pragma_update(None, "key", &key)?;
                }
            }
        }

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;
             PRAGMA mmap_size = 268435456;",
        )?;

        Ok(())
    }

    /// Open (or create) a corpus database
    ///
    /// `None` uses the platform data directory.
    pub fn open(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("org", "govsearch", "core").ok_or_else(|| {
                    StorageError::Init("Could not determine project directories".to_string())
                })?;
                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                data_dir.join("govsearch.db")
            }
        };

        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        let applied = super::migrations::apply_migrations(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        tracing::info!(path = %path.display(), migrations = applied, "sqlite corpus opened");

        Ok(Self {
            inner: Arc::new(Connections {
                writer: Mutex::new(writer_conn),
                reader: Mutex::new(reader_conn),
                snapshot: Mutex::new(None),
            }),
        })
    }

    fn writer(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.inner
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))
    }

    fn reader(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.inner
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))
    }

    // ------------------------------------------------------------------------
    // Writes (ingestion side)
    // ------------------------------------------------------------------------

    /// Insert or replace documents in one transaction
    pub fn upsert_documents(&self, documents: &[Document]) -> Result<usize> {
        let mut writer = self.writer()?;
        let tx = writer.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (id, document_type, identifier, title, summary, full_text,
                     status, chamber, introduced_date, last_action_date, sponsor_name,
                     sponsor_party, sponsor_state, sponsor_bioguide_id, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                 ON CONFLICT(id) DO UPDATE SET
                     document_type = excluded.document_type,
                     identifier = excluded.identifier,
                     title = excluded.title,
                     summary = excluded.summary,
                     full_text = excluded.full_text,
                     status = excluded.status,
                     chamber = excluded.chamber,
                     introduced_date = excluded.introduced_date,
                     last_action_date = excluded.last_action_date,
                     sponsor_name = excluded.sponsor_name,
                     sponsor_party = excluded.sponsor_party,
                     sponsor_state = excluded.sponsor_state,
                     sponsor_bioguide_id = excluded.sponsor_bioguide_id,
                     metadata = excluded.metadata",
            )?;

            for doc in documents {
                let sponsor = doc.sponsor.clone().unwrap_or_default();
                let metadata = serde_json::to_string(&doc.metadata)?;
                stmt.execute(params![
                    doc.id,
                    doc.document_type.as_str(),
                    doc.identifier,
                    doc.title,
                    doc.summary,
                    doc.full_text,
                    doc.status,
                    doc.chamber.map(|c| c.as_str()),
                    doc.introduced_date,
                    doc.last_action_date,
                    sponsor.name,
                    sponsor.party,
                    sponsor.state,
                    sponsor.bioguide_id,
                    metadata,
                ])?;
            }
        }
        tx.commit()?;
        Ok(documents.len())
    }

    /// Insert or replace a single document
    pub fn upsert_document(&self, document: &Document) -> Result<()> {
        self.upsert_documents(std::slice::from_ref(document))
            .map(|_| ())
    }

    /// Store a document embedding
    pub fn put_embedding(&self, document_id: &str, vector: &[f32], model: &str) -> Result<()> {
        let bytes = Embedding::new(vector.to_vec()).to_bytes();
        let writer = self.writer()?;
        let updated = writer.execute(
            "INSERT INTO document_embeddings (document_id, embedding, dimensions, model)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(document_id) DO UPDATE SET
                 embedding = excluded.embedding,
                 dimensions = excluded.dimensions,
                 model = excluded.model,
                 created_at = datetime('now')",
            params![document_id, bytes, vector.len() as i64, model],
        );

        match updated {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::NotFound(document_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a document (its embedding cascades)
    pub fn delete_document(&self, id: &str) -> Result<bool> {
        let writer = self.writer()?;
        let rows = writer.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn document_count(&self) -> Result<usize> {
        let reader = self.reader()?;
        let count: i64 = reader.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Fetch one document
    pub fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"
        ))?;
        Ok(stmt.query_row(params![id], Self::row_to_document).optional()?)
    }

    /// All documents in insertion order
    pub fn load_documents(&self) -> Result<Vec<Document>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY rowid"
        ))?;
        let documents = stmt
            .query_map([], Self::row_to_document)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(documents)
    }

    /// Snapshot of every stored document
    ///
    /// Rebuilt only after another connection (the writer included) has
    /// committed since the last build; otherwise the cached snapshot is
    /// shared.
    pub fn current_snapshot(&self) -> Result<Arc<CorpusSnapshot>> {
        let mut cached = self
            .inner
            .snapshot
            .lock()
            .map_err(|_| StorageError::Init("Snapshot lock poisoned".into()))?;

        let reader = self.reader()?;
        // Read before loading: a commit in between only forces one extra rebuild
        let version: i64 = reader.query_row("PRAGMA data_version", [], |row| row.get(0))?;
        if let Some((_, snapshot)) = cached.as_ref().filter(|(built, _)| *built == version) {
            return Ok(Arc::clone(snapshot));
        }

        let mut stmt = reader.prepare_cached(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY rowid"
        ))?;
        let documents = stmt
            .query_map([], Self::row_to_document)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let snapshot = Arc::new(CorpusSnapshot::new(documents));

        tracing::debug!(data_version = version, documents = snapshot.len(), "corpus snapshot rebuilt");
        *cached = Some((version, Arc::clone(&snapshot)));
        Ok(snapshot)
    }

    /// FTS5 search weighted like the token scan (title 3, summary 2, text 1, identifier 5)
    pub fn full_text_search(&self, text: &str, limit: usize) -> Result<Vec<(String, f64)>> {
        let Some(expression) = fts5_match_expression(text) else {
            return Ok(vec![]);
        };

        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT d.id, bm25(documents_fts, 3.0, 2.0, 1.0, 5.0) AS rank
             FROM documents_fts
             JOIN documents d ON d.rowid = documents_fts.rowid
             WHERE documents_fts MATCH ?1
             ORDER BY rank, d.rowid
             LIMIT ?2",
        )?;

        let results = stmt
            .query_map(params![expression, limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            // bm25 is negative, lower is better
            .map(|(id, rank)| (id, (-rank).max(0.0)))
            .collect();

        Ok(results)
    }

    /// Embedding vector for one document
    pub fn get_document_embedding(&self, document_id: &str) -> Result<Option<Vec<f32>>> {
        let reader = self.reader()?;
        let mut stmt =
            reader.prepare("SELECT embedding FROM document_embeddings WHERE document_id = ?1")?;

        let bytes: Option<Vec<u8>> = stmt
            .query_row(params![document_id], |row| row.get(0))
            .optional()?;

        Ok(bytes.and_then(|b| Embedding::from_bytes(&b).map(|e| e.vector)))
    }

    /// Embeddings for `ids`, in that order; ids without one are skipped
    pub fn document_embeddings(&self, ids: &[String]) -> Result<Vec<(String, Vec<f32>)>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare("SELECT document_id, embedding FROM document_embeddings")?;

        let mut by_id: HashMap<String, Vec<f32>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;
        for row in rows {
            let (id, bytes) = row?;
            match Embedding::from_bytes(&bytes) {
                Some(embedding) => {
                    by_id.insert(id, embedding.vector);
                }
                None => tracing::warn!(id = %id, "skipping malformed embedding blob"),
            }
        }

        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id).map(|v| (id.clone(), v)))
            .collect())
    }

    fn row_to_document(row: &rusqlite::Row) -> rusqlite::Result<Document> {
        let document_type: String = row.get(1)?;
        let document_type: DocumentType = document_type
            .parse()
            .map_err(|e: String| conversion_error(1, e))?;

        let chamber: Option<String> = row.get(7)?;
        let chamber = chamber
            .map(|c| c.parse::<Chamber>())
            .transpose()
            .map_err(|e| conversion_error(7, e))?;

        let sponsor = Sponsor {
            name: row.get(10)?,
            party: row.get(11)?,
            state: row.get(12)?,
            bioguide_id: row.get(13)?,
        };
        let sponsor = (sponsor != Sponsor::default()).then_some(sponsor);

        let metadata: String = row.get(14)?;
        let metadata: BTreeMap<String, serde_json::Value> = serde_json::from_str(&metadata)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(14, Type::Text, Box::new(e)))?;

        Ok(Document {
            id: row.get(0)?,
            document_type,
            identifier: row.get(2)?,
            title: row.get(3)?,
            summary: row.get(4)?,
            full_text: row.get(5)?,
            status: row.get(6)?,
            chamber,
            introduced_date: row.get::<_, Option<NaiveDate>>(8)?,
            last_action_date: row.get::<_, Option<NaiveDate>>(9)?,
            sponsor,
            metadata,
        })
    }

    /// Run a blocking storage call on tokio's blocking pool
    async fn blocking<T, F>(&self, f: F) -> std::result::Result<T, CollaboratorError>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteCorpus) -> Result<T> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || f(&this))
            .await
            .map_err(|e| CollaboratorError::Unavailable(format!("storage task failed: {}", e)))?
            .map_err(CollaboratorError::from)
    }
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}

/// Reduce free text to an FTS5 expression of quoted terms joined with OR
///
/// Returns `None` when the text has no alphanumeric terms.
pub fn fts5_match_expression(text: &str) -> Option<String> {
    let terms: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{}\"", t.to_lowercase()))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

// ============================================================================
// COLLABORATOR IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl FullTextIndex for SqliteCorpus {
    async fn search(&self, text: &str, limit: usize) -> std::result::Result<Vec<(String, f64)>, CollaboratorError> {
        let text = text.to_string();
        self.blocking(move |corpus| corpus.full_text_search(&text, limit))
            .await
    }
}

#[async_trait]
impl DocumentStore for SqliteCorpus {
    async fn get(&self, id: &str) -> std::result::Result<Option<Arc<Document>>, CollaboratorError> {
        let id = id.to_string();
        self.blocking(move |corpus| corpus.get_document(&id))
            .await
            .map(|doc| doc.map(Arc::new))
    }

    async fn snapshot(&self) -> std::result::Result<Arc<CorpusSnapshot>, CollaboratorError> {
        self.blocking(|corpus| corpus.current_snapshot()).await
    }
}

#[async_trait]
impl VectorStore for SqliteCorpus {
    async fn get_embedding(&self, id: &str) -> std::result::Result<Option<Vec<f32>>, CollaboratorError> {
        let id = id.to_string();
        self.blocking(move |corpus| corpus.get_document_embedding(&id))
            .await
    }

    async fn embeddings_for(
        &self,
        ids: &[String],
    ) -> std::result::Result<Vec<(String, Vec<f32>)>, CollaboratorError> {
        let ids = ids.to_vec();
        self.blocking(move |corpus| corpus.document_embeddings(&ids))
            .await
    }
}

// ============================================================================
// TESTS
// ============================================================================
