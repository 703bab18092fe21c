//! In-memory corpus
//!
//! Documents and embeddings are published together as one immutable
//! state. Writers build the next state and swap it in; readers
//! clone the current `Arc`. An in-flight search keeps its state alive and
//! never observes a partial write.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{DocumentStore, VectorStore};
use crate::document::{CorpusSnapshot, Document};
use crate::error::CollaboratorError;

type EmbeddingMap = HashMap<String, Arc<Vec<f32>>>;

/// One published version of the corpus
#[derive(Debug, Default)]
struct CorpusState {
    snapshot: Arc<CorpusSnapshot>,
    embeddings: Arc<EmbeddingMap>,
}

/// Copy-on-write document store and vector store
///
/// Has no full-text index, so the lexical strategy runs its token scan
/// against it.
#[derive(Debug, Default)]
pub struct MemoryCorpus {
    state: RwLock<Arc<CorpusState>>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Corpus seeded with documents
    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            state: RwLock::new(Arc::new(CorpusState {
                snapshot: Arc::new(CorpusSnapshot::new(documents)),
                embeddings: Arc::new(HashMap::new()),
            })),
        }
    }

    fn state(&self) -> Result<Arc<CorpusState>, CollaboratorError> {
        self.state
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| CollaboratorError::Backend("Corpus lock poisoned".into()))
    }

    /// Build the next state from the current one and publish it
    fn publish(
        &self,
        next: impl FnOnce(&CorpusState) -> CorpusState,
    ) -> Result<(), CollaboratorError> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| CollaboratorError::Backend("Corpus lock poisoned".into()))?;
        *guard = Arc::new(next(&**guard));
        Ok(())
    }

    /// Add or replace documents, publishing a new snapshot
    pub fn insert_documents(
        &self,
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<(), CollaboratorError> {
        self.publish(|current| CorpusState {
            snapshot: Arc::new(current.snapshot.extended(documents)),
            embeddings: Arc::clone(&current.embeddings),
        })
    }

    /// Store a document embedding
    pub fn insert_embedding(
        &self,
        id: impl Into<String>,
        vector: Vec<f32>,
    ) -> Result<(), CollaboratorError> {
        let id = id.into();
        self.publish(|current| {
            let mut embeddings = EmbeddingMap::clone(&current.embeddings);
            embeddings.insert(id, Arc::new(vector));
            CorpusState {
                snapshot: Arc::clone(&current.snapshot),
                embeddings: Arc::new(embeddings),
            }
        })
    }

    /// Add documents and their embeddings in one published state
    ///
    /// Readers see either none of the batch or all of it.
    pub fn insert_embedded_documents(
        &self,
        batch: impl IntoIterator<Item = (Document, Vec<f32>)>,
    ) -> Result<(), CollaboratorError> {
        let (documents, vectors): (Vec<Document>, Vec<(String, Arc<Vec<f32>>)>) = batch
            .into_iter()
            .map(|(doc, vector)| {
                let id = doc.id.clone();
                (doc, (id, Arc::new(vector)))
            })
            .unzip();

        self.publish(|current| {
            let mut embeddings = EmbeddingMap::clone(&current.embeddings);
            embeddings.extend(vectors);
            CorpusState {
                snapshot: Arc::new(current.snapshot.extended(documents)),
                embeddings: Arc::new(embeddings),
            }
        })
    }

    /// Current snapshot
    pub fn current(&self) -> Result<Arc<CorpusSnapshot>, CollaboratorError> {
        self.state().map(|state| Arc::clone(&state.snapshot))
    }

    pub fn len(&self) -> usize {
        self.current().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryCorpus {
    async fn get(&self, id: &str) -> Result<Option<Arc<Document>>, CollaboratorError> {
        Ok(self.current()?.get(id).cloned())
    }

    async fn snapshot(&self) -> Result<Arc<CorpusSnapshot>, CollaboratorError> {
        self.current()
    }
}

#[async_trait]
impl VectorStore for MemoryCorpus {
    async fn get_embedding(&self, id: &str) -> Result<Option<Vec<f32>>, CollaboratorError> {
        let state = self.state()?;
        Ok(state.embeddings.get(id).map(|v| v.as_ref().clone()))
    }

    /// Vectors all read from one published state
    async fn embeddings_for(&self, ids: &[String]) -> Result<Vec<(String, Vec<f32>)>, CollaboratorError> {
        let state = self.state()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.embeddings.get(id).map(|v| (id.clone(), v.as_ref().clone())))
            .collect())
    }
}
