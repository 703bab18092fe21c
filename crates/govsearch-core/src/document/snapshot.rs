//! Consistent-read corpus snapshot
//!
//! One snapshot is taken per request and shared (behind `Arc`) by every
//! strategy and by fusion, so all of them see the same documents even if
//! ingestion publishes a newer corpus mid-request.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Document, SearchFilters};

/// Immutable, ordered view of the corpus
///
/// Insertion order is the "snapshot order" used as the last deterministic
/// tie-break by the lexical fallback scan.
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    documents: Vec<Arc<Document>>,
    positions: HashMap<String, usize>,
}

impl CorpusSnapshot {
    /// Build a snapshot; later duplicates of an id are ignored
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        Self::from_shared(documents.into_iter().map(Arc::new))
    }

    /// Build a snapshot from already shared documents
    pub fn from_shared(documents: impl IntoIterator<Item = Arc<Document>>) -> Self {
        let mut snapshot = Self::default();
        for doc in documents {
            if snapshot.positions.contains_key(&doc.id) {
                tracing::warn!(id = %doc.id, "duplicate document id in snapshot, keeping first");
                continue;
            }
            snapshot
                .positions
                .insert(doc.id.clone(), snapshot.documents.len());
            snapshot.documents.push(doc);
        }
        snapshot
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Document>> {
        self.positions.get(id).map(|&i| &self.documents[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Position of a document in snapshot order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.iter()
    }

    /// Ids in snapshot order
    pub fn ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }

    /// Narrow the snapshot to documents passing `filters`
    ///
    /// Documents are shared, not cloned.
    pub fn filtered(&self, filters: &SearchFilters) -> CorpusSnapshot {
        Self::from_shared(
            self.documents
                .iter()
                .filter(|doc| filters.matches(doc))
                .cloned(),
        )
    }

    /// Append documents, producing a new snapshot and leaving `self` untouched
    pub fn extended(&self, documents: impl IntoIterator<Item = Document>) -> CorpusSnapshot {
        let mut by_id: HashMap<String, Arc<Document>> = HashMap::new();
        let mut order: Vec<String> = self.documents.iter().map(|d| d.id.clone()).collect();
        for doc in &self.documents {
            by_id.insert(doc.id.clone(), Arc::clone(doc));
        }
        for doc in documents {
            if !by_id.contains_key(&doc.id) {
                order.push(doc.id.clone());
            }
            // Re-ingesting an id replaces the record in place
            by_id.insert(doc.id.clone(), Arc::new(doc));
        }
        Self::from_shared(order.into_iter().filter_map(|id| by_id.remove(&id)))
    }
}
