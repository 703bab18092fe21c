//! Mock Providers
//!
//! Deterministic stand-ins for the engine's external collaborators:
//! - A bag-of-words embedding provider (no model download)
//! - Providers and indexes that fail or stall on demand

use async_trait::async_trait;
use govsearch_core::{CollaboratorError, Document, EmbeddingProvider, FullTextIndex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Dimensions of mock embeddings
pub const MOCK_DIMENSIONS: usize = 128;

/// Words that carry no topic
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "act", "bill", "of", "on", "to", "in",
];

// ============================================================================
// BAG-OF-WORDS EMBEDDINGS
// ============================================================================

/// Hashes each content word into one of [`MOCK_DIMENSIONS`] buckets
///
/// Same text, same vector; texts sharing words have positive similarity.
#[derive(Debug, Clone, Default)]
pub struct MockEmbeddingProvider;

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &'static str {
        "mock-bag-of-words"
    }

    /// Embedding for arbitrary text
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; MOCK_DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .filter(|w| w.len() > 2 && !STOPWORDS.contains(&w.as_str()))
        {
            vector[bucket(&word)] += 1.0;
        }
        vector
    }

    /// Embedding stored for a document (title and summary)
    pub fn document_vector(&self, doc: &Document) -> Vec<f32> {
        self.vector_for(&format!("{} {}", doc.title, doc.summary))
    }
}

/// FNV-1a over the word's bytes
fn bucket(word: &str) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in word.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    (hash % MOCK_DIMENSIONS as u64) as usize
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        Ok(self.vector_for(text))
    }

    fn model_name(&self) -> &str {
        self.name()
    }
}

// ============================================================================
// FAILURE MODES
// ============================================================================

/// Embedding provider that is always unreachable
#[derive(Debug, Clone, Default)]
pub struct FailingEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, CollaboratorError> {
        Err(CollaboratorError::Unavailable(
            "embedding service unreachable".to_string(),
        ))
    }
}

/// Embedding provider that sleeps before answering
///
/// Counts calls and completed embeddings, so tests can tell whether an
/// abandoned call ran to the end.
#[derive(Debug, Clone)]
pub struct SlowEmbeddingProvider {
    delay: Duration,
    inner: MockEmbeddingProvider,
    calls: Arc<AtomicUsize>,
    completions: Arc<AtomicUsize>,
}

impl SlowEmbeddingProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: MockEmbeddingProvider::new(),
            calls: Arc::new(AtomicUsize::new(0)),
            completions: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for SlowEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.completions.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }
}

/// Full-text index that always errors
#[derive(Debug, Clone, Default)]
pub struct FailingFullTextIndex;

#[async_trait]
impl FullTextIndex for FailingFullTextIndex {
    async fn search(&self, _text: &str, _limit: usize) -> Result<Vec<(String, f64)>, CollaboratorError> {
        Err(CollaboratorError::Backend("fts index corrupted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govsearch_core::cosine_similarity;

    #[test]
    fn test_mock_embeddings_are_deterministic() {
        let provider = MockEmbeddingProvider::new();
        assert_eq!(provider.vector_for("rural broadband"), provider.vector_for("rural broadband"));
    }

    #[test]
    fn test_shared_words_are_similar() {
        let provider = MockEmbeddingProvider::new();
        let a = provider.vector_for("veterans burn pits");
        let b = provider.vector_for("benefits for veterans exposed to burn pits");
        assert!(cosine_similarity(&a, &b) > 0.5);
    }
}
