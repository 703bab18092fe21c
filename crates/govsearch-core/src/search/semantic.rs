//! Semantic Search
//!
//! Embeds the processed query once, then scans every snapshot document's
//! stored embedding with cosine similarity. Linear in corpus size; the scan
//! runs on the blocking pool and checks the cancel flag as it goes.

use async_trait::async_trait;
use std::sync::Arc;

use super::strategy::{
    rank_candidates, CancelFlag, SearchStrategy, StrategyContext, StrategyKind, StrategyOutput,
};
use crate::config::DEFAULT_MIN_SIMILARITY;
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::storage::VectorStore;

/// Documents scored between cancellation checks
const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Rank stored embeddings against a query vector
///
/// Keeps similarities `>= min_similarity` (non-finite values are dropped),
/// sorts descending with input order breaking ties, and truncates to
/// `limit`. Returns `None` if cancelled mid-scan.
pub fn rank_by_similarity(
    query: &[f32],
    embeddings: Vec<(String, Vec<f32>)>,
    min_similarity: f32,
    limit: usize,
    cancel: &CancelFlag,
) -> Option<Vec<(String, f64)>> {
    let mut scored: Vec<(String, f64)> = Vec::new();

    for (i, (id, vector)) in embeddings.into_iter().enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            return None;
        }

        let similarity = cosine_similarity(query, &vector);
        if similarity.is_finite() && similarity >= min_similarity {
            scored.push((id, similarity as f64));
        }
    }

    // sort_by is stable, so equal similarities keep snapshot order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    Some(scored)
}

/// Embedding similarity strategy
///
/// Without both an embedding provider and a vector store it returns an
/// empty list on every call.
#[derive(Clone)]
pub struct SemanticStrategy {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    vectors: Option<Arc<dyn VectorStore>>,
    min_similarity: f32,
}

impl Default for SemanticStrategy {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_MIN_SIMILARITY)
    }
}

impl SemanticStrategy {
    pub fn new(
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        vectors: Option<Arc<dyn VectorStore>>,
        min_similarity: f32,
    ) -> Self {
        Self {
            embedder,
            vectors,
            min_similarity,
        }
    }

    /// Both collaborators are configured
    pub fn is_enabled(&self) -> bool {
        self.embedder.is_some() && self.vectors.is_some()
    }
}

impl std::fmt::Debug for SemanticStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticStrategy")
            .field("model", &self.embedder.as_ref().map(|e| e.model_name().to_string()))
            .field("has_vectors", &self.vectors.is_some())
            .field("min_similarity", &self.min_similarity)
            .finish()
    }
}

#[async_trait]
impl SearchStrategy for SemanticStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Semantic
    }

    async fn search(&self, ctx: &StrategyContext) -> StrategyOutput {
        let (Some(embedder), Some(vectors)) = (&self.embedder, &self.vectors) else {
            return StrategyOutput::unavailable("semantic search not configured");
        };

        let query_vector = match embedder.embed(&ctx.query.text).await {
            Ok(v) if !v.is_empty() => v,
            Ok(_) => return StrategyOutput::unavailable("embedding provider returned an empty vector"),
            Err(e) => {
                tracing::warn!(error = %e, "query embedding failed");
                return StrategyOutput::unavailable(format!("embedding failed: {}", e));
            }
        };

        if ctx.cancel.is_cancelled() {
            return StrategyOutput::unavailable("cancelled");
        }

        let embeddings = match vectors.embeddings_for(&ctx.snapshot.ids()).await {
            Ok(embeddings) => embeddings,
            Err(e) => {
                tracing::warn!(error = %e, "vector store unavailable");
                return StrategyOutput::unavailable(format!("vector store failed: {}", e));
            }
        };

        let scanned = embeddings.len();
        let min_similarity = self.min_similarity;
        let limit = ctx.limit;
        let cancel = ctx.cancel.clone();
        let ranked = tokio::task::spawn_blocking(move || {
            rank_by_similarity(&query_vector, embeddings, min_similarity, limit, &cancel)
        })
        .await;

        match ranked {
            Ok(Some(scored)) => {
                tracing::debug!(scanned, kept = scored.len(), "semantic scan");
                StrategyOutput::completed(rank_candidates(scored))
            }
            Ok(None) => StrategyOutput::unavailable("cancelled"),
            Err(e) => {
                tracing::warn!(error = %e, "similarity scan task failed");
                StrategyOutput::unavailable(format!("similarity scan failed: {}", e))
            }
        }
    }
}
