//! Lexical Search
//!
//! Primary path delegates to a [`FullTextIndex`] and takes its ordering
//! as-is. When the index is missing, errors, or finds nothing, a weighted
//! token scan over the snapshot stands in.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use super::strategy::{
    rank_candidates, SearchStrategy, StrategyContext, StrategyKind, StrategyOutput,
};
use crate::document::CorpusSnapshot;
use crate::storage::FullTextIndex;

// ============================================================================
// TOKEN SCAN WEIGHTS
// ============================================================================

/// Points per token found in the title
pub const TITLE_TOKEN_SCORE: f64 = 3.0;

/// Points per token found in the summary
pub const SUMMARY_TOKEN_SCORE: f64 = 2.0;

/// Points per token found in the full text
pub const FULL_TEXT_TOKEN_SCORE: f64 = 1.0;

/// Points per token found inside the identifier
pub const IDENTIFIER_TOKEN_SCORE: f64 = 5.0;

/// Scan tokens must be strictly longer than this
const MIN_SCAN_TOKEN_LEN: usize = 2;

// ============================================================================
// TOKEN SCAN
// ============================================================================

/// Score every snapshot document by token presence
///
/// Returns at most `limit` `(id, score)` pairs with score > 0, ordered by
/// score, then most recent action date, then snapshot order.
pub fn token_scan(text: &str, snapshot: &CorpusSnapshot, limit: usize) -> Vec<(String, f64)> {
    let mut seen = HashSet::new();
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .filter(|t| t.chars().count() > MIN_SCAN_TOKEN_LEN)
        .filter(|t| seen.insert(t.clone()))
        .collect();

    if tokens.is_empty() || limit == 0 {
        return vec![];
    }

    let mut scored: Vec<(usize, f64)> = Vec::new();
    for (position, doc) in snapshot.iter().enumerate() {
        let title = doc.title.to_lowercase();
        let summary = doc.summary.to_lowercase();
        let full_text = doc.full_text.to_lowercase();
        let identifier = doc.identifier.to_lowercase();

        let score: f64 = tokens
            .iter()
            .map(|token| {
                let mut points = 0.0;
                if title.contains(token.as_str()) {
                    points += TITLE_TOKEN_SCORE;
                }
                if summary.contains(token.as_str()) {
                    points += SUMMARY_TOKEN_SCORE;
                }
                if full_text.contains(token.as_str()) {
                    points += FULL_TEXT_TOKEN_SCORE;
                }
                if identifier.contains(token.as_str()) {
                    points += IDENTIFIER_TOKEN_SCORE;
                }
                points
            })
            .sum();

        if score > 0.0 {
            scored.push((position, score));
        }
    }

    let docs: Vec<_> = snapshot.iter().collect();
    scored.sort_by(|&(pa, sa), &(pb, sb)| {
        sb.total_cmp(&sa)
            .then_with(|| docs[pb].last_action_date.cmp(&docs[pa].last_action_date))
            .then_with(|| pa.cmp(&pb))
    });
    scored.truncate(limit);

    scored
        .into_iter()
        .map(|(position, score)| (docs[position].id.clone(), score))
        .collect()
}

// ============================================================================
// STRATEGY
// ============================================================================

/// Full-text strategy with token-scan fallback
#[derive(Clone, Default)]
pub struct LexicalStrategy {
    index: Option<Arc<dyn FullTextIndex>>,
}

impl LexicalStrategy {
    pub fn new(index: Option<Arc<dyn FullTextIndex>>) -> Self {
        Self { index }
    }

    /// Whether a full-text index is configured
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Index hits restricted to the snapshot, first occurrence kept
    async fn from_index(
        &self,
        index: &dyn FullTextIndex,
        ctx: &StrategyContext,
    ) -> Result<Vec<(String, f64)>, String> {
        let hits = index
            .search(&ctx.query.text, ctx.limit)
            .await
            .map_err(|e| format!("full-text index failed: {}", e))?;

        let mut seen = HashSet::new();
        Ok(hits
            .into_iter()
            .filter(|(id, _)| ctx.snapshot.contains(id) && seen.insert(id.clone()))
            .take(ctx.limit)
            .collect())
    }
}

impl std::fmt::Debug for LexicalStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalStrategy")
            .field("has_index", &self.has_index())
            .finish()
    }
}

#[async_trait]
impl SearchStrategy for LexicalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lexical
    }

    async fn search(&self, ctx: &StrategyContext) -> StrategyOutput {
        let reason = match &self.index {
            Some(index) => match self.from_index(index.as_ref(), ctx).await {
                Ok(hits) if !hits.is_empty() => {
                    return StrategyOutput::completed(rank_candidates(hits));
                }
                Ok(_) => "full-text index returned no results".to_string(),
                Err(reason) => {
                    tracing::warn!(%reason, "lexical index unavailable, falling back to token scan");
                    reason
                }
            },
            None => "no full-text index configured".to_string(),
        };

        if ctx.cancel.is_cancelled() {
            return StrategyOutput::unavailable("cancelled");
        }

        let text = ctx.query.text.clone();
        let snapshot = Arc::clone(&ctx.snapshot);
        let limit = ctx.limit;
        match tokio::task::spawn_blocking(move || token_scan(&text, &snapshot, limit)).await {
            Ok(scored) => {
                tracing::debug!(candidates = scored.len(), %reason, "lexical token scan");
                StrategyOutput::degraded(rank_candidates(scored), reason)
            }
            Err(e) => {
                tracing::warn!(error = %e, "lexical token scan task failed");
                StrategyOutput::unavailable(format!("token scan failed: {}", e))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
