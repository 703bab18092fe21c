//! Strategy contract
//!
//! Every retrieval strategy answers `search(query, limit) -> ranked list`
//! and degrades to an empty list on its own. Collaborator failures are
//! logged and reported, never returned.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::document::CorpusSnapshot;
use crate::query::ProcessedQuery;

// ============================================================================
// STRATEGY KIND
// ============================================================================

/// The three retrieval strategies, in fusion priority order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Lexical,
    Semantic,
    Metadata,
}

impl StrategyKind {
    /// All strategies in priority order
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Lexical,
        StrategyKind::Semantic,
        StrategyKind::Metadata,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Lexical => "lexical",
            StrategyKind::Semantic => "semantic",
            StrategyKind::Metadata => "metadata",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CANDIDATES
// ============================================================================

/// One strategy's opinion of one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub document_id: String,
    /// Strategy-local score, comparable only within the same list
    pub score: f64,
    /// 0-indexed position in the strategy's list
    pub rank: usize,
}

/// Turn a sorted `(id, score)` list into ranked candidates
pub fn rank_candidates(scored: impl IntoIterator<Item = (String, f64)>) -> Vec<ScoredCandidate> {
    scored
        .into_iter()
        .enumerate()
        .map(|(rank, (document_id, score))| ScoredCandidate {
            document_id,
            score,
            rank,
        })
        .collect()
}

/// A strategy's ranked list plus how it was produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyOutput {
    pub candidates: Vec<ScoredCandidate>,
    /// Set when the strategy fell back or could not reach a collaborator
    pub degradation: Option<String>,
}

impl StrategyOutput {
    pub fn completed(candidates: Vec<ScoredCandidate>) -> Self {
        Self {
            candidates,
            degradation: None,
        }
    }

    pub fn degraded(candidates: Vec<ScoredCandidate>, reason: impl Into<String>) -> Self {
        Self {
            candidates,
            degradation: Some(reason.into()),
        }
    }

    /// Empty list with a reason
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::degraded(Vec::new(), reason)
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Cooperative cancellation flag shared between the engine and a strategy
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything a strategy needs for one request
#[derive(Debug, Clone)]
pub struct StrategyContext {
    pub query: Arc<ProcessedQuery>,
    /// Consistent corpus view, already narrowed by request filters
    pub snapshot: Arc<CorpusSnapshot>,
    /// Candidate limit L
    pub limit: usize,
    pub cancel: CancelFlag,
}

// ============================================================================
// STRATEGY TRAIT
// ============================================================================

/// A retrieval strategy
///
/// Implementations must only return documents present in the context's
/// snapshot, ranked from 0 without gaps, and must never panic on
/// collaborator failure.
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn search(&self, ctx: &StrategyContext) -> StrategyOutput;
}
