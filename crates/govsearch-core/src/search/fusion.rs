//! Rank Fusion (Weighted RRF + Title Bonus)
//!
//! Merges the strategies' ranked lists with weighted Reciprocal Rank
//! Fusion, then adds a title bonus computed from the query as typed:
//!
//! `score(d) = sum_i w_i / (k + rank_i(d) + 1) + bonus(query, title(d))`
//!
//! RRF only looks at ranks, so strategies with incomparable score scales
//! (bm25, cosine, fixed metadata scores) combine cleanly. A pure function
//! of its inputs: no state survives between calls.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::strategy::{ScoredCandidate, StrategyKind};
use crate::config::{FusionConfig, PhraseBonusConfig};
use crate::document::{CorpusSnapshot, Document};

// ============================================================================
// FUSION ALGORITHMS
// ============================================================================

/// A document's RRF aggregate before bonuses
#[derive(Debug, Clone, PartialEq)]
pub struct RrfAggregate {
    pub document_id: String,
    pub rrf_score: f64,
    /// Strategies that returned the document, in list order
    pub strategies: Vec<StrategyKind>,
    /// Order of first appearance across all lists
    pub discovery: usize,
}

/// Weighted Reciprocal Rank Fusion
///
/// Each `(strategy, weight, candidates)` list adds `weight / (k + rank + 1)`
/// per document, using the candidate's 0-indexed rank. A document repeated
/// within one list only counts once, at its first position.
///
/// Aggregates are returned in discovery order, unsorted.
pub fn weighted_rrf(lists: &[(StrategyKind, f64, &[ScoredCandidate])], k: f64) -> Vec<RrfAggregate> {
    let mut aggregates: Vec<RrfAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for &(kind, weight, candidates) in lists {
        for candidate in candidates {
            let contribution = weight * (1.0 / (k + candidate.rank as f64 + 1.0));

            match index.get(candidate.document_id.as_str()) {
                Some(&i) => {
                    let aggregate = &mut aggregates[i];
                    if aggregate.strategies.contains(&kind) {
                        continue;
                    }
                    aggregate.rrf_score += contribution;
                    aggregate.strategies.push(kind);
                }
                None => {
                    index.insert(candidate.document_id.as_str(), aggregates.len());
                    aggregates.push(RrfAggregate {
                        document_id: candidate.document_id.clone(),
                        rrf_score: contribution,
                        strategies: vec![kind],
                        discovery: aggregates.len(),
                    });
                }
            }
        }
    }

    aggregates
}

/// Title bonus for one document
///
/// Only queries with more than `min_query_tokens` tokens earn a bonus.
/// The whole query inside the title earns `verbatim_bonus`; otherwise each
/// distinct query token longer than `min_token_len` found in the title earns
/// `token_bonus`. Watch terms present in both add `watch_term_bonus` each.
/// All comparisons are case-insensitive.
pub fn phrase_bonus(query: &str, title: &str, config: &PhraseBonusConfig) -> f64 {
    let query = query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.len() <= config.min_query_tokens {
        return 0.0;
    }

    let title = title.to_lowercase();
    let mut bonus = 0.0;

    if title.contains(query.as_str()) {
        bonus += config.verbatim_bonus;
    } else {
        let mut counted: Vec<&str> = Vec::new();
        for token in tokens {
            let token = token.trim_matches(|c: char| !c.is_alphanumeric());
            if token.chars().count() > config.min_token_len
                && !counted.contains(&token)
                && title.contains(token)
            {
                counted.push(token);
                bonus += config.token_bonus;
            }
        }
    }

    for term in &config.watch_terms {
        let term = term.to_lowercase();
        if !term.is_empty() && query.contains(term.as_str()) && title.contains(term.as_str()) {
            bonus += config.watch_term_bonus;
        }
    }

    bonus
}

// ============================================================================
// FUSED RESULT
// ============================================================================

/// One document in the final ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusedResult {
    pub document: Arc<Document>,
    /// Final score: `rrf_score + bonus`
    pub score: f64,
    pub rrf_score: f64,
    pub bonus: f64,
    /// Contributing strategies
    pub strategies: Vec<StrategyKind>,
    #[serde(skip)]
    pub discovery: usize,
}

impl FusedResult {
    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }
}

// ============================================================================
// RANK FUSION
// ============================================================================

/// Weighted RRF with title bonuses and a deterministic total order
#[derive(Debug, Clone, Default)]
pub struct RankFusion {
    config: FusionConfig,
}

impl RankFusion {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuse ranked lists into one ordering
    ///
    /// Documents missing from `snapshot` are dropped. Ordering: final score
    /// descending, then more contributing strategies, then most recent
    /// action date, then discovery order (lexical list first).
    pub fn fuse(
        &self,
        lists: &[(StrategyKind, &[ScoredCandidate])],
        snapshot: &CorpusSnapshot,
        original_query: &str,
    ) -> Vec<FusedResult> {
        let weighted: Vec<(StrategyKind, f64, &[ScoredCandidate])> = lists
            .iter()
            .map(|&(kind, candidates)| (kind, self.config.weights.weight(kind), candidates))
            .collect();

        let mut results: Vec<FusedResult> = weighted_rrf(&weighted, self.config.rrf_k)
            .into_iter()
            .filter_map(|aggregate| {
                let Some(document) = snapshot.get(&aggregate.document_id) else {
                    tracing::debug!(id = %aggregate.document_id, "fused candidate not in snapshot");
                    return None;
                };
                let bonus = phrase_bonus(original_query, &document.title, &self.config.bonus);
                Some(FusedResult {
                    document: Arc::clone(document),
                    score: aggregate.rrf_score + bonus,
                    rrf_score: aggregate.rrf_score,
                    bonus,
                    strategies: aggregate.strategies,
                    discovery: aggregate.discovery,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.strategy_count().cmp(&a.strategy_count()))
                .then_with(|| b.document.last_action_date.cmp(&a.document.last_action_date))
                .then_with(|| a.discovery.cmp(&b.discovery))
        });

        results
    }
}

// ============================================================================
// TESTS
// ============================================================================
