//! Search Configuration
//!
//! Every empirically chosen constant (RRF smoothing, strategy weights,
//! phrase bonuses, similarity floor, timeouts) is a named field here with
//! its historical value as the default. Values can be overridden in code,
//! deserialized, or read from `GOVSEARCH_*` environment variables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, SearchError};
use crate::search::StrategyKind;

// ============================================================================
// DEFAULTS
// ============================================================================

/// RRF smoothing constant
pub const DEFAULT_RRF_K: f64 = 60.0;

/// Minimum cosine similarity kept by the semantic strategy
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.1;

/// Semantic strategy time budget
pub const DEFAULT_SEMANTIC_TIMEOUT_MS: u64 = 2_000;

/// Lexical and metadata strategy time budget
pub const DEFAULT_STRATEGY_TIMEOUT_MS: u64 = 3_000;

/// Candidates requested per strategy = (offset + limit) * multiplier
pub const DEFAULT_CANDIDATE_MULTIPLIER: usize = 2;

/// Terms that earn a bonus when present in both query and title
pub const DEFAULT_WATCH_TERMS: &[&str] = &["infrastructure", "beautiful", "jobs", "investment"];

// ============================================================================
// FUSION
// ============================================================================

/// Per-strategy RRF multipliers
///
/// Independent multipliers, not a distribution: they need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategyWeights {
    pub lexical: f64,
    pub semantic: f64,
    pub metadata: f64,
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            lexical: 0.5,
            semantic: 0.3,
            metadata: 0.2,
        }
    }
}

impl StrategyWeights {
    /// Weight for one strategy
    pub fn weight(&self, kind: StrategyKind) -> f64 {
        match kind {
            StrategyKind::Lexical => self.lexical,
            StrategyKind::Semantic => self.semantic,
            StrategyKind::Metadata => self.metadata,
        }
    }
}

/// Title bonus added after RRF aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhraseBonusConfig {
    /// Whole query found verbatim in the title
    pub verbatim_bonus: f64,
    /// Per query token found in the title (when not verbatim)
    pub token_bonus: f64,
    /// Tokens must be strictly longer than this to earn `token_bonus`
    pub min_token_len: usize,
    /// Per watch term present in both query and title
    pub watch_term_bonus: f64,
    pub watch_terms: Vec<String>,
    /// Bonus applies only to queries with strictly more tokens than this
    pub min_query_tokens: usize,
}

impl Default for PhraseBonusConfig {
    fn default() -> Self {
        Self {
            verbatim_bonus: 2.0,
            token_bonus: 0.5,
            min_token_len: 3,
            watch_term_bonus: 1.0,
            watch_terms: DEFAULT_WATCH_TERMS.iter().map(|t| t.to_string()).collect(),
            min_query_tokens: 2,
        }
    }
}

/// Rank fusion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FusionConfig {
    pub weights: StrategyWeights,
    /// RRF constant (higher = flatter rank curve), must be > 0
    pub rrf_k: f64,
    pub bonus: PhraseBonusConfig,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            weights: StrategyWeights::default(),
            rrf_k: DEFAULT_RRF_K,
            bonus: PhraseBonusConfig::default(),
        }
    }
}

// ============================================================================
// SEMANTIC
// ============================================================================

/// Semantic strategy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SemanticConfig {
    /// Similarities below this are discarded
    pub min_similarity: f32,
    pub timeout_ms: u64,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            timeout_ms: DEFAULT_SEMANTIC_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// SEARCH CONFIG
// ============================================================================

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    pub fusion: FusionConfig,
    pub semantic: SemanticConfig,
    /// Time budget for the lexical and metadata strategies
    pub strategy_timeout_ms: u64,
    pub candidate_multiplier: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fusion: FusionConfig::default(),
            semantic: SemanticConfig::default(),
            strategy_timeout_ms: DEFAULT_STRATEGY_TIMEOUT_MS,
            candidate_multiplier: DEFAULT_CANDIDATE_MULTIPLIER,
        }
    }
}

impl SearchConfig {
    /// Defaults overlaid with `GOVSEARCH_*` environment variables
    ///
    /// Unset or unparseable variables keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn read<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        Self {
            fusion: FusionConfig {
                weights: StrategyWeights {
                    lexical: read(&lookup, "GOVSEARCH_LEXICAL_WEIGHT", defaults.fusion.weights.lexical),
                    semantic: read(&lookup, "GOVSEARCH_SEMANTIC_WEIGHT", defaults.fusion.weights.semantic),
                    metadata: read(&lookup, "GOVSEARCH_METADATA_WEIGHT", defaults.fusion.weights.metadata),
                },
                rrf_k: read(&lookup, "GOVSEARCH_RRF_K", defaults.fusion.rrf_k),
                bonus: defaults.fusion.bonus,
            },
            semantic: SemanticConfig {
                min_similarity: read(&lookup, "GOVSEARCH_MIN_SIMILARITY", defaults.semantic.min_similarity),
                timeout_ms: read(&lookup, "GOVSEARCH_SEMANTIC_TIMEOUT_MS", defaults.semantic.timeout_ms),
            },
            strategy_timeout_ms: read(&lookup, "GOVSEARCH_STRATEGY_TIMEOUT_MS", defaults.strategy_timeout_ms),
            candidate_multiplier: read(
                &lookup,
                "GOVSEARCH_CANDIDATE_MULTIPLIER",
                defaults.candidate_multiplier,
            ),
        }
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let k = self.fusion.rrf_k;
        if !k.is_finite() || k <= 0.0 {
            return Err(SearchError::InvalidConfig(format!("rrf_k must be > 0, got {k}")));
        }

        let weights = self.fusion.weights;
        for kind in StrategyKind::ALL {
            let w = weights.weight(kind);
            if !w.is_finite() || w < 0.0 {
                return Err(SearchError::InvalidConfig(format!(
                    "{kind} weight must be a finite non-negative number, got {w}"
                )));
            }
        }

        let bonus = &self.fusion.bonus;
        for (name, value) in [
            ("verbatim_bonus", bonus.verbatim_bonus),
            ("token_bonus", bonus.token_bonus),
            ("watch_term_bonus", bonus.watch_term_bonus),
        ] {
            if !value.is_finite() {
                return Err(SearchError::InvalidConfig(format!("{name} must be finite")));
            }
        }

        let sim = self.semantic.min_similarity;
        if !(-1.0..=1.0).contains(&sim) {
            return Err(SearchError::InvalidConfig(format!(
                "min_similarity must be within [-1, 1], got {sim}"
            )));
        }

        if self.semantic.timeout_ms == 0 || self.strategy_timeout_ms == 0 {
            return Err(SearchError::InvalidConfig("timeouts must be non-zero".into()));
        }

        if self.candidate_multiplier == 0 {
            return Err(SearchError::InvalidConfig(
                "candidate_multiplier must be at least 1".into(),
            ));
        }

        Ok(())
    }

    pub fn semantic_timeout(&self) -> Duration {
        Duration::from_millis(self.semantic.timeout_ms)
    }

    pub fn strategy_timeout(&self) -> Duration {
        Duration::from_millis(self.strategy_timeout_ms)
    }

    /// Candidates each strategy is asked for
    pub fn candidate_limit(&self, offset: usize, limit: usize) -> usize {
        offset
            .saturating_add(limit)
            .saturating_mul(self.candidate_multiplier)
    }
}

// ============================================================================
// TESTS
// ============================================================================
