//! Search Module
//!
//! Retrieval strategies and the steps that turn their lists into a page:
//! - Lexical search over a full-text index, with a token-scan fallback
//! - Semantic search by cosine similarity over stored embeddings
//! - Metadata search over identifiers and sponsor names
//! - Weighted RRF fusion with title bonuses
//! - Confidence scoring and follow-up suggestions

mod confidence;
mod fusion;
mod lexical;
mod metadata;
mod semantic;
mod strategy;
mod suggestions;

pub use strategy::{
    rank_candidates, CancelFlag, ScoredCandidate, SearchStrategy, StrategyContext, StrategyKind,
    StrategyOutput,
};

pub use lexical::{
    token_scan, LexicalStrategy, FULL_TEXT_TOKEN_SCORE, IDENTIFIER_TOKEN_SCORE,
    SUMMARY_TOKEN_SCORE, TITLE_TOKEN_SCORE,
};

pub use semantic::{rank_by_similarity, SemanticStrategy};

pub use metadata::{identifier_matches, MetadataStrategy, IDENTIFIER_MATCH_SCORE, SPONSOR_MATCH_SCORE};

pub use fusion::{phrase_bonus, weighted_rrf, FusedResult, RankFusion, RrfAggregate};

pub use confidence::confidence_score;

pub use suggestions::{generate_suggestions, FALLBACK_SUGGESTIONS, MAX_SUGGESTIONS};
