//! Metadata Search
//!
//! Matches extracted identifiers against document identifiers and name
//! candidates against sponsor names. The highest-confidence signal in the
//! engine: an identifier hit is as close to a direct lookup as search gets.

use async_trait::async_trait;

use super::strategy::{
    rank_candidates, SearchStrategy, StrategyContext, StrategyKind, StrategyOutput,
};

/// Score for an identifier match
pub const IDENTIFIER_MATCH_SCORE: f64 = 1.0;

/// Score for a sponsor-name match
pub const SPONSOR_MATCH_SCORE: f64 = 0.8;

/// Whether an extracted identifier occurs in a document identifier
///
/// Case-insensitive substring match that must not start mid-token and must
/// not stop in the middle of a number.
///
/// ```
/// use govsearch_core::search::identifier_matches;
///
/// assert!(identifier_matches("HR-3684", "HR-3684-117"));
/// assert!(!identifier_matches("HR-36", "HR-3684"));
/// assert!(!identifier_matches("S-5", "HRES-5"));
/// ```
pub fn identifier_matches(extracted: &str, identifier: &str) -> bool {
    if extracted.is_empty() {
        return false;
    }

    let needle = extracted.to_ascii_uppercase();
    let haystack = identifier.to_ascii_uppercase();

    haystack.match_indices(needle.as_str()).any(|(start, found)| {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[start + found.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_digit());
        before_ok && after_ok
    })
}

/// Identifier and sponsor lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataStrategy;

impl MetadataStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchStrategy for MetadataStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Metadata
    }

    async fn search(&self, ctx: &StrategyContext) -> StrategyOutput {
        let query = &ctx.query;
        if !query.has_structured_hints() {
            return StrategyOutput::completed(vec![]);
        }

        let names: Vec<String> = query
            .name_candidates
            .iter()
            .map(|n| n.to_lowercase())
            .collect();

        let mut scored: Vec<(String, f64)> = Vec::new();
        for doc in ctx.snapshot.iter() {
            let mut best: Option<f64> = None;

            if query
                .identifiers
                .iter()
                .any(|id| identifier_matches(id, &doc.identifier))
            {
                best = Some(IDENTIFIER_MATCH_SCORE);
            }

            if best.is_none() {
                let sponsor = doc.sponsor_name().map(str::to_lowercase);
                if let Some(sponsor) = sponsor {
                    if names.iter().any(|n| sponsor.contains(n.as_str())) {
                        best = Some(SPONSOR_MATCH_SCORE);
                    }
                }
            }

            if let Some(score) = best {
                scored.push((doc.id.clone(), score));
            }
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(ctx.limit);

        tracing::debug!(
            identifiers = query.identifiers.len(),
            names = names.len(),
            matched = scored.len(),
            "metadata lookup"
        );

        StrategyOutput::completed(rank_candidates(scored))
    }
}
