//! Confidence scoring
//!
//! A rough [0, 1] estimate of how well a result page answers the query,
//! built from result volume, identifier hits and top-3 scores.

use super::fusion::FusedResult;

/// Results needed for full volume credit
const FULL_VOLUME_RESULTS: f64 = 10.0;

/// Boost when the query is an identifier of a top result
const IDENTIFIER_BOOST: f64 = 0.3;

/// Share of the average top-3 score added
const RELEVANCE_FACTOR: f64 = 0.5;

/// Cap on the relevance share
const MAX_RELEVANCE_BOOST: f64 = 0.4;

/// Results that count as "top"
const TOP_RESULTS: usize = 3;

/// Confidence in `results`, 0.0 when empty
pub fn confidence_score(query: &str, results: &[FusedResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }

    let mut confidence = (results.len() as f64 / FULL_VOLUME_RESULTS).min(1.0);
    let top = &results[..results.len().min(TOP_RESULTS)];

    let needle = query.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    if !needle.is_empty()
        && top
            .iter()
            .any(|r| r.document.identifier.to_uppercase().contains(needle.as_str()))
    {
        confidence = (confidence + IDENTIFIER_BOOST).min(1.0);
    }

    let average = top.iter().map(|r| r.score).sum::<f64>() / top.len() as f64;
    confidence += (average * RELEVANCE_FACTOR).min(MAX_RELEVANCE_BOOST);

    confidence.clamp(0.0, 1.0)
}
