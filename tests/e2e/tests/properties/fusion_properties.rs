//! Property tests: RRF arithmetic, bonus bounds, identifier boundaries.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use govsearch_core::search::{identifier_matches, phrase_bonus, rank_candidates, weighted_rrf};
use govsearch_core::{PhraseBonusConfig, ScoredCandidate, StrategyKind};

const K: f64 = 60.0;

fn candidates(picks: &[u8]) -> Vec<ScoredCandidate> {
    rank_candidates(picks.iter().map(|p| (format!("doc-{}", p % 20), 1.0)))
}

proptest! {
    #[test]
    fn prop_rrf_matches_formula(
        lexical in prop::collection::vec(any::<u8>(), 0..30),
        semantic in prop::collection::vec(any::<u8>(), 0..30),
        metadata in prop::collection::vec(any::<u8>(), 0..30),
    ) {
        let lists = [
            (StrategyKind::Lexical, 0.5, candidates(&lexical)),
            (StrategyKind::Semantic, 0.3, candidates(&semantic)),
            (StrategyKind::Metadata, 0.2, candidates(&metadata)),
        ];
        let borrowed: Vec<(StrategyKind, f64, &[ScoredCandidate])> = lists
            .iter()
            .map(|(kind, weight, list)| (*kind, *weight, list.as_slice()))
            .collect();

        let aggregates = weighted_rrf(&borrowed, K);

        let mut expected: HashMap<String, f64> = HashMap::new();
        for (_, weight, list) in &lists {
            let mut seen = HashSet::new();
            for candidate in list {
                if seen.insert(candidate.document_id.clone()) {
                    *expected.entry(candidate.document_id.clone()).or_default() +=
                        weight / (K + candidate.rank as f64 + 1.0);
                }
            }
        }

        prop_assert_eq!(aggregates.len(), expected.len());
        for aggregate in &aggregates {
            let want = expected[&aggregate.document_id];
            prop_assert!((aggregate.rrf_score - want).abs() < 1e-12);
            prop_assert!(aggregate.strategies.len() <= 3);
        }

        let discovery: Vec<usize> = aggregates.iter().map(|a| a.discovery).collect();
        prop_assert_eq!(discovery, (0..aggregates.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_bonus_is_bounded(
        query in "[a-z]{1,12}( [a-z]{1,12}){0,6}",
        title in "[A-Za-z]{1,12}( [A-Za-z]{1,12}){0,8}",
    ) {
        let config = PhraseBonusConfig::default();
        let bonus = phrase_bonus(&query, &title, &config);

        let tokens = query.split_whitespace().count();
        let ceiling = config.verbatim_bonus.max(config.token_bonus * tokens as f64)
            + config.watch_term_bonus * config.watch_terms.len() as f64;

        prop_assert!(bonus >= 0.0);
        prop_assert!(bonus <= ceiling);
        if tokens <= config.min_query_tokens {
            prop_assert_eq!(bonus, 0.0);
        }
    }

    #[test]
    fn prop_identifier_numbers_match_exactly(
        queried in 1u32..10_000,
        stored in 1u32..10_000,
        congress in 100u32..120,
    ) {
        let matched = identifier_matches(
            &format!("HR-{}", queried),
            &format!("HR-{}-{}", stored, congress),
        );
        prop_assert_eq!(matched, queried == stored);
    }
}
