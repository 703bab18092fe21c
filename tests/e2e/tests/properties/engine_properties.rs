//! Property tests: ranked pages are unique, ordered and reproducible.

use proptest::prelude::*;
use std::collections::HashSet;

use govsearch_core::{Document, DocumentType, SearchRequest};
use govsearch_e2e_tests::{BatchConfig, TestDataFactory};

use super::{engine_for, run_search};

/// Documents with titles drawn from the topic vocabulary
fn corpus_strategy() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(
        (prop::collection::vec(0..TestDataFactory::TOPICS.len(), 1..5), 0..3usize),
        1..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (words, kind))| {
                let title = words
                    .iter()
                    .map(|w| TestDataFactory::TOPICS[*w])
                    .collect::<Vec<_>>()
                    .join(" ");
                Document::new(
                    uuid::Uuid::new_v4().to_string(),
                    TestDataFactory::rotate_document_type(kind),
                    format!("HR-{}-118", i + 1),
                    title,
                )
            })
            .collect()
    })
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(0..TestDataFactory::TOPICS.len(), 1..4).prop_map(|words| {
        words
            .iter()
            .map(|w| TestDataFactory::TOPICS[*w])
            .collect::<Vec<_>>()
            .join(" ")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_page_is_unique_and_ordered(
        documents in corpus_strategy(),
        query in query_strategy(),
        limit in 1usize..=50,
    ) {
        let engine = engine_for(documents);
        let response = run_search(&engine, &SearchRequest::new(query).with_limit(limit));

        let ids: HashSet<_> = response.documents.iter().map(|r| r.document.id.as_str()).collect();
        prop_assert_eq!(ids.len(), response.documents.len());
        prop_assert!(response.documents.len() <= limit);
        prop_assert!(response.total_results >= response.documents.len());
        for pair in response.documents.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        prop_assert!((0.0..=1.0).contains(&response.confidence));
        prop_assert!(response.suggestions.len() <= 5);
    }

    #[test]
    fn prop_search_is_deterministic(
        documents in corpus_strategy(),
        query in query_strategy(),
    ) {
        let engine = engine_for(documents);
        let request = SearchRequest::new(query);

        let first = run_search(&engine, &request);
        let second = run_search(&engine, &request);

        prop_assert_eq!(first.documents, second.documents);
        prop_assert_eq!(first.confidence, second.confidence);
        prop_assert_eq!(first.suggestions, second.suggestions);
    }

    #[test]
    fn prop_exact_identifier_ranks_first(
        count in 1usize..20,
        pick in any::<prop::sample::Index>(),
    ) {
        let documents = TestDataFactory::create_batch_with_config(&BatchConfig {
            count,
            document_type: Some(DocumentType::Bill),
            ..Default::default()
        });
        let target = documents[pick.index(count)].clone();
        let number = target
            .identifier
            .split('-')
            .nth(1)
            .unwrap()
            .to_string();

        let engine = engine_for(documents);
        let response = run_search(&engine, &SearchRequest::new(format!("HR-{}", number)));

        prop_assert_eq!(&response.documents[0].document.id, &target.id);
    }
}
