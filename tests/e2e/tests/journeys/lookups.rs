//! Lookup journeys: a user types a query and reads the first page

use govsearch_core::search::{CancelFlag, MetadataStrategy, SearchStrategy, StrategyContext};
use govsearch_core::{
    Collaborators, DocumentType, QueryPreprocessor, SearchConfig, SearchEngine, SearchFilters,
    SearchRequest, StrategyKind, StrategyStatus, FALLBACK_SUGGESTIONS,
};
use govsearch_e2e_tests::{BatchConfig, TestDataFactory};
use std::sync::Arc;

use super::{hybrid_engine, ids, keyword_engine, search};

// ============================================================================
// IDENTIFIERS
// ============================================================================

#[tokio::test]
async fn test_identifier_query_ranks_bill_first() {
    let engine = hybrid_engine();
    let response = search(&engine, "HR-3684").await;

    let top = &response.documents[0];
    assert_eq!(top.document.id, TestDataFactory::INFRASTRUCTURE_ID);
    assert!(top.strategies.contains(&StrategyKind::Metadata));
    assert!(top.strategies.contains(&StrategyKind::Lexical));
    assert!(response.confidence >= 0.3, "identifier hit should boost confidence");
}

#[tokio::test]
async fn test_identifier_match_scores_maximum() {
    let snapshot = TestDataFactory::memory_corpus(TestDataFactory::legislative_corpus())
        .current()
        .expect("snapshot");
    let ctx = StrategyContext {
        query: Arc::new(QueryPreprocessor::new().process("HR-3684")),
        snapshot,
        limit: 10,
        cancel: CancelFlag::new(),
    };

    let output = MetadataStrategy::new().search(&ctx).await;

    assert_eq!(output.candidates.len(), 1);
    assert_eq!(output.candidates[0].document_id, TestDataFactory::INFRASTRUCTURE_ID);
    assert_eq!(output.candidates[0].score, 1.0);
}

#[tokio::test]
async fn test_spelled_out_executive_order() {
    let engine = keyword_engine();
    let response = search(&engine, "executive order 14008").await;

    assert_eq!(response.documents[0].document.id, TestDataFactory::CLIMATE_EO_ID);
    assert_eq!(response.processed_query, "executive order 14008");
}

#[tokio::test]
async fn test_country_abbreviation_is_not_an_identifier() {
    let documents = vec![
        govsearch_core::Document::new(
            "bill-hr5-118",
            DocumentType::Bill,
            "HR-5-118",
            "Federal Budget Priorities Act",
        ),
        govsearch_core::Document::new(
            "bill-s2024-118",
            DocumentType::Bill,
            "S-2024-118",
            "Rural Broadband Grants",
        ),
    ];
    let engine = SearchEngine::new(
        SearchConfig::default(),
        Collaborators::new(TestDataFactory::memory_corpus(documents)),
    )
    .unwrap();

    let response = search(&engine, "U.S. 2024 budget priorities").await;

    assert_eq!(response.report(StrategyKind::Metadata).unwrap().candidates, 0);
    assert_eq!(ids(&response)[0], "bill-hr5-118");
    assert!(response
        .documents
        .iter()
        .all(|r| !r.strategies.contains(&StrategyKind::Metadata)));
}

// ============================================================================
// TITLES AND SPONSORS
// ============================================================================

#[tokio::test]
async fn test_verbatim_title_phrase_wins() {
    let engine = hybrid_engine();
    let response = search(&engine, "one big beautiful bill act").await;

    let top = &response.documents[0];
    assert_eq!(top.document.id, TestDataFactory::BIG_BILL_ID);
    assert!(top.bonus >= 2.0, "verbatim bonus missing: {}", top.bonus);
    for other in &response.documents[1..] {
        assert!(top.score > other.score);
    }
}

#[tokio::test]
async fn test_sponsor_name_lookup() {
    let engine = keyword_engine();
    let response = search(&engine, "bills from Katie Britt").await;

    let top = &response.documents[0];
    assert_eq!(top.document.id, TestDataFactory::LAKEN_RILEY_ID);
    assert_eq!(top.strategies, vec![StrategyKind::Metadata]);
}

#[tokio::test]
async fn test_conversational_query_is_reduced_to_content_words() {
    let engine = keyword_engine();
    let response = search(&engine, "What is the latest on infrastructure spending?").await;

    assert_eq!(response.processed_query, "infrastructure spending");
    assert_eq!(response.documents[0].document.id, TestDataFactory::INFRASTRUCTURE_ID);
    assert!(response.documents[0].bonus > 0.0);
}

// ============================================================================
// SUGGESTIONS AND EMPTY RESULTS
// ============================================================================

#[tokio::test]
async fn test_suggestions_follow_result_categories() {
    let engine = keyword_engine();
    let response = search(&engine, "climate").await;

    assert_eq!(
        ids(&response),
        vec![TestDataFactory::CLIMATE_EO_ID, TestDataFactory::INFLATION_ID]
    );
    assert!(response.suggestions.len() <= 5);
    assert!(response.suggestions.contains(&"executive orders".to_string()));
    assert!(response.suggestions.contains(&"congressional bills".to_string()));
    assert!(response.suggestions.contains(&"tackling".to_string()));
}

#[tokio::test]
async fn test_unmatched_query_returns_fallback_suggestions() {
    let engine = keyword_engine();
    let response = search(&engine, "zzzz qqqq").await;

    assert!(response.documents.is_empty());
    assert_eq!(response.total_results, 0);
    assert_eq!(response.confidence, 0.0);
    assert_eq!(response.suggestions, FALLBACK_SUGGESTIONS);
}

#[tokio::test]
async fn test_empty_corpus() {
    let corpus = TestDataFactory::memory_corpus(vec![]);
    let engine = SearchEngine::new(SearchConfig::default(), Collaborators::new(corpus)).unwrap();

    let response = search(&engine, "infrastructure").await;

    assert!(response.documents.is_empty());
    assert_eq!(response.confidence, 0.0);
    assert_eq!(response.suggestions.len(), FALLBACK_SUGGESTIONS.len());
    for report in &response.strategies {
        assert!(!matches!(report.status, StrategyStatus::Failed(_)));
    }
}

// ============================================================================
// FILTERS AND PAGINATION
// ============================================================================

#[tokio::test]
async fn test_filters_narrow_before_ranking() {
    let engine = keyword_engine();
    let request = SearchRequest::new("climate").with_filters(SearchFilters {
        document_type: Some(DocumentType::ExecutiveOrder),
        ..Default::default()
    });

    let response = engine.search(&request).await.unwrap();

    assert_eq!(ids(&response), vec![TestDataFactory::CLIMATE_EO_ID]);
}

#[tokio::test]
async fn test_pages_are_slices_of_one_ranking() {
    let documents = TestDataFactory::create_batch_with_config(&BatchConfig {
        count: 30,
        ..Default::default()
    });
    let corpus = TestDataFactory::memory_corpus(documents);
    let engine = SearchEngine::new(SearchConfig::default(), Collaborators::new(corpus)).unwrap();

    let full = engine
        .search(&SearchRequest::new("generated measure").with_limit(30))
        .await
        .unwrap();
    let second = engine
        .search(&SearchRequest::new("generated measure").with_limit(10).with_offset(10))
        .await
        .unwrap();

    assert_eq!(full.total_results, 30);
    assert_eq!(ids(&second), ids(&full)[10..20].to_vec());
}

#[tokio::test]
async fn test_offset_past_end_is_empty() {
    let engine = keyword_engine();
    let response = engine
        .search(&SearchRequest::new("climate").with_offset(40))
        .await
        .unwrap();

    assert!(response.documents.is_empty());
    assert_eq!(response.total_results, 2);
    assert_eq!(response.suggestions, FALLBACK_SUGGESTIONS);
}
