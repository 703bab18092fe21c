//! Storage Tests
//!
//! The SQLite corpus as the engine's document store, full-text index and
//! vector store:
//! - FTS5 primary path and token-scan fallback
//! - Stored embeddings feeding the semantic strategy
//! - Persistence across reopen, snapshot and restore

use govsearch_core::{
    Chamber, SearchConfig, SearchFilters, SearchRequest, StrategyKind, StrategyStatus,
};
use govsearch_e2e_tests::{init_tracing, MockEmbeddingProvider, TestDataFactory, TestDatabaseManager};
use std::sync::Arc;
use tempfile::TempDir;

fn seeded() -> TestDatabaseManager {
    init_tracing();
    let db = TestDatabaseManager::new_temp();
    let written = db.seed_documents(&TestDataFactory::legislative_corpus());
    assert_eq!(written, 10);
    db
}

// ============================================================================
// FULL-TEXT INDEX
// ============================================================================

#[tokio::test]
async fn test_identifier_lookup_through_fts() {
    let db = seeded();
    let engine = db.engine(SearchConfig::default());

    let response = engine.search(&SearchRequest::new("HR-3684")).await.unwrap();

    assert_eq!(response.documents[0].document.id, TestDataFactory::INFRASTRUCTURE_ID);
    assert_eq!(
        response.report(StrategyKind::Lexical).unwrap().status,
        StrategyStatus::Completed
    );
}

#[tokio::test]
async fn test_topic_lookup_through_fts() {
    let db = seeded();
    let engine = db.engine(SearchConfig::default());

    let response = engine
        .search(&SearchRequest::new("semiconductor manufacturing"))
        .await
        .unwrap();

    assert_eq!(response.documents[0].document.id, TestDataFactory::CHIPS_ID);
    let lexical = response.report(StrategyKind::Lexical).unwrap();
    assert_eq!(lexical.status, StrategyStatus::Completed);
    assert!(lexical.candidates >= 1);
}

#[tokio::test]
async fn test_fts_miss_falls_back_to_token_scan() {
    let db = seeded();
    let engine = db.engine(SearchConfig::default());

    // Substring of "semiconductor" but not an indexed term
    let response = engine.search(&SearchRequest::new("conduct")).await.unwrap();

    assert_eq!(response.documents[0].document.id, TestDataFactory::CHIPS_ID);
    assert_eq!(
        response.report(StrategyKind::Lexical).unwrap().status,
        StrategyStatus::Degraded("full-text index returned no results".to_string())
    );
}

#[tokio::test]
async fn test_filters_restrict_index_hits() {
    let db = seeded();
    let engine = db.engine(SearchConfig::default());
    let request = SearchRequest::new("act").with_filters(SearchFilters {
        chamber: Some(Chamber::Senate),
        ..Default::default()
    });

    let response = engine.search(&request).await.unwrap();

    let ids: Vec<_> = response.documents.iter().map(|r| r.document.id.as_str()).collect();
    assert_eq!(ids, vec![TestDataFactory::LAKEN_RILEY_ID]);
}

// ============================================================================
// EMBEDDINGS
// ============================================================================

#[tokio::test]
async fn test_stored_embeddings_feed_semantic_search() {
    let db = seeded();
    let provider = MockEmbeddingProvider::new();
    assert_eq!(db.seed_embeddings(&provider), 10);
    let engine = db.engine_with_embeddings(SearchConfig::default(), Arc::new(provider));

    let response = engine
        .search(&SearchRequest::new("veterans burn pits"))
        .await
        .unwrap();

    assert!(response.semantic_enabled);
    assert_eq!(response.documents[0].document.id, TestDataFactory::PACT_ID);
    let semantic = response.report(StrategyKind::Semantic).unwrap();
    assert_eq!(semantic.status, StrategyStatus::Completed);
    assert!(semantic.candidates >= 1);
    assert!(response.documents[0].strategies.contains(&StrategyKind::Semantic));
}

#[tokio::test]
async fn test_documents_without_embeddings_are_skipped() {
    let db = seeded();
    let engine = db.engine_with_embeddings(
        SearchConfig::default(),
        Arc::new(MockEmbeddingProvider::new()),
    );

    let response = engine
        .search(&SearchRequest::new("veterans burn pits"))
        .await
        .unwrap();

    let semantic = response.report(StrategyKind::Semantic).unwrap();
    assert_eq!(semantic.status, StrategyStatus::Completed);
    assert_eq!(semantic.candidates, 0);
    assert_eq!(response.documents[0].document.id, TestDataFactory::PACT_ID);
}

// ============================================================================
// PERSISTENCE
// ============================================================================

#[tokio::test]
async fn test_corpus_survives_reopen() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reopen.db");

    {
        let db = TestDatabaseManager::new_at_path(path.clone());
        db.seed_documents(&TestDataFactory::legislative_corpus());
    }

    let db = TestDatabaseManager::new_at_path(path);
    assert_eq!(db.document_count(), 10);

    let engine = db.engine(SearchConfig::default());
    let response = engine.search(&SearchRequest::new("Laken Riley")).await.unwrap();
    assert_eq!(response.documents[0].document.id, TestDataFactory::LAKEN_RILEY_ID);
}

#[test]
fn test_snapshot_and_restore() {
    let mut db = seeded();
    db.take_snapshot();

    db.seed_documents(&TestDataFactory::create_batch(5));
    assert_eq!(db.document_count(), 15);

    assert!(db.restore_snapshot());
    assert_eq!(db.document_count(), 10);
    assert!(!db.is_empty());
}

#[tokio::test]
async fn test_response_serializes_for_clients() {
    let db = seeded();
    let engine = db.engine(SearchConfig::default());

    let response = engine.search(&SearchRequest::new("HR-3684")).await.unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["processedQuery"], "hr-3684");
    assert_eq!(json["documents"][0]["document"]["identifier"], "HR-3684-117");
    assert_eq!(json["documents"][0]["document"]["sponsor"]["name"], "Peter DeFazio");
    assert_eq!(json["strategies"][0]["strategy"], "lexical");
    assert_eq!(json["strategies"][0]["status"], "completed");
    assert!(json["documents"][0].get("discovery").is_none());
}
