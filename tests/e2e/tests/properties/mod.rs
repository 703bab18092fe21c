//! Property Tests
//!
//! Ranking invariants that must hold for any corpus and any query:
//! - Fusion arithmetic and bonus bounds
//! - Engine output ordering, uniqueness and determinism

mod engine_properties;
mod fusion_properties;

use govsearch_core::{Collaborators, Document, SearchConfig, SearchEngine, SearchRequest, SearchResponse};
use govsearch_e2e_tests::TestDataFactory;

/// Engine over `documents` with lexical and metadata search
pub(crate) fn engine_for(documents: Vec<Document>) -> SearchEngine {
    let corpus = TestDataFactory::memory_corpus(documents);
    SearchEngine::new(SearchConfig::default(), Collaborators::new(corpus)).unwrap()
}

/// Run one search to completion on a fresh runtime
pub(crate) fn run_search(engine: &SearchEngine, request: &SearchRequest) -> SearchResponse {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(engine.search(request)).unwrap()
}
