//! Search Engine
//!
//! Per request:
//!   1. Validate the request (rejected before any strategy runs)
//!   2. Preprocess the query
//!   3. Take one corpus snapshot and narrow it by the request filters
//!   4. Run lexical, semantic and metadata strategies concurrently, each
//!      under its own time budget
//!   5. Fuse, paginate, then score confidence and build suggestions
//!
//! Nothing but validation can fail: a broken collaborator shrinks the
//! result set, it never turns into an error.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::document::{CorpusSnapshot, SearchFilters};
use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, SearchError, MAX_LIMIT, MAX_QUERY_CHARS, MIN_LIMIT};
use crate::query::{ProcessedQuery, QueryPreprocessor};
use crate::search::{
    confidence_score, generate_suggestions, CancelFlag, FusedResult, LexicalStrategy,
    MetadataStrategy, RankFusion, ScoredCandidate, SearchStrategy, SemanticStrategy,
    StrategyContext, StrategyKind,
};
use crate::storage::{DocumentStore, FullTextIndex, VectorStore};

/// Page size when a request does not name one
pub const DEFAULT_LIMIT: usize = 20;

// ============================================================================
// COLLABORATORS
// ============================================================================

/// External services the engine reads from
///
/// Only the document store is required. Without a full-text index the
/// lexical strategy always uses its token scan; without both an embedder
/// and a vector store semantic search is off.
#[derive(Clone)]
pub struct Collaborators {
    pub documents: Arc<dyn DocumentStore>,
    pub full_text: Option<Arc<dyn FullTextIndex>>,
    pub embedder: Option<Arc<dyn EmbeddingProvider>>,
    pub vectors: Option<Arc<dyn VectorStore>>,
}

impl Collaborators {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            documents,
            full_text: None,
            embedder: None,
            vectors: None,
        }
    }

    pub fn with_full_text(mut self, index: Arc<dyn FullTextIndex>) -> Self {
        self.full_text = Some(index);
        self
    }

    pub fn with_embeddings(
        mut self,
        embedder: Arc<dyn EmbeddingProvider>,
        vectors: Arc<dyn VectorStore>,
    ) -> Self {
        self.embedder = Some(embedder);
        self.vectors = Some(vectors);
        self
    }
}

// ============================================================================
// REQUEST
// ============================================================================

/// Which strategies a request runs
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Lexical, semantic and metadata
    #[default]
    Hybrid,
    /// Lexical and metadata
    Keyword,
    /// Semantic only
    Semantic,
}

impl SearchMode {
    pub fn runs(&self, kind: StrategyKind) -> bool {
        match self {
            SearchMode::Hybrid => true,
            SearchMode::Keyword => kind != StrategyKind::Semantic,
            SearchMode::Semantic => kind == StrategyKind::Semantic,
        }
    }
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// A search request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub mode: SearchMode,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            filters: SearchFilters::default(),
            mode: SearchMode::default(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reject empty or oversized queries and out-of-range limits
    pub fn validate(&self) -> Result<()> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let length = query.chars().count();
        if length > MAX_QUERY_CHARS {
            return Err(SearchError::QueryTooLong {
                length,
                max: MAX_QUERY_CHARS,
            });
        }

        if !(MIN_LIMIT..=MAX_LIMIT).contains(&self.limit) {
            return Err(SearchError::InvalidLimit {
                limit: self.limit,
                min: MIN_LIMIT,
                max: MAX_LIMIT,
            });
        }

        Ok(())
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

/// How a strategy fared in one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum StrategyStatus {
    Completed,
    /// Ran, but fell back or lost a collaborator
    Degraded(String),
    /// Exceeded its time budget
    TimedOut,
    /// Task panicked or the corpus was unreadable
    Failed(String),
    /// Not part of the requested mode
    Skipped,
}

/// Per-strategy outcome reported with each response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyReport {
    pub strategy: StrategyKind,
    /// Candidates handed to fusion
    pub candidates: usize,
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub status: StrategyStatus,
}

impl StrategyReport {
    fn empty(strategy: StrategyKind, status: StrategyStatus) -> Self {
        Self {
            strategy,
            candidates: 0,
            elapsed_ms: 0,
            status,
        }
    }
}

/// A page of fused results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Query as typed
    pub query: String,
    /// Normalized text the strategies searched for
    pub processed_query: String,
    pub documents: Vec<FusedResult>,
    pub confidence: f64,
    pub suggestions: Vec<String>,
    /// Fused results before pagination
    pub total_results: usize,
    pub response_time_ms: u64,
    pub semantic_enabled: bool,
    pub strategies: Vec<StrategyReport>,
}

impl SearchResponse {
    /// First `k` results, for a downstream answer generator
    pub fn top_documents(&self, k: usize) -> &[FusedResult] {
        &self.documents[..k.min(self.documents.len())]
    }

    /// Report for one strategy
    pub fn report(&self, kind: StrategyKind) -> Option<&StrategyReport> {
        self.strategies.iter().find(|r| r.strategy == kind)
    }
}

// ============================================================================
// STRATEGY TASKS
// ============================================================================

/// Aborts the strategy task and raises its cancel flag when dropped
///
/// Dropping the search future (caller gave up) or hitting the time budget
/// both land here.
struct TaskGuard {
    handle: JoinHandle<crate::search::StrategyOutput>,
    cancel: CancelFlag,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Run one strategy under a time budget, never failing
async fn run_strategy(
    strategy: Arc<dyn SearchStrategy>,
    ctx: StrategyContext,
    budget: Duration,
) -> (Vec<ScoredCandidate>, StrategyReport) {
    let kind = strategy.kind();
    let started = Instant::now();
    let cancel = ctx.cancel.clone();

    let mut guard = TaskGuard {
        handle: tokio::spawn(async move { strategy.search(&ctx).await }),
        cancel,
    };

    let (candidates, status) = match tokio::time::timeout(budget, &mut guard.handle).await {
        Ok(Ok(output)) => {
            let status = match output.degradation {
                Some(reason) => {
                    tracing::warn!(strategy = %kind, %reason, "strategy degraded");
                    StrategyStatus::Degraded(reason)
                }
                None => StrategyStatus::Completed,
            };
            (output.candidates, status)
        }
        Ok(Err(e)) => {
            tracing::warn!(strategy = %kind, error = %e, "strategy task failed");
            (Vec::new(), StrategyStatus::Failed(e.to_string()))
        }
        Err(_) => {
            tracing::warn!(strategy = %kind, budget_ms = budget.as_millis() as u64, "strategy timed out");
            (Vec::new(), StrategyStatus::TimedOut)
        }
    };
    drop(guard);

    let report = StrategyReport {
        strategy: kind,
        candidates: candidates.len(),
        elapsed_ms: started.elapsed().as_millis() as u64,
        status,
    };
    (candidates, report)
}

// ============================================================================
// ENGINE
// ============================================================================

/// Hybrid search engine
///
/// Holds no per-request state; one engine can serve concurrent searches.
pub struct SearchEngine {
    config: SearchConfig,
    preprocessor: QueryPreprocessor,
    documents: Arc<dyn DocumentStore>,
    lexical: Arc<LexicalStrategy>,
    semantic: Arc<SemanticStrategy>,
    metadata: Arc<MetadataStrategy>,
    fusion: RankFusion,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("config", &self.config)
            .field("lexical", &self.lexical)
            .field("semantic", &self.semantic)
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    /// Build an engine, rejecting invalid configuration
    pub fn new(config: SearchConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let Collaborators {
            documents,
            full_text,
            embedder,
            vectors,
        } = collaborators;

        Ok(Self {
            preprocessor: QueryPreprocessor::new(),
            documents,
            lexical: Arc::new(LexicalStrategy::new(full_text)),
            semantic: Arc::new(SemanticStrategy::new(
                embedder,
                vectors,
                config.semantic.min_similarity,
            )),
            metadata: Arc::new(MetadataStrategy::new()),
            fusion: RankFusion::new(config.fusion.clone()),
            config,
        })
    }

    /// Replace the default query preprocessor
    pub fn with_preprocessor(mut self, preprocessor: QueryPreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Whether semantic search has both an embedder and a vector store
    pub fn semantic_enabled(&self) -> bool {
        self.semantic.is_enabled()
    }

    /// Run a search
    ///
    /// Fails only on request validation.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        request.validate()?;

        let span = tracing::info_span!(
            "search",
            request_id = %Uuid::new_v4(),
            mode = ?request.mode,
            limit = request.limit,
            offset = request.offset,
        );
        Ok(self.execute(request).instrument(span).await)
    }

    async fn execute(&self, request: &SearchRequest) -> SearchResponse {
        let started = Instant::now();
        let query = Arc::new(self.preprocessor.process(&request.query));

        let snapshot = match self.documents.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "corpus snapshot unavailable");
                let reports = StrategyKind::ALL
                    .into_iter()
                    .map(|kind| {
                        StrategyReport::empty(kind, StrategyStatus::Failed(format!("corpus unavailable: {}", e)))
                    })
                    .collect();
                return self.respond(request, &query, Vec::new(), 0, reports, started);
            }
        };

        let snapshot: Arc<CorpusSnapshot> = if request.filters.is_empty() {
            snapshot
        } else {
            let narrowed = snapshot.filtered(&request.filters);
            tracing::debug!(before = snapshot.len(), after = narrowed.len(), "filters applied");
            Arc::new(narrowed)
        };

        let limit = self.config.candidate_limit(request.offset, request.limit);
        let strategies: [(Arc<dyn SearchStrategy>, Duration); 3] = [
            (self.lexical.clone() as Arc<dyn SearchStrategy>, self.config.strategy_timeout()),
            (self.semantic.clone() as Arc<dyn SearchStrategy>, self.config.semantic_timeout()),
            (self.metadata.clone() as Arc<dyn SearchStrategy>, self.config.strategy_timeout()),
        ];

        let runs = strategies.into_iter().map(|(strategy, budget)| {
            let kind = strategy.kind();
            let ctx = StrategyContext {
                query: Arc::clone(&query),
                snapshot: Arc::clone(&snapshot),
                limit,
                cancel: CancelFlag::new(),
            };
            let runs = request.mode.runs(kind);
            async move {
                if runs {
                    run_strategy(strategy, ctx, budget).await
                } else {
                    (Vec::new(), StrategyReport::empty(kind, StrategyStatus::Skipped))
                }
            }
        });
        let outcomes = futures::future::join_all(runs).await;

        let lists: Vec<(StrategyKind, &[ScoredCandidate])> = outcomes
            .iter()
            .map(|(candidates, report)| (report.strategy, candidates.as_slice()))
            .collect();

        tracing::info!(
            lexical = outcomes[0].0.len(),
            semantic = outcomes[1].0.len(),
            metadata = outcomes[2].0.len(),
            corpus = snapshot.len(),
            "strategies joined"
        );

        let fused = self.fusion.fuse(&lists, &snapshot, &query.original);
        let total_results = fused.len();
        let page: Vec<FusedResult> = fused
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .collect();

        let reports = outcomes.into_iter().map(|(_, report)| report).collect();
        self.respond(request, &query, page, total_results, reports, started)
    }

    fn respond(
        &self,
        request: &SearchRequest,
        query: &ProcessedQuery,
        documents: Vec<FusedResult>,
        total_results: usize,
        strategies: Vec<StrategyReport>,
        started: Instant,
    ) -> SearchResponse {
        let confidence = confidence_score(&query.original, &documents);
        let suggestions = generate_suggestions(&documents);
        let response_time_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            results = total_results,
            returned = documents.len(),
            confidence,
            elapsed_ms = response_time_ms,
            "search complete"
        );

        SearchResponse {
            query: request.query.clone(),
            processed_query: query.text.clone(),
            documents,
            confidence,
            suggestions,
            total_results,
            response_time_ms,
            semantic_enabled: self.semantic_enabled(),
            strategies,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
