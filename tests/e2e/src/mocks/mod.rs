//! Mock collaborators and test data

mod providers;

pub use fixtures::{BatchConfig, TestDataFactory};
pub use providers::{
    FailingEmbeddingProvider, FailingFullTextIndex, MockEmbeddingProvider, SlowEmbeddingProvider,
    MOCK_DIMENSIONS,
};
