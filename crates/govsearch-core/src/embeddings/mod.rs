//! Semantic Embeddings Module
//!
//! The engine never owns a model. It talks to an [`EmbeddingProvider`]
//! handed to it at construction, so several engines (or tests) can run
//! side by side with different providers.
//!
//! Provides:
//! - The provider contract used by the semantic strategy
//! - A compact [`Embedding`] vector type with blob encoding for storage
//! - Cosine similarity
//! - A local fastembed-backed provider (feature `embeddings`)

#[cfg(feature = "embeddings")]
mod local;

#[cfg(feature = "embeddings")]
#[cfg_attr(docsrs, doc(cfg(feature = "embeddings")))]
pub use local::{matryoshka_truncate, FastembedProvider, EMBEDDING_DIMENSIONS, MAX_TEXT_LENGTH};

use async_trait::async_trait;

use crate::error::CollaboratorError;

// ============================================================================
// PROVIDER CONTRACT
// ============================================================================

/// Produces one fixed-length vector per input text
///
/// Implementations must be deterministic: the same text always yields the
/// same vector, otherwise repeated searches would not be idempotent.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single query text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError>;

    /// Model name, for logs
    fn model_name(&self) -> &str {
        "unknown"
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Embedding error types
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum EmbeddingError {
    /// Failed to initialize the embedding model
    ModelInit(String),
    /// Failed to generate embedding
    EmbeddingFailed(String),
    /// Invalid input (empty, too long, etc.)
    InvalidInput(String),
}

impl std::fmt::Display for EmbeddingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingError::ModelInit(e) => write!(f, "Model initialization failed: {}", e),
            EmbeddingError::EmbeddingFailed(e) => write!(f, "Embedding generation failed: {}", e),
            EmbeddingError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
        }
    }
}

impl std::error::Error for EmbeddingError {}

// ============================================================================
// EMBEDDING TYPE
// ============================================================================

/// A document or query embedding
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    /// The embedding vector
    pub vector: Vec<f32>,
}

impl Embedding {
    /// Wrap a raw vector
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }

    /// Number of dimensions
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }

    /// Cosine similarity with another embedding (0.0 on dimension mismatch)
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        cosine_similarity(&self.vector, &other.vector)
    }

    /// Encode as little-endian f32 bytes for blob storage
    pub fn to_bytes(&self) -> Vec<u8> {
        self.vector.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Decode from little-endian f32 bytes
    ///
    /// Returns `None` when the byte length is not a multiple of 4.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        let vector = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Some(Self::new(vector))
    }
}

// ============================================================================
// SIMILARITY
// ============================================================================

/// Compute cosine similarity between two vectors
///
/// Mismatched lengths and zero-norm vectors score 0.0 rather than NaN.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot_product = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = (norm_a * norm_b).sqrt();
    if denominator > 0.0 {
        dot_product / denominator
    } else {
        0.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
