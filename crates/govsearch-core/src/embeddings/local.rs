//! Local Query Embeddings
//!
//! Uses fastembed v5.11 for local inference with Nomic Embed Text v1.5
//! (ONNX, 768d → 256d Matryoshka). Document vectors in the vector store
//! must come from the same model and truncation.

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{EmbeddingError, EmbeddingProvider};
use crate::error::CollaboratorError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Embedding dimensions after Matryoshka truncation
pub const EMBEDDING_DIMENSIONS: usize = 256;

/// Maximum text length in bytes handed to the model (truncated if longer)
pub const MAX_TEXT_LENGTH: usize = 8192;

const MODEL_NAME: &str = "nomic-ai/nomic-embed-text-v1.5";

/// Cache directory for model files
/// Uses FASTEMBED_CACHE_PATH env var, or falls back to platform cache directory
fn cache_dir() -> PathBuf {
    if let Ok(path) = std::env::var("FASTEMBED_CACHE_PATH") {
        return PathBuf::from(path);
    }

    // Linux: ~/.cache/govsearch/fastembed
    if let Some(proj_dirs) = directories::ProjectDirs::from("org", "govsearch", "core") {
        return proj_dirs.cache_dir().join("fastembed");
    }

    PathBuf::from(".fastembed_cache")
}

// ============================================================================
// PROVIDER
// ============================================================================

/// Embedding provider backed by a locally loaded fastembed model
///
/// fastembed v5 needs `&mut` access to embed, so the model sits behind a
/// mutex and inference runs on tokio's blocking pool.
#[derive(Clone)]
pub struct FastembedProvider {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastembedProvider {
    /// Load the model, downloading it into the cache directory if needed
    pub fn load() -> Result<Self, EmbeddingError> {
        Self::load_from(cache_dir())
    }

    /// Load the model using an explicit cache directory
    pub fn load_from(cache_dir: PathBuf) -> Result<Self, EmbeddingError> {
        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            tracing::warn!("Failed to create cache directory {:?}: {}", cache_dir, e);
        }

        let options = InitOptions::new(EmbeddingModel::NomicEmbedTextV15)
            .with_show_download_progress(false)
            .with_cache_dir(cache_dir);

        let model = TextEmbedding::try_new(options).map_err(|e| {
            EmbeddingError::ModelInit(format!(
                "Failed to initialize {}: {}. Ensure ONNX runtime is available and model files can be downloaded.",
                MODEL_NAME, e
            ))
        })?;

        tracing::info!(model = MODEL_NAME, dimensions = EMBEDDING_DIMENSIONS, "embedding model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }

    /// Blocking embed of a single text
    fn embed_blocking(model: &Mutex<TextEmbedding>, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("Text cannot be empty".to_string()));
        }

        let text = truncate_to_boundary(text, MAX_TEXT_LENGTH);

        let mut model = model
            .lock()
            .map_err(|e| EmbeddingError::ModelInit(format!("Lock poisoned: {}", e)))?;

        let mut embeddings = model
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError::EmbeddingFailed(e.to_string()))?;

        match embeddings.pop() {
            Some(vector) => Ok(matryoshka_truncate(vector)),
            None => Err(EmbeddingError::EmbeddingFailed(
                "No embedding generated".to_string(),
            )),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FastembedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        let vector = tokio::task::spawn_blocking(move || Self::embed_blocking(&model, &text))
            .await
            .map_err(|e| CollaboratorError::Unavailable(format!("embedding task failed: {}", e)))??;

        Ok(vector)
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Apply Matryoshka truncation: truncate to EMBEDDING_DIMENSIONS and L2-normalize
#[inline]
pub fn matryoshka_truncate(mut vector: Vec<f32>) -> Vec<f32> {
    if vector.len() > EMBEDDING_DIMENSIONS {
        vector.truncate(EMBEDDING_DIMENSIONS);
    }
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

fn truncate_to_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
