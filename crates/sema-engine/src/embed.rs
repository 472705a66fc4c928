//! Embedding provider abstraction and vector similarity.
//!
//! Whether an embedding backend exists is decided once, at analyzer
//! construction: the engine holds an `Option<Arc<dyn EmbeddingProvider>>`
//! and treats "no provider" as a first-class state. Individual `encode`
//! failures are absorbed by the analyzer (logged, never propagated) —
//! embeddings are optional, an analysis is complete without one.

use anyhow::Result;

/// A backend that turns raw text into a fixed-length vector.
///
/// Implementations must be cheap to call after construction; any expensive
/// model loading belongs in the constructor.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text. The returned vector length must be stable
    /// across calls for similarity scoring to be meaningful.
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// Cosine similarity between two vectors: `dot(a,b) / (|a| * |b|)`.
///
/// Returns 0.0 when either vector has zero magnitude. Symmetric; the
/// result lies in [-1.0, 1.0].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (ai, bi) in a.iter().zip(b.iter()) {
        let ai = f64::from(*ai);
        let bi = f64::from(*bi);
        dot += ai * bi;
        norm_a += ai * ai;
        norm_b += bi * bi;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (dot / denom) as f32
}

/// Offline ONNX-based provider via fastembed (BGE-small-en-v1.5, 384 dims).
#[cfg(feature = "local-embeddings")]
pub mod local {
    use super::EmbeddingProvider;
    use anyhow::{Context, Result};
    use fastembed::{EmbeddingModel, TextEmbedding};
    use parking_lot::Mutex;

    /// Fastembed-backed provider. Model loading happens once, in [`new`];
    /// the loaded model is shared behind a mutex because fastembed's
    /// `embed` requires exclusive access.
    ///
    /// [`new`]: LocalEmbedder::new
    pub struct LocalEmbedder {
        model: Mutex<TextEmbedding>,
    }

    impl LocalEmbedder {
        /// Initialize the local model. Fallible: a missing model download
        /// or unusable runtime surfaces here, not at encode time.
        pub fn new() -> Result<Self> {
            let options = fastembed::TextInitOptions::new(EmbeddingModel::BGESmallENV15)
                .with_show_download_progress(false);
            let model = TextEmbedding::try_new(options)
                .context("failed to initialize embedding model (BGE-small-en-v1.5)")?;
            Ok(Self {
                model: Mutex::new(model),
            })
        }
    }

    impl EmbeddingProvider for LocalEmbedder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            let mut model = self.model.lock();
            let mut vectors = model
                .embed(vec![text.to_string()], None)
                .context("fastembed embedding generation failed")?;
            vectors
                .pop()
                .ok_or_else(|| anyhow::anyhow!("empty embedding response"))
        }

        fn name(&self) -> &str {
            "fastembed (BGE-small-en-v1.5)"
        }
    }
}
