//! Semantic backend — local sentence embeddings via fastembed.
//!
//! Uses the all-MiniLM-L6-v2 family model: small enough to run on CPU,
//! strong enough to rank resume/JD pairs. Model weights load once at
//! startup (the probe); a load failure is the probe's signal to fall back
//! to lexical, so nothing here retries.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::warn;

use crate::similarity::{cosine_similarity, SimilarityBackend};

pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";
pub const EMBEDDING_DIM: usize = 384;

/// fastembed session behind a Mutex: one embedding call at a time. Scoring
/// embeds two short documents per request, so contention is not a concern;
/// exclusive access keeps the ONNX session usage simple.
pub struct SemanticBackend {
    model: Mutex<TextEmbedding>,
}

impl SemanticBackend {
    /// Loads the embedding model, fetching weights into `cache_dir` (or the
    /// fastembed default) on first run. Errors here mean "no semantic
    /// capability", which the caller treats as a fallback signal, not a
    /// startup failure.
    pub fn load(cache_dir: Option<&Path>) -> Result<Self> {
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir.to_path_buf());
        }

        let model = TextEmbedding::try_new(options)
            .with_context(|| format!("failed to load embedding model {MODEL_NAME}"))?;

        Ok(Self {
            model: Mutex::new(model),
        })
    }

    fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("embedding model lock poisoned: {e}"))?;
        model.embed(texts, None).context("embedding inference failed")
    }
}

impl SimilarityBackend for SemanticBackend {
    fn similarity(&self, a: &str, b: &str) -> f32 {
        match self.embed(vec![a.to_string(), b.to_string()]) {
            Ok(vectors) if vectors.len() == 2 => cosine_similarity(&vectors[0], &vectors[1]),
            Ok(vectors) => {
                warn!(
                    "Embedding batch returned {} vectors for 2 inputs; scoring 0.0",
                    vectors.len()
                );
                0.0
            }
            Err(e) => {
                warn!("Semantic similarity failed ({e:#}); scoring 0.0");
                0.0
            }
        }
    }

    fn embeddings(&self, texts: &[String]) -> Vec<Vec<f32>> {
        match self.embed(texts.to_vec()) {
            Ok(vectors) => vectors,
            Err(e) => {
                warn!("Batch embedding failed ({e:#}); returning zero vectors");
                texts.iter().map(|_| vec![0.0; EMBEDDING_DIM]).collect()
            }
        }
    }
}
