//! Similarity Engine — pluggable text-similarity backends behind one trait.
//!
//! Default: `SemanticBackend` (local MiniLM sentence embeddings via
//! fastembed). Fallback: `LexicalBackend` (TF-IDF over the two texts, no
//! model required).
//!
//! The backend is chosen ONCE at startup by a capability probe: if the
//! embedding model cannot load (no weights on disk, no network to fetch
//! them), the service logs why and runs lexical for its lifetime. The choice
//! is never silent — health reports the active backend name.

pub mod lexical;
pub mod semantic;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::similarity::lexical::LexicalBackend;
use crate::similarity::semantic::SemanticBackend;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A text-similarity strategy. Implementations are synchronous and are
/// called from blocking contexts; `SimilarityEngine` owns the edge-case
/// guards so implementations only see non-empty input.
pub trait SimilarityBackend: Send + Sync {
    /// Similarity of two non-empty texts. Implementations report faults by
    /// returning 0.0 after logging; they never panic outward.
    fn similarity(&self, a: &str, b: &str) -> f32;

    /// One vector per input text, all the same dimension.
    fn embeddings(&self, texts: &[String]) -> Vec<Vec<f32>>;
}

/// Which strategy the startup probe selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Semantic,
    Lexical,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Semantic => "semantic",
            BackendKind::Lexical => "lexical",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// The similarity entry point carried in `AppState`. Wraps the chosen
/// backend with input guards and output clamping.
pub struct SimilarityEngine {
    backend: Arc<dyn SimilarityBackend>,
    kind: BackendKind,
}

impl SimilarityEngine {
    /// Probes for the semantic backend and falls back to lexical. Runs once
    /// at startup; the decision holds for the process lifetime.
    ///
    /// `force` accepts "semantic" or "lexical" to skip or pin the probe.
    pub fn probe(force: Option<&str>, cache_dir: Option<&Path>) -> Self {
        match force {
            Some("lexical") => {
                info!("Similarity backend: lexical (forced via SIMILARITY_BACKEND)");
                return Self::lexical();
            }
            Some("semantic") | None => {}
            Some(other) => {
                warn!("Unknown SIMILARITY_BACKEND '{other}'; probing for semantic");
            }
        }

        match SemanticBackend::load(cache_dir) {
            Ok(backend) => {
                info!(
                    "Similarity backend: semantic ({} / {}-dim)",
                    semantic::MODEL_NAME,
                    semantic::EMBEDDING_DIM
                );
                Self {
                    backend: Arc::new(backend),
                    kind: BackendKind::Semantic,
                }
            }
            Err(e) => {
                warn!("Embedding model unavailable ({e:#}); falling back to lexical TF-IDF");
                Self::lexical()
            }
        }
    }

    pub fn lexical() -> Self {
        Self {
            backend: Arc::new(LexicalBackend),
            kind: BackendKind::Lexical,
        }
    }

    #[cfg(test)]
    pub fn with_backend(backend: Arc<dyn SimilarityBackend>, kind: BackendKind) -> Self {
        Self { backend, kind }
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Similarity in [0.0, 1.0]. Empty or whitespace-only input on either
    /// side short-circuits to 0.0 without touching the backend. Backend
    /// output is clamped: cosine over real embeddings can drift a hair
    /// outside [0, 1].
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0.0;
        }
        self.backend.similarity(a, b).clamp(0.0, 1.0)
    }

    /// Batch embeddings, exposed for reuse by callers that rank many texts
    /// at once. An empty batch returns empty without invoking the backend.
    #[allow(dead_code)]
    pub fn embeddings(&self, texts: &[String]) -> Vec<Vec<f32>> {
        if texts.is_empty() {
            return Vec::new();
        }
        self.backend.embeddings(texts)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cosine
// ────────────────────────────────────────────────────────────────────────────

/// Cosine similarity of two vectors. Zero-norm input or a length mismatch
/// yields 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&b, &a), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0, 1.0];
        let b = vec![-1.0, -1.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_engine_empty_input_short_circuits() {
        let engine = SimilarityEngine::lexical();
        assert_eq!(engine.similarity("", "some text"), 0.0);
        assert_eq!(engine.similarity("some text", ""), 0.0);
        assert_eq!(engine.similarity("   \n", "some text"), 0.0);
        assert_eq!(engine.similarity("", ""), 0.0);
    }

    #[test]
    fn test_engine_empty_batch_returns_empty() {
        let engine = SimilarityEngine::lexical();
        assert!(engine.embeddings(&[]).is_empty());
    }

    #[test]
    fn test_engine_clamps_backend_output() {
        struct OverUnity;
        impl SimilarityBackend for OverUnity {
            fn similarity(&self, _: &str, _: &str) -> f32 {
                1.0000004
            }
            fn embeddings(&self, texts: &[String]) -> Vec<Vec<f32>> {
                texts.iter().map(|_| vec![0.0]).collect()
            }
        }
        let engine = SimilarityEngine::with_backend(Arc::new(OverUnity), BackendKind::Lexical);
        assert_eq!(engine.similarity("a", "b"), 1.0);
    }

    #[test]
    fn test_probe_forced_lexical() {
        let engine = SimilarityEngine::probe(Some("lexical"), None);
        assert_eq!(engine.kind(), BackendKind::Lexical);
        assert_eq!(engine.kind().as_str(), "lexical");
    }

    #[test]
    fn test_identical_texts_score_high_on_lexical() {
        let engine = SimilarityEngine::lexical();
        let text = "Senior Rust engineer building distributed systems";
        assert!(engine.similarity(text, text) > 0.99);
    }
}
