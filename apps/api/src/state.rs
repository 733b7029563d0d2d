use std::sync::Arc;

use crate::analysis::analyzer::FitAnalyzer;
use crate::jd::JobDescriptionProcessor;
use crate::parser::FieldParser;
use crate::similarity::SimilarityEngine;
use crate::skills::catalog::SkillCatalog;
use crate::skills::matcher::SkillMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SkillCatalog>,
    pub matcher: Arc<SkillMatcher>,
    pub jd_processor: Arc<JobDescriptionProcessor>,
    pub similarity: Arc<SimilarityEngine>,
    pub analyzer: Arc<FitAnalyzer>,
    /// Pluggable resume parser. `None` when no API key is configured; the
    /// endpoints that need it answer 503 instead of failing at startup.
    pub parser: Option<Arc<dyn FieldParser>>,
}
