pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::errors::AppError;
use crate::state::AppState;

/// Multipart bodies carry up to ten resumes plus a job description.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

async fn fallback() -> AppError {
    AppError::NotFound("No such endpoint".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route(
            "/api/supported-formats",
            get(health::supported_formats_handler),
        )
        .route("/api/analyze", post(handlers::handle_analyze))
        .route("/api/parse-resume", post(handlers::handle_parse_resume))
        .route("/api/match-job", post(handlers::handle_match_job))
        .route("/api/extract-skills", post(handlers::handle_extract_skills))
        .route(
            "/api/compare-resumes",
            post(handlers::handle_compare_resumes),
        )
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
