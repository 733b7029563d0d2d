use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::analysis::handlers::MAX_COMPARE_FILES;
use crate::extract::{MAX_UPLOAD_BYTES, SUPPORTED_EXTENSIONS};
use crate::state::AppState;

/// GET /api/health
/// Returns service status plus which optional collaborators are live.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "similarity_backend": state.similarity.kind().as_str(),
        "parser_configured": state.parser.is_some(),
        "skills_loaded": state.catalog.len(),
    }))
}

/// GET /api/supported-formats
pub async fn supported_formats_handler() -> Json<Value> {
    Json(json!({
        "formats": SUPPORTED_EXTENSIONS,
        "max_file_size_bytes": MAX_UPLOAD_BYTES,
        "max_files_per_comparison": MAX_COMPARE_FILES,
    }))
}
