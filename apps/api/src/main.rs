mod analysis;
mod config;
mod errors;
mod extract;
mod jd;
mod parser;
mod routes;
mod similarity;
mod skills;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::FitAnalyzer;
use crate::config::Config;
use crate::jd::JobDescriptionProcessor;
use crate::parser::{FieldParser, GroqFieldParser};
use crate::routes::build_router;
use crate::similarity::SimilarityEngine;
use crate::skills::catalog::SkillCatalog;
use crate::skills::matcher::SkillMatcher;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumatch API v{}", env!("CARGO_PKG_VERSION"));

    // Load the skill catalog (falls back to the built-in set on failure)
    let catalog = Arc::new(SkillCatalog::load(&config.skills_path));
    info!(
        "Skill catalog loaded: {} skills from {}",
        catalog.len(),
        config.skills_path.display()
    );

    let matcher = Arc::new(SkillMatcher::new(catalog.clone()));
    let jd_processor = Arc::new(JobDescriptionProcessor::new(matcher.clone()));

    // Pick a similarity backend. Loading the embedding model can take a
    // while on first run, so it happens once here, not per request.
    let similarity = Arc::new(SimilarityEngine::probe(
        config.similarity_backend.as_deref(),
        config.embedding_cache_dir.as_deref(),
    ));

    let analyzer = Arc::new(FitAnalyzer::new(matcher.clone(), similarity.clone()));

    // Initialize the resume parser when a key is configured
    let parser: Option<Arc<dyn FieldParser>> = match config.groq_api_key.clone() {
        Some(key) => {
            info!("Resume parser initialized (model: {})", parser::client::MODEL);
            Some(Arc::new(GroqFieldParser::new(key)))
        }
        None => {
            warn!("GROQ_API_KEY not set; parsing endpoints will return 503");
            None
        }
    };

    // Build app state
    let state = AppState {
        catalog,
        matcher,
        jd_processor,
        similarity,
        analyzer,
        parser,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
