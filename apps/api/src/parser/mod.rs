//! Resume parsing via an external language model.
//!
//! ARCHITECTURAL RULE: No other module may call the Groq API directly.
//! All model interactions MUST go through this module.

use async_trait::async_trait;
use thiserror::Error;

pub mod client;
pub mod fields;

pub use client::GroqFieldParser;
pub use fields::{JobMatch, ParsedResumeFields};

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// Extracts structured fields from resume text.
///
/// Implementations must treat malformed model output as missing data, not
/// as an error: a response that transports fine but parses badly comes back
/// as defaults. Errors are reserved for the transport itself.
#[async_trait]
pub trait FieldParser: Send + Sync {
    /// Structured fields for one resume.
    async fn parse_resume(&self, resume_text: &str) -> Result<ParsedResumeFields, ParserError>;

    /// The model's own verdict on a resume-vs-JD pairing.
    async fn match_job(&self, resume_text: &str, jd_text: &str) -> Result<JobMatch, ParserError>;
}
