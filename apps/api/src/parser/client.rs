//! Groq-backed `FieldParser` over the OpenAI-compatible chat API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::fields::{JobMatch, ParsedResumeFields};
use super::{FieldParser, ParserError};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for all parsing calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "llama-3.1-8b-instant";
const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.1;
const MAX_RETRIES: u32 = 3;

const SYSTEM_PROMPT: &str = "Extract information from resumes. Return valid JSON only.";

// Prompt text is capped so oversized uploads cannot blow the model context.
const MAX_RESUME_PROMPT_CHARS: usize = 4000;
const MAX_JD_PROMPT_CHARS: usize = 2000;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GroqError {
    error: GroqErrorBody,
}

#[derive(Debug, Deserialize)]
struct GroqErrorBody {
    message: String,
}

/// The single Groq client used by all handlers.
/// Wraps the chat completions API with retry logic.
#[derive(Clone)]
pub struct GroqFieldParser {
    client: Client,
    api_key: String,
}

impl GroqFieldParser {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw chat call, returning the assistant message content.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    async fn call(&self, prompt: &str) -> Result<String, ParserError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let mut last_error: Option<ParserError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "parser call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(GROQ_API_URL)
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ParserError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("parser API returned {}: {}", status, body);
                last_error = Some(ParserError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<GroqError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(ParserError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat: ChatResponse = response.json().await?;

            if let Some(usage) = &chat.usage {
                debug!(
                    "parser call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            let content = chat
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .filter(|c| !c.trim().is_empty())
                .ok_or(ParserError::EmptyContent)?;

            return Ok(content);
        }

        Err(last_error.unwrap_or(ParserError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl FieldParser for GroqFieldParser {
    async fn parse_resume(&self, resume_text: &str) -> Result<ParsedResumeFields, ParserError> {
        let content = self.call(&parse_prompt(resume_text)).await?;
        match extract_json_object(&content) {
            Some(json) => Ok(ParsedResumeFields::from_json_str(json)),
            None => {
                warn!("parser returned no JSON object, using defaults");
                Ok(ParsedResumeFields::default())
            }
        }
    }

    async fn match_job(&self, resume_text: &str, jd_text: &str) -> Result<JobMatch, ParserError> {
        let content = self.call(&match_prompt(resume_text, jd_text)).await?;
        match extract_json_object(&content) {
            Some(json) => Ok(JobMatch::from_json_str(json)),
            None => {
                warn!("parser returned no JSON object, using defaults");
                Ok(JobMatch::default())
            }
        }
    }
}

fn parse_prompt(resume_text: &str) -> String {
    format!(
        "Extract the following information from this resume and return it as a JSON object \
         with these exact keys: name, email, phone, skills (list of strings), education \
         (list), experience (list), projects (list), certifications (list), summary (2-3 \
         sentences), total_experience_years (number).\n\n\
         Resume:\n{}\n\n\
         Return only the JSON object, no other text.",
        truncate_chars(resume_text, MAX_RESUME_PROMPT_CHARS)
    )
}

fn match_prompt(resume_text: &str, jd_text: &str) -> String {
    format!(
        "Compare this resume against the job description and return a JSON object with \
         these exact keys: match_score (number 0-100), matching_skills (list of strings), \
         missing_skills (list of strings), recommendation (one short paragraph).\n\n\
         Resume:\n{}\n\n\
         Job Description:\n{}\n\n\
         Return only the JSON object, no other text.",
        truncate_chars(resume_text, MAX_RESUME_PROMPT_CHARS),
        truncate_chars(jd_text, MAX_JD_PROMPT_CHARS)
    )
}

/// Models wrap JSON in prose or code fences despite instructions. Salvages
/// the span from the first '{' to the last '}'.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_object_from_fenced_output() {
        let input = "```json\n{\"name\": \"Ada\"}\n```";
        assert_eq!(extract_json_object(input), Some("{\"name\": \"Ada\"}"));
    }

    #[test]
    fn test_extract_json_object_from_prose() {
        let input = "Here is the result: {\"a\": 1} hope that helps!";
        assert_eq!(extract_json_object(input), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_json_object_spans_nested_braces() {
        let input = "{\"outer\": {\"inner\": 2}}";
        assert_eq!(extract_json_object(input), Some(input));
    }

    #[test]
    fn test_extract_json_object_none_without_braces() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte chars must not be split.
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_prompts_cap_input_length() {
        let long_resume = "x".repeat(MAX_RESUME_PROMPT_CHARS + 500);
        let prompt = parse_prompt(&long_resume);
        assert!(!prompt.contains(&long_resume));
        assert!(prompt.contains(&"x".repeat(MAX_RESUME_PROMPT_CHARS)));
    }
}
