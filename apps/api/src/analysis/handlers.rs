//! HTTP handlers for the analysis endpoints.
//!
//! Upload validation happens here; scoring runs on the blocking pool under
//! a timeout so one huge document cannot wedge the async runtime.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::analysis::analyzer::FitAnalysis;
use crate::analysis::roles::predict_roles;
use crate::analysis::scoring;
use crate::errors::AppError;
use crate::extract::{self, MAX_UPLOAD_BYTES, MIN_RESUME_TEXT_CHARS};
use crate::parser::fields::{
    format_certifications, format_education, format_experience, format_projects,
    ParsedResumeFields,
};
use crate::parser::FieldParser;
use crate::state::AppState;

const MIN_JD_CHARS: usize = 50;
const MIN_SNIPPET_CHARS: usize = 20;
pub const MIN_COMPARE_FILES: usize = 2;
pub const MAX_COMPARE_FILES: usize = 10;

const SCORING_TIMEOUT: Duration = Duration::from_secs(30);
const PREVIEW_CHARS: usize = 500;
/// At most this many missing JD skills join the adjacency suggestions.
const MAX_MISSING_IN_SUGGESTIONS: usize = 5;
const MAX_COMBINED_SUGGESTIONS: usize = 8;
const MAX_ROLES_IN_RESPONSE: usize = 6;
const TOP_SKILLS_PER_RESUME: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Multipart plumbing
// ────────────────────────────────────────────────────────────────────────────

struct UploadedFile {
    filename: String,
    data: Bytes,
}

#[derive(Default)]
struct UploadForm {
    files: Vec<UploadedFile>,
    job_description: Option<String>,
}

async fn read_multipart(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" | "resumes" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                form.files.push(UploadedFile { filename, data });
            }
            "job_description" => {
                form.job_description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read field: {e}")))?,
                );
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    Ok(form)
}

fn single_file(form: &UploadForm) -> Result<&UploadedFile, AppError> {
    match form.files.as_slice() {
        [file] => Ok(file),
        [] => Err(AppError::Validation(
            "A resume file is required (field 'resume')".to_string(),
        )),
        _ => Err(AppError::Validation(
            "Upload exactly one resume file".to_string(),
        )),
    }
}

fn validate_upload(file: &UploadedFile) -> Result<(), AppError> {
    if !extract::is_supported(&file.filename) {
        return Err(AppError::UnsupportedFormat(format!(
            "Unsupported file type '{}'. Supported formats: pdf, txt",
            file.filename
        )));
    }
    if file.data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "File '{}' exceeds the {}MB limit",
            file.filename,
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

fn extract_resume_text(file: &UploadedFile) -> Result<String, AppError> {
    validate_upload(file)?;

    let text = extract::extract_text(&file.filename, &file.data).ok_or_else(|| {
        AppError::Validation(format!("Could not extract text from '{}'", file.filename))
    })?;

    if text.trim().chars().count() < MIN_RESUME_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "Resume text in '{}' is too short to analyze (minimum {MIN_RESUME_TEXT_CHARS} characters)",
            file.filename
        )));
    }

    Ok(text)
}

fn validate_job_description(jd: Option<String>) -> Result<String, AppError> {
    let jd = jd
        .map(|j| j.trim().to_string())
        .filter(|j| !j.is_empty())
        .ok_or_else(|| {
            AppError::Validation("A job description is required (field 'job_description')".to_string())
        })?;

    if jd.chars().count() < MIN_JD_CHARS {
        return Err(AppError::Validation(format!(
            "Job description is too short (minimum {MIN_JD_CHARS} characters)"
        )));
    }

    Ok(jd)
}

fn require_parser(state: &AppState) -> Result<Arc<dyn FieldParser>, AppError> {
    state.parser.clone().ok_or(AppError::ParserUnavailable)
}

/// Runs CPU-bound scoring off the async runtime, bounded by a timeout.
async fn run_scoring<T, F>(task: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(task);
    match tokio::time::timeout(SCORING_TIMEOUT, handle).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(AppError::Internal(anyhow!("scoring task failed: {e}"))),
        Err(_) => Err(AppError::Timeout),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response shaping
// ────────────────────────────────────────────────────────────────────────────

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Adjacency suggestions first, then the top missing JD skills. Deduped
/// case-insensitively, capped.
fn combine_suggestions(suggested: &[String], missing: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for skill in suggested
        .iter()
        .chain(missing.iter().take(MAX_MISSING_IN_SUGGESTIONS))
    {
        if seen.insert(skill.to_lowercase()) && out.len() < MAX_COMBINED_SUGGESTIONS {
            out.push(skill.clone());
        }
    }
    out
}

/// Catalog-extracted skills keep their canonical forms and come first;
/// whatever extra the model found is appended in its order.
fn merge_skills(extracted: &[String], parsed: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for skill in extracted.iter().chain(parsed.iter()) {
        if seen.insert(skill.to_lowercase()) {
            out.push(skill.clone());
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
/// Full fit report for one resume against one job description.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let parser = require_parser(&state)?;
    let form = read_multipart(multipart).await?;
    let jd = validate_job_description(form.job_description.clone())?;
    let file = single_file(&form)?;
    let resume_text = extract_resume_text(file)?;

    let fields = parser.parse_resume(&resume_text).await?;

    let analyzer = state.analyzer.clone();
    let matcher = state.matcher.clone();
    let jd_processor = state.jd_processor.clone();
    let resume_text_task = resume_text.clone();
    let jd_task = jd.clone();
    let parsed_skills = fields.skills.clone();

    let (analysis, jd_summary, resume_skills) = run_scoring(move || {
        let resume_skills = merge_skills(&matcher.extract(&resume_text_task), &parsed_skills);
        let jd_summary = jd_processor.process(&jd_task);
        let analysis = analyzer.analyze(
            &resume_text_task,
            &jd_task,
            &resume_skills,
            &jd_summary.required_skills,
        );
        (analysis, jd_summary, resume_skills)
    })
    .await?;

    let FitAnalysis {
        scores,
        comparison,
        strengths,
        mut predicted_roles,
        recommendation,
        improvement_suggestions,
    } = analysis;
    predicted_roles.truncate(MAX_ROLES_IN_RESPONSE);

    Ok(Json(json!({
        "filename": file.filename,
        "resume": {
            "name": fields.name,
            "email": fields.email,
            "phone": fields.phone,
            "skills": resume_skills,
            "total_experience_years": fields.total_experience_years,
            "preview": preview(&resume_text),
        },
        "job": jd_summary,
        "scores": scores,
        "skills": {
            "matched": comparison.matched,
            "missing": comparison.missing,
            "suggested": combine_suggestions(&comparison.suggested, &comparison.missing),
        },
        "strengths": strengths,
        "predicted_roles": predicted_roles,
        "recommendation": recommendation,
        "improvement_suggestions": improvement_suggestions,
    })))
}

/// POST /api/parse-resume
/// Structured fields for one resume, no job description involved.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let parser = require_parser(&state)?;
    let form = read_multipart(multipart).await?;
    let file = single_file(&form)?;
    let resume_text = extract_resume_text(file)?;

    let fields = parser.parse_resume(&resume_text).await?;

    Ok(Json(json!({
        "filename": file.filename,
        "name": fields.name,
        "email": fields.email,
        "phone": fields.phone,
        "summary": fields.summary,
        "total_experience_years": fields.total_experience_years,
        "skills": fields.skills,
        "education": format_education(&fields.education),
        "experience": format_experience(&fields.experience),
        "projects": format_projects(&fields.projects),
        "certifications": format_certifications(&fields.certifications),
        "predicted_roles": predict_roles(&fields.skills),
        "text_preview": preview(&resume_text),
    })))
}

/// POST /api/match-job
/// The model's verdict on a resume-vs-JD pairing, alongside the local
/// skill comparison so the two can be eyeballed against each other.
pub async fn handle_match_job(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let parser = require_parser(&state)?;
    let form = read_multipart(multipart).await?;
    let jd = validate_job_description(form.job_description.clone())?;
    let file = single_file(&form)?;
    let resume_text = extract_resume_text(file)?;

    let verdict = parser.match_job(&resume_text, &jd).await?;

    let matcher = state.matcher.clone();
    let jd_processor = state.jd_processor.clone();
    let resume_text_task = resume_text.clone();
    let jd_task = jd.clone();

    let (jd_summary, resume_skills, comparison, match_rate) = run_scoring(move || {
        let resume_skills = matcher.extract(&resume_text_task);
        let jd_summary = jd_processor.process(&jd_task);
        let comparison = matcher.compare(&resume_skills, &jd_summary.required_skills);
        let total = comparison.matched.len() + comparison.missing.len();
        let match_rate = scoring::percentage(comparison.matched.len(), total);
        (jd_summary, resume_skills, comparison, match_rate)
    })
    .await?;

    Ok(Json(json!({
        "filename": file.filename,
        "job": jd_summary,
        "model_verdict": verdict,
        "skills": {
            "resume": resume_skills,
            "matched": comparison.matched,
            "missing": comparison.missing,
            "match_rate": match_rate,
        },
    })))
}

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    #[serde(default)]
    text: String,
}

/// POST /api/extract-skills
/// Catalog-only extraction from arbitrary text. Works without a parser.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(req): Json<ExtractSkillsRequest>,
) -> Result<Json<Value>, AppError> {
    if req.text.trim().chars().count() < MIN_SNIPPET_CHARS {
        return Err(AppError::Validation(format!(
            "Provide at least {MIN_SNIPPET_CHARS} characters of text"
        )));
    }

    let skills = state.matcher.extract(&req.text);
    let by_category = state.catalog.categorize(&skills);

    Ok(Json(json!({
        "count": skills.len(),
        "skills": skills,
        "by_category": by_category,
        "predicted_roles": predict_roles(&skills),
    })))
}

#[derive(Debug, Serialize)]
struct CompareEntry {
    rank: usize,
    filename: String,
    name: String,
    email: String,
    phone: String,
    years_of_experience: Value,
    skills_count: usize,
    top_skills: Vec<String>,
    certifications_count: usize,
    projects_count: usize,
    score: f64,
}

/// POST /api/compare-resumes
/// Ranks several resumes against one job description. Files that fail
/// extraction or parsing are skipped, not fatal.
pub async fn handle_compare_resumes(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let parser = require_parser(&state)?;
    let form = read_multipart(multipart).await?;
    let jd = validate_job_description(form.job_description.clone())?;

    if form.files.len() < MIN_COMPARE_FILES || form.files.len() > MAX_COMPARE_FILES {
        return Err(AppError::Validation(format!(
            "Provide between {MIN_COMPARE_FILES} and {MAX_COMPARE_FILES} resumes (field 'resumes')"
        )));
    }

    let mut parsed: Vec<(String, String, ParsedResumeFields)> = Vec::new();
    for file in &form.files {
        let text = match extract_resume_text(file) {
            Ok(text) => text,
            Err(e) => {
                warn!("skipping '{}': {e}", file.filename);
                continue;
            }
        };
        match parser.parse_resume(&text).await {
            Ok(fields) => parsed.push((file.filename.clone(), text, fields)),
            Err(e) => warn!("skipping '{}': parser failed: {e}", file.filename),
        }
    }

    if parsed.is_empty() {
        return Err(AppError::Validation(
            "None of the uploaded resumes could be processed".to_string(),
        ));
    }
    let skipped = form.files.len() - parsed.len();

    let analyzer = state.analyzer.clone();
    let matcher = state.matcher.clone();
    let jd_processor = state.jd_processor.clone();
    let jd_task = jd.clone();

    let (jd_summary, candidates) = run_scoring(move || {
        let jd_summary = jd_processor.process(&jd_task);

        let mut entries: Vec<CompareEntry> = parsed
            .into_iter()
            .map(|(filename, text, fields)| {
                let skills = merge_skills(&matcher.extract(&text), &fields.skills);
                let scores =
                    analyzer.score(&text, &jd_task, &skills, &jd_summary.required_skills);
                let mut top_skills = skills.clone();
                top_skills.truncate(TOP_SKILLS_PER_RESUME);

                CompareEntry {
                    rank: 0,
                    filename,
                    name: fields.name,
                    email: fields.email,
                    phone: fields.phone,
                    years_of_experience: fields.total_experience_years,
                    skills_count: skills.len(),
                    top_skills,
                    certifications_count: fields.certifications.len(),
                    projects_count: fields.projects.len(),
                    score: scores.overall_score,
                }
            })
            .collect();

        // Highest score first; filename breaks ties so ranking is stable.
        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }

        (jd_summary, entries)
    })
    .await?;

    Ok(Json(json!({
        "job": jd_summary,
        "candidates": candidates,
        "processed": candidates.len(),
        "skipped": skipped,
    })))
}
