//! Parsed resume fields and the coercion rules that make them safe.
//!
//! Models return whatever shape they feel like: strings where objects were
//! asked for, alternate key names, missing sections. Nothing in here ever
//! errors on malformed content. Every accessor walks a candidate-key chain
//! (first present wins) and falls back to a sentinel, so a half-broken
//! parse still renders a usable report.

use serde::Serialize;
use serde_json::{Map, Value};

pub const NOT_FOUND: &str = "Not found";
pub const NOT_AVAILABLE: &str = "Not available";
pub const NOT_SPECIFIED: &str = "Not specified";

// ────────────────────────────────────────────────────────────────────────────
// Candidate key chains
// ────────────────────────────────────────────────────────────────────────────

const EDUCATION_DEGREE_KEYS: &[&str] = &["degree", "qualification", "title"];
const EDUCATION_FIELD_KEYS: &[&str] = &["field", "major", "specialization"];
const EDUCATION_INSTITUTION_KEYS: &[&str] = &["institution", "university", "college", "school"];
const EDUCATION_YEAR_KEYS: &[&str] = &["year", "graduation_year", "end_date"];
const EDUCATION_START_KEYS: &[&str] = &["start_year", "start_date"];
const EDUCATION_GPA_KEYS: &[&str] = &["gpa", "grade", "cgpa"];

const EXPERIENCE_COMPANY_KEYS: &[&str] = &["company", "organization", "employer", "company_name"];
const EXPERIENCE_ROLE_KEYS: &[&str] = &["role", "title", "position", "designation", "job_title"];
const EXPERIENCE_START_KEYS: &[&str] = &["start_date", "from", "start"];
const EXPERIENCE_END_KEYS: &[&str] = &["end_date", "to", "end"];
const EXPERIENCE_DESCRIPTION_KEYS: &[&str] =
    &["description", "responsibilities", "details", "summary"];
const EXPERIENCE_LOCATION_KEYS: &[&str] = &["location", "city", "place"];

const PROJECT_NAME_KEYS: &[&str] = &["name", "title", "project_name", "project"];
const PROJECT_DESCRIPTION_KEYS: &[&str] = &["description", "details", "summary", "about"];
const PROJECT_TECH_KEYS: &[&str] = &["technologies", "tech_stack", "tools", "tech", "skills"];
const PROJECT_DURATION_KEYS: &[&str] = &["duration", "date", "period", "timeline"];
const PROJECT_LINK_KEYS: &[&str] = &["link", "url", "github", "demo", "repository"];

const CERT_NAME_KEYS: &[&str] = &["name", "title", "certification", "certificate", "course"];
const CERT_ISSUER_KEYS: &[&str] = &["issuer", "organization", "provider", "issued_by", "platform"];
const CERT_YEAR_KEYS: &[&str] = &["year", "date", "issued_date", "completion_date"];
const CERT_ID_KEYS: &[&str] = &["credential_id", "id"];

// ────────────────────────────────────────────────────────────────────────────
// Field model
// ────────────────────────────────────────────────────────────────────────────

/// One entry of a list field. Models return either prose or an object, and
/// both forms must format cleanly.
#[derive(Debug, Clone)]
pub enum FieldEntry {
    Text(String),
    Structured(Map<String, Value>),
}

impl FieldEntry {
    fn from_value(value: Value) -> Option<FieldEntry> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(FieldEntry::Text(s.trim().to_string())),
            Value::Number(n) => Some(FieldEntry::Text(n.to_string())),
            Value::Object(m) => Some(FieldEntry::Structured(m)),
            _ => None,
        }
    }
}

/// Everything the parser reports about one resume.
#[derive(Debug, Clone)]
pub struct ParsedResumeFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    /// A number or numeric string when the model gave one, else the
    /// "Not specified" sentinel. Serialized as-is.
    pub total_experience_years: Value,
    pub skills: Vec<String>,
    pub education: Vec<FieldEntry>,
    pub experience: Vec<FieldEntry>,
    pub projects: Vec<FieldEntry>,
    pub certifications: Vec<FieldEntry>,
}

impl Default for ParsedResumeFields {
    fn default() -> Self {
        Self {
            name: NOT_FOUND.to_string(),
            email: NOT_FOUND.to_string(),
            phone: NOT_FOUND.to_string(),
            summary: NOT_AVAILABLE.to_string(),
            total_experience_years: Value::String(NOT_SPECIFIED.to_string()),
            skills: Vec::new(),
            education: Vec::new(),
            experience: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
        }
    }
}

impl ParsedResumeFields {
    /// Parses model output. Anything that is not a JSON object degrades to
    /// the defaults; within an object every field degrades independently.
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::default(),
        }
    }

    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };

        Self {
            name: string_or(&map, "name", NOT_FOUND),
            email: string_or(&map, "email", NOT_FOUND),
            phone: string_or(&map, "phone", NOT_FOUND),
            summary: string_or(&map, "summary", NOT_AVAILABLE),
            total_experience_years: years_value(&map),
            skills: string_list(&map, "skills"),
            education: entry_list(&map, "education"),
            experience: entry_list(&map, "experience"),
            projects: entry_list(&map, "projects"),
            certifications: entry_list(&map, "certifications"),
        }
    }
}

/// The collaborator's own verdict on a resume-vs-JD pairing.
#[derive(Debug, Clone, Serialize)]
pub struct JobMatch {
    pub match_score: f64,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendation: String,
}

impl Default for JobMatch {
    fn default() -> Self {
        Self {
            match_score: 0.0,
            matching_skills: Vec::new(),
            missing_skills: Vec::new(),
            recommendation: String::new(),
        }
    }
}

impl JobMatch {
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::default(),
        }
    }

    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };

        let match_score = match map.get("match_score") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };

        Self {
            match_score,
            matching_skills: string_list(&map, "matching_skills"),
            missing_skills: string_list(&map, "missing_skills"),
            recommendation: string_or(&map, "recommendation", ""),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Formatting — list fields into display strings
// ────────────────────────────────────────────────────────────────────────────

/// "{degree} in {field} from {institution} ({start} - {year}) - GPA: {gpa}",
/// with absent parts omitted. Objects with none of the known keys render as
/// "key: value" pairs; an empty list renders as the sentinel.
pub fn format_education(entries: &[FieldEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec![NOT_SPECIFIED.to_string()];
    }

    entries
        .iter()
        .map(|entry| match entry {
            FieldEntry::Text(s) => s.clone(),
            FieldEntry::Structured(map) => {
                let degree = first_string(map, EDUCATION_DEGREE_KEYS);
                let field = first_string(map, EDUCATION_FIELD_KEYS);
                let institution = first_string(map, EDUCATION_INSTITUTION_KEYS);
                let year = first_string(map, EDUCATION_YEAR_KEYS);
                let start = first_string(map, EDUCATION_START_KEYS);
                let gpa = first_string(map, EDUCATION_GPA_KEYS);

                if degree.is_none()
                    && field.is_none()
                    && institution.is_none()
                    && year.is_none()
                    && gpa.is_none()
                {
                    return key_value_pairs(map);
                }

                let mut text = String::new();
                if let Some(degree) = degree {
                    text.push_str(&degree);
                }
                if let Some(field) = field {
                    if !text.is_empty() {
                        text.push_str(" in ");
                    }
                    text.push_str(&field);
                }
                if let Some(institution) = institution {
                    if !text.is_empty() {
                        text.push_str(" from ");
                    }
                    text.push_str(&institution);
                }
                match (start, year) {
                    (Some(start), Some(year)) => text.push_str(&format!(" ({start} - {year})")),
                    (None, Some(year)) => text.push_str(&format!(" ({year})")),
                    _ => {}
                }
                if let Some(gpa) = gpa {
                    text.push_str(&format!(" - GPA: {gpa}"));
                }
                text.trim().to_string()
            }
        })
        .collect()
}

/// One position, normalized for display.
#[derive(Debug, Clone, Serialize)]
pub struct ExperienceView {
    pub company: String,
    pub role: String,
    pub duration: String,
    pub description: String,
    pub location: String,
}

pub fn format_experience(entries: &[FieldEntry]) -> Vec<ExperienceView> {
    entries
        .iter()
        .map(|entry| match entry {
            FieldEntry::Text(s) => ExperienceView {
                company: NOT_SPECIFIED.to_string(),
                role: s.clone(),
                duration: NOT_SPECIFIED.to_string(),
                description: String::new(),
                location: String::new(),
            },
            FieldEntry::Structured(map) => {
                let duration = first_string(map, &["duration"]).unwrap_or_else(|| {
                    let start = first_string(map, EXPERIENCE_START_KEYS);
                    let end = first_string(map, EXPERIENCE_END_KEYS);
                    match start {
                        Some(start) => {
                            format!("{start} - {}", end.unwrap_or_else(|| "Present".to_string()))
                        }
                        None => NOT_SPECIFIED.to_string(),
                    }
                });

                ExperienceView {
                    company: first_string(map, EXPERIENCE_COMPANY_KEYS)
                        .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                    role: first_string(map, EXPERIENCE_ROLE_KEYS)
                        .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                    duration,
                    description: joined_list_or_string(map, EXPERIENCE_DESCRIPTION_KEYS, " | ")
                        .unwrap_or_default(),
                    location: first_string(map, EXPERIENCE_LOCATION_KEYS).unwrap_or_default(),
                }
            }
        })
        .collect()
}

/// One project, normalized for display.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub duration: String,
    pub link: String,
}

pub fn format_projects(entries: &[FieldEntry]) -> Vec<ProjectView> {
    entries
        .iter()
        .map(|entry| match entry {
            FieldEntry::Text(s) => ProjectView {
                name: s.clone(),
                description: String::new(),
                technologies: String::new(),
                duration: String::new(),
                link: String::new(),
            },
            FieldEntry::Structured(map) => ProjectView {
                name: first_string(map, PROJECT_NAME_KEYS)
                    .unwrap_or_else(|| "Unnamed Project".to_string()),
                description: joined_list_or_string(map, PROJECT_DESCRIPTION_KEYS, " ")
                    .unwrap_or_default(),
                technologies: joined_list_or_string(map, PROJECT_TECH_KEYS, ", ")
                    .unwrap_or_default(),
                duration: first_string(map, PROJECT_DURATION_KEYS).unwrap_or_default(),
                link: first_string(map, PROJECT_LINK_KEYS).unwrap_or_default(),
            },
        })
        .collect()
}

/// "{name} by {issuer} ({year}) [ID: {id}]", with absent parts omitted.
pub fn format_certifications(entries: &[FieldEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| match entry {
            FieldEntry::Text(s) => s.clone(),
            FieldEntry::Structured(map) => {
                let mut parts = vec![first_string(map, CERT_NAME_KEYS)
                    .unwrap_or_else(|| "Certification".to_string())];
                if let Some(issuer) = first_string(map, CERT_ISSUER_KEYS) {
                    parts.push(format!("by {issuer}"));
                }
                if let Some(year) = first_string(map, CERT_YEAR_KEYS) {
                    parts.push(format!("({year})"));
                }
                if let Some(id) = first_string(map, CERT_ID_KEYS) {
                    parts.push(format!("[ID: {id}]"));
                }
                parts.join(" ")
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Coercion helpers
// ────────────────────────────────────────────────────────────────────────────

fn value_display(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First key in `keys` whose value renders as a non-empty string.
fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| map.get(*k).and_then(value_display))
}

/// Like `first_string`, but a list value joins its displayable elements
/// with `sep`.
fn joined_list_or_string(map: &Map<String, Value>, keys: &[&str], sep: &str) -> Option<String> {
    keys.iter().find_map(|k| match map.get(*k) {
        Some(Value::Array(items)) => {
            let joined: Vec<String> = items.iter().filter_map(value_display).collect();
            (!joined.is_empty()).then(|| joined.join(sep))
        }
        Some(other) => value_display(other),
        None => None,
    })
}

fn key_value_pairs(map: &Map<String, Value>) -> String {
    map.iter()
        .filter_map(|(k, v)| value_display(v).map(|v| format!("{k}: {v}")))
        .collect::<Vec<_>>()
        .join(", ")
}

fn string_or(map: &Map<String, Value>, key: &str, default: &str) -> String {
    map.get(key)
        .and_then(value_display)
        .unwrap_or_else(|| default.to_string())
}

/// String elements only. Numbers are meaningful for scalar fields like
/// phone or year, but a number inside a skills list is model noise.
fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn entry_list(map: &Map<String, Value>, key: &str) -> Vec<FieldEntry> {
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .cloned()
            .filter_map(FieldEntry::from_value)
            .collect(),
        _ => Vec::new(),
    }
}

fn years_value(map: &Map<String, Value>) -> Value {
    match map.get("total_experience_years") {
        Some(Value::Number(n)) => Value::Number(n.clone()),
        Some(Value::String(s)) if s.trim().parse::<f64>().is_ok() => {
            Value::String(s.trim().to_string())
        }
        _ => Value::String(NOT_SPECIFIED.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: serde_json::Value) -> ParsedResumeFields {
        ParsedResumeFields::from_value(v)
    }

    #[test]
    fn test_non_object_input_yields_defaults() {
        let f = ParsedResumeFields::from_json_str("not json at all");
        assert_eq!(f.name, NOT_FOUND);
        assert_eq!(f.summary, NOT_AVAILABLE);
        assert!(f.skills.is_empty());

        let f = fields(json!(["an", "array"]));
        assert_eq!(f.email, NOT_FOUND);
    }

    #[test]
    fn test_fields_degrade_independently() {
        // skills has the wrong type but the rest still parses.
        let f = fields(json!({
            "name": "Ada Lovelace",
            "skills": "Python, AWS",
            "email": "ada@example.com"
        }));
        assert_eq!(f.name, "Ada Lovelace");
        assert_eq!(f.email, "ada@example.com");
        assert!(f.skills.is_empty());
        assert_eq!(f.phone, NOT_FOUND);
    }

    #[test]
    fn test_numeric_phone_coerced_to_string() {
        let f = fields(json!({"phone": 5551234567u64}));
        assert_eq!(f.phone, "5551234567");
    }

    #[test]
    fn test_years_number_string_and_garbage() {
        assert_eq!(
            fields(json!({"total_experience_years": 4.5})).total_experience_years,
            json!(4.5)
        );
        assert_eq!(
            fields(json!({"total_experience_years": "7"})).total_experience_years,
            json!("7")
        );
        assert_eq!(
            fields(json!({"total_experience_years": "several"})).total_experience_years,
            json!(NOT_SPECIFIED)
        );
        assert_eq!(
            fields(json!({})).total_experience_years,
            json!(NOT_SPECIFIED)
        );
    }

    #[test]
    fn test_education_full_structured_entry() {
        let f = fields(json!({"education": [{
            "degree": "B.Sc",
            "field": "Computer Science",
            "institution": "MIT",
            "start_year": 2015,
            "year": 2019,
            "gpa": "3.8"
        }]}));
        assert_eq!(
            format_education(&f.education),
            vec!["B.Sc in Computer Science from MIT (2015 - 2019) - GPA: 3.8"]
        );
    }

    #[test]
    fn test_education_fallback_keys() {
        let f = fields(json!({"education": [{
            "qualification": "Masters",
            "university": "Oxford",
            "graduation_year": "2021"
        }]}));
        assert_eq!(
            format_education(&f.education),
            vec!["Masters from Oxford (2021)"]
        );
    }

    #[test]
    fn test_education_unknown_keys_become_pairs() {
        let f = fields(json!({"education": [{"campus": "North", "note": "honors"}]}));
        assert_eq!(format_education(&f.education), vec!["campus: North, note: honors"]);
    }

    #[test]
    fn test_education_string_entries_and_empty_list() {
        let f = fields(json!({"education": ["Self taught"]}));
        assert_eq!(format_education(&f.education), vec!["Self taught"]);
        assert_eq!(format_education(&[]), vec![NOT_SPECIFIED.to_string()]);
    }

    #[test]
    fn test_experience_duration_built_from_start_end() {
        let f = fields(json!({"experience": [{
            "company": "Acme",
            "position": "Engineer",
            "from": "2020",
            "to": "2022"
        }]}));
        let views = format_experience(&f.experience);
        assert_eq!(views[0].company, "Acme");
        assert_eq!(views[0].role, "Engineer");
        assert_eq!(views[0].duration, "2020 - 2022");
    }

    #[test]
    fn test_experience_open_ended_reads_present() {
        let f = fields(json!({"experience": [{"company": "Acme", "start_date": "2021"}]}));
        assert_eq!(format_experience(&f.experience)[0].duration, "2021 - Present");
    }

    #[test]
    fn test_experience_description_list_joins_with_pipes() {
        let f = fields(json!({"experience": [{
            "company": "Acme",
            "responsibilities": ["Built the API", "Ran deploys"]
        }]}));
        assert_eq!(
            format_experience(&f.experience)[0].description,
            "Built the API | Ran deploys"
        );
    }

    #[test]
    fn test_experience_string_entry() {
        let f = fields(json!({"experience": ["Freelance consultant, 2019"]}));
        let views = format_experience(&f.experience);
        assert_eq!(views[0].role, "Freelance consultant, 2019");
        assert_eq!(views[0].company, NOT_SPECIFIED);
    }

    #[test]
    fn test_project_name_fallbacks_and_tech_join() {
        let f = fields(json!({"projects": [
            {"project": "Search engine", "tech_stack": ["Rust", "Tantivy"]},
            {"description": "no name given"}
        ]}));
        let views = format_projects(&f.projects);
        assert_eq!(views[0].name, "Search engine");
        assert_eq!(views[0].technologies, "Rust, Tantivy");
        assert_eq!(views[1].name, "Unnamed Project");
    }

    #[test]
    fn test_certification_full_render() {
        let f = fields(json!({"certifications": [{
            "course": "AWS Solutions Architect",
            "platform": "Coursera",
            "date": 2023,
            "credential_id": "ABC-123"
        }]}));
        assert_eq!(
            format_certifications(&f.certifications),
            vec!["AWS Solutions Architect by Coursera (2023) [ID: ABC-123]"]
        );
    }

    #[test]
    fn test_certification_string_entry() {
        let f = fields(json!({"certifications": ["CKA 2022"]}));
        assert_eq!(format_certifications(&f.certifications), vec!["CKA 2022"]);
    }

    #[test]
    fn test_skills_list_skips_non_strings() {
        let f = fields(json!({"skills": ["Python", 42, null, "  ", "AWS"]}));
        assert_eq!(f.skills, vec!["Python".to_string(), "AWS".to_string()]);
    }

    #[test]
    fn test_job_match_tolerant_parsing() {
        let m = JobMatch::from_value(json!({
            "match_score": "72.5",
            "matching_skills": ["Python"],
            "recommendation": "Apply"
        }));
        assert_eq!(m.match_score, 72.5);
        assert_eq!(m.matching_skills, vec!["Python".to_string()]);
        assert!(m.missing_skills.is_empty());
        assert_eq!(m.recommendation, "Apply");

        let m = JobMatch::from_json_str("garbage");
        assert_eq!(m.match_score, 0.0);
        assert!(m.recommendation.is_empty());
    }
}
