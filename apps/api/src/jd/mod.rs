//! Job Description processor — rule-based structure extraction from raw JD
//! text: title, required skills, experience, education, seniority and
//! responsibilities. No model involved; everything here is keyword and
//! pattern driven so it works identically with or without the parser
//! collaborator configured.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::skills::matcher::{is_word_char, SkillMatcher};

pub const NOT_SPECIFIED: &str = "Not specified";

const TITLE_KEYWORDS: &[&str] = &[
    "engineer",
    "developer",
    "scientist",
    "analyst",
    "manager",
    "architect",
    "consultant",
    "specialist",
    "lead",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "degree", "b.tech", "m.tech", "graduate", "diploma",
];

const SECTION_KEYWORDS: &[&str] = &["responsibilities", "what you will do", "role", "duties"];
const SECTION_TERMINATORS: &[&str] = &["\n\n", "requirements", "qualifications"];

const TITLE_SCAN_LINES: usize = 5;
const MIN_RESPONSIBILITY_CHARS: usize = 20;
const MAX_RESPONSIBILITIES: usize = 5;

static EXPERIENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\d+\+?\s*years?\s+(?:of\s+)?experience",
        r"(?i)experience[:\s]+\d+\+?\s*years?",
        r"(?i)\d+\s*-\s*\d+\s*years?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("experience pattern is valid"))
    .collect()
});

/// Seniority buckets, checked in this order; first hit wins, default Mid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Seniority {
    Entry,
    Mid,
    Senior,
    Expert,
}

const SENIORITY_BUCKETS: &[(Seniority, &[&str])] = &[
    (
        Seniority::Entry,
        &["junior", "entry level", "graduate", "fresher", "0-2 years"],
    ),
    (
        Seniority::Mid,
        &["mid level", "intermediate", "2-5 years", "3-5 years"],
    ),
    (
        Seniority::Senior,
        &["senior", "lead", "principal", "5+ years", "7+ years"],
    ),
    (
        Seniority::Expert,
        &["expert", "architect", "director", "head", "10+ years"],
    ),
];

/// Structured view of a job description.
#[derive(Debug, Clone, Serialize)]
pub struct JdSummary {
    pub job_title: String,
    pub required_skills: Vec<String>,
    pub experience_required: String,
    pub education_required: Vec<String>,
    pub seniority_level: Seniority,
    pub responsibilities: Vec<String>,
}

pub struct JobDescriptionProcessor {
    matcher: Arc<SkillMatcher>,
}

impl JobDescriptionProcessor {
    pub fn new(matcher: Arc<SkillMatcher>) -> Self {
        Self { matcher }
    }

    pub fn process(&self, jd_text: &str) -> JdSummary {
        JdSummary {
            job_title: extract_job_title(jd_text),
            required_skills: self.matcher.extract(jd_text),
            experience_required: extract_experience(jd_text),
            education_required: extract_education(jd_text),
            seniority_level: detect_seniority(jd_text),
            responsibilities: extract_responsibilities(jd_text),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction rules
// ────────────────────────────────────────────────────────────────────────────

/// First line among the first five that mentions a title keyword.
fn extract_job_title(text: &str) -> String {
    for line in text.lines().take(TITLE_SCAN_LINES) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if TITLE_KEYWORDS
            .iter()
            .any(|kw| find_ascii_ci(trimmed, kw).is_some())
        {
            return trimmed.to_string();
        }
    }
    NOT_SPECIFIED.to_string()
}

/// First experience phrase matched by the patterns, exactly as written.
fn extract_experience(text: &str) -> String {
    for pattern in EXPERIENCE_PATTERNS.iter() {
        if let Some(m) = pattern.find(text) {
            return m.as_str().to_string();
        }
    }
    NOT_SPECIFIED.to_string()
}

/// Title-cased education keywords present anywhere in the text.
fn extract_education(text: &str) -> Vec<String> {
    let hits: Vec<String> = EDUCATION_KEYWORDS
        .iter()
        .filter(|kw| find_ascii_ci(text, kw).is_some())
        .map(|kw| title_case(kw))
        .collect();

    if hits.is_empty() {
        vec![NOT_SPECIFIED.to_string()]
    } else {
        hits
    }
}

fn detect_seniority(text: &str) -> Seniority {
    for (level, keywords) in SENIORITY_BUCKETS {
        if keywords.iter().any(|kw| find_ascii_ci(text, kw).is_some()) {
            return *level;
        }
    }
    Seniority::Mid
}

/// Bullet items from the responsibilities section: starts at the first
/// section keyword present as a whole word (so "role" inside "parole" does
/// not open a section), ends at the earliest blank line or
/// "requirements"/"qualifications" mention, split on bullets and newlines,
/// short fragments dropped.
fn extract_responsibilities(text: &str) -> Vec<String> {
    let mut section_bounds = None;
    for kw in SECTION_KEYWORDS {
        if let Some(pos) = find_ascii_ci_word(text, kw) {
            section_bounds = Some((pos, pos + kw.len()));
            break;
        }
    }
    let Some((start, search_from)) = section_bounds else {
        return Vec::new();
    };

    let tail = &text[search_from..];
    let section_end = SECTION_TERMINATORS
        .iter()
        .filter_map(|t| find_ascii_ci(tail, t))
        .min()
        .map(|rel| search_from + rel)
        .unwrap_or(text.len());

    text[start..section_end]
        .split(['\u{2022}', '-', '*', '\n'])
        .map(str::trim)
        .filter(|item| item.chars().count() > MIN_RESPONSIBILITY_CHARS)
        .take(MAX_RESPONSIBILITIES)
        .map(String::from)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
/// Needles are ASCII keywords, so a returned offset is always a char
/// boundary in `haystack`.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || n.len() > h.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Like `find_ascii_ci`, but the hit must not touch a word character on
/// either side. Needles start and end with ASCII, so offset arithmetic
/// stays on char boundaries.
fn find_ascii_ci_word(haystack: &str, needle: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = find_ascii_ci(&haystack[from..], needle) {
        let idx = from + rel;
        let end = idx + needle.len();
        let before_ok = haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            return Some(idx);
        }
        from = idx + 1;
    }
    None
}

/// Uppercases the first letter of every alphabetic run. Inputs are the
/// lowercase keyword constants ("b.tech" -> "B.Tech", "phd" -> "Phd").
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
                at_word_start = false;
            } else {
                out.push(c);
            }
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::catalog::SkillCatalog;

    fn make_processor() -> JobDescriptionProcessor {
        JobDescriptionProcessor::new(Arc::new(SkillMatcher::new(Arc::new(
            SkillCatalog::builtin_default(),
        ))))
    }

    const SAMPLE_JD: &str = "Senior Backend Engineer\n\
        Acme Corp, Berlin\n\
        \n\
        We need 5+ years of experience with Python and AWS.\n\
        Bachelor degree required.\n\
        \n\
        Responsibilities:\n\
        \u{2022} Design and operate highly available backend services\n\
        \u{2022} Mentor new engineers across the platform teams\n\
        \n\
        Requirements: Python, AWS, Docker knowledge.";

    #[test]
    fn test_process_sample_jd() {
        let summary = make_processor().process(SAMPLE_JD);
        assert_eq!(summary.job_title, "Senior Backend Engineer");
        assert_eq!(summary.experience_required, "5+ years of experience");
        assert_eq!(summary.seniority_level, Seniority::Senior);
        assert!(summary.required_skills.contains(&"Python".to_string()));
        assert!(summary.required_skills.contains(&"AWS".to_string()));
        assert_eq!(
            summary.education_required,
            vec!["Bachelor".to_string(), "Degree".to_string()]
        );
        assert_eq!(summary.responsibilities.len(), 2);
        assert_eq!(
            summary.responsibilities[0],
            "Design and operate highly available backend services"
        );
    }

    #[test]
    fn test_job_title_only_in_first_five_lines() {
        let text = "line one\nline two\nline three\nline four\nline five\nSoftware Engineer";
        assert_eq!(extract_job_title(text), NOT_SPECIFIED);
        let text = "Some intro\nStaff Developer wanted\nmore text";
        assert_eq!(extract_job_title(text), "Staff Developer wanted");
    }

    #[test]
    fn test_experience_pattern_variants() {
        assert_eq!(extract_experience("Experience: 3 years minimum"), "Experience: 3 years");
        assert_eq!(extract_experience("needs 2 - 4 years in ops"), "2 - 4 years");
        assert_eq!(extract_experience("7 years experience preferred"), "7 years experience");
        assert_eq!(extract_experience("no numbers here"), NOT_SPECIFIED);
    }

    #[test]
    fn test_education_defaults_when_absent() {
        assert_eq!(extract_education("we hire anyone"), vec![NOT_SPECIFIED.to_string()]);
        assert_eq!(
            extract_education("B.Tech or M.Tech welcome"),
            vec!["B.Tech".to_string(), "M.Tech".to_string()]
        );
    }

    #[test]
    fn test_seniority_bucket_order() {
        assert_eq!(detect_seniority("junior role"), Seniority::Entry);
        assert_eq!(detect_seniority("intermediate position"), Seniority::Mid);
        assert_eq!(detect_seniority("principal engineer"), Seniority::Senior);
        assert_eq!(detect_seniority("solutions architect"), Seniority::Expert);
        assert_eq!(detect_seniority("a plain job ad"), Seniority::Mid);
        // First bucket in order wins when several match.
        assert_eq!(detect_seniority("junior to senior"), Seniority::Entry);
    }

    #[test]
    fn test_responsibilities_stop_at_blank_line() {
        let items = extract_responsibilities(SAMPLE_JD);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| !i.to_lowercase().contains("requirements")));
    }

    #[test]
    fn test_responsibilities_capped_at_five() {
        let text = "Duties:\n\
            * First responsibility item with enough characters here\n\
            * Second responsibility item with enough characters too\n\
            * Third responsibility item with enough characters also\n\
            * Fourth responsibility item with enough characters yes\n\
            * Fifth responsibility item with enough characters sure\n\
            * Sixth responsibility item with enough characters more";
        assert_eq!(extract_responsibilities(text).len(), 5);
    }

    #[test]
    fn test_responsibilities_absent_section() {
        assert!(extract_responsibilities("just a short ad").is_empty());
    }

    #[test]
    fn test_responsibilities_keyword_must_be_whole_word() {
        // "role" embedded in "parole" must not open a section.
        let text = "Parole officer supervision program\n\
            Support people released on parole throughout the county.";
        assert!(extract_responsibilities(text).is_empty());

        let text = "Role:\n\
            * Coordinate with parole officers across the district\n\
            \n\
            Requirements: patience";
        let items = extract_responsibilities(text);
        assert_eq!(
            items,
            vec!["Coordinate with parole officers across the district".to_string()]
        );
    }

    #[test]
    fn test_find_ascii_ci_word_boundaries() {
        assert_eq!(find_ascii_ci_word("his role here", "role"), Some(4));
        assert_eq!(find_ascii_ci_word("on parole here", "role"), None);
        // Embedded first occurrence is skipped for a later standalone one.
        assert_eq!(find_ascii_ci_word("parole, then Role:", "role"), Some(13));
        assert_eq!(find_ascii_ci_word("Duties: several", "duties"), Some(0));
    }

    #[test]
    fn test_find_ascii_ci() {
        assert_eq!(find_ascii_ci("Hello World", "world"), Some(6));
        assert_eq!(find_ascii_ci("abc", "zzz"), None);
        assert_eq!(find_ascii_ci("abc", ""), None);
        // Multi-byte text before the match keeps the offset a char boundary.
        let s = "café Responsibilities";
        let off = find_ascii_ci(s, "responsibilities").unwrap();
        assert_eq!(&s[off..], "Responsibilities");
    }

    #[test]
    fn test_title_case_keywords() {
        assert_eq!(title_case("bachelor"), "Bachelor");
        assert_eq!(title_case("b.tech"), "B.Tech");
        assert_eq!(title_case("phd"), "Phd");
    }
}
