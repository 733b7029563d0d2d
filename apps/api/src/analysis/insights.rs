//! Strengths and improvement suggestions for the fit report.

use std::collections::HashSet;

/// Skills worth surfacing even when the JD does not ask for them.
pub const HIGH_VALUE_SKILLS: &[&str] = &[
    "machine learning",
    "deep learning",
    "aws",
    "kubernetes",
    "docker",
    "tensorflow",
    "pytorch",
    "react",
    "node.js",
    "python",
    "java",
    "sql",
    "mongodb",
    "azure",
    "gcp",
    "javascript",
    "typescript",
    "data analysis",
    "nlp",
    "computer vision",
    "api development",
    "microservices",
    "system design",
    "agile",
    "ci/cd",
];

const MAX_STRENGTHS: usize = 10;
const MAX_SUGGESTIONS: usize = 5;
const FOCUS_SKILLS: usize = 3;

/// Resume skills worth calling out: everything the JD asks for comes first,
/// then held high-value skills the JD did not mention. Resume order within
/// each group, deduplicated case-insensitively, capped at 10.
pub fn identify_strengths(resume_skills: &[String], jd_skills: &[String]) -> Vec<String> {
    let required: HashSet<String> = jd_skills.iter().map(|s| s.to_lowercase()).collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut strengths = Vec::new();

    for skill in resume_skills {
        let lower = skill.to_lowercase();
        if required.contains(&lower) && seen.insert(lower) {
            strengths.push(skill.clone());
        }
    }
    for skill in resume_skills {
        let lower = skill.to_lowercase();
        if HIGH_VALUE_SKILLS.contains(&lower.as_str()) && seen.insert(lower) {
            strengths.push(skill.clone());
        }
    }

    strengths.truncate(MAX_STRENGTHS);
    strengths
}

/// Actionable next steps, most urgent first, capped at 5. The closing two
/// generic tips are always appended (and survive the cap only when more
/// specific advice does not fill it).
pub fn suggest_improvements(
    missing: &[String],
    matched_count: usize,
    overall_score: f64,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if overall_score < 60.0 {
        suggestions
            .push("Consider taking online courses to build missing technical skills".to_string());
        suggestions.push("Work on personal projects that demonstrate the required skills".to_string());
    }

    if !missing.is_empty() {
        let focus: Vec<&str> = missing.iter().take(FOCUS_SKILLS).map(String::as_str).collect();
        suggestions.push(format!("Focus on learning: {}", focus.join(", ")));
    }

    if matched_count < 5 {
        suggestions
            .push("Add more relevant keywords from the job description to your resume".to_string());
    }

    suggestions.push("Quantify your achievements with metrics where possible".to_string());
    suggestions.push("Tailor your resume summary to match the job requirements".to_string());

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
