//! Score composition and recommendation tiers.
//!
//! Every percentage leaving this module is rounded to exactly two decimal
//! places. The overall score is always the weighted blend of its (already
//! rounded) components; nothing anywhere sets it independently.

use std::collections::HashSet;

use serde::Serialize;

pub const SEMANTIC_WEIGHT: f64 = 0.4;
pub const SKILL_WEIGHT: f64 = 0.6;

/// The numeric heart of a fit report.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub overall_score: f64,
    pub semantic_similarity: f64,
    pub skill_match: f64,
    pub match_rate: f64,
}

impl ScoreBreakdown {
    /// Builds a breakdown from raw percentage components. Components are
    /// rounded first; the overall is the weighted blend of the rounded
    /// values, rounded again, so reported numbers always reproduce it.
    pub fn from_components(semantic_pct: f64, skill_pct: f64, match_rate_pct: f64) -> Self {
        let semantic_similarity = round2(semantic_pct);
        let skill_match = round2(skill_pct);
        let overall_score = round2(SEMANTIC_WEIGHT * semantic_similarity + SKILL_WEIGHT * skill_match);
        Self {
            overall_score,
            semantic_similarity,
            skill_match,
            match_rate: round2(match_rate_pct),
        }
    }
}

/// Share of `jd_skills` present in `resume_skills` (case-insensitive), as a
/// percentage. An empty requirement list scores 0.0.
pub fn skill_match_score(resume_skills: &[String], jd_skills: &[String]) -> f64 {
    if jd_skills.is_empty() {
        return 0.0;
    }
    let held: HashSet<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();
    let hits = jd_skills
        .iter()
        .filter(|s| held.contains(&s.to_lowercase()))
        .count();
    round2(hits as f64 / jd_skills.len() as f64 * 100.0)
}

/// Percentage form of `matched / total`, 0.0 when `total` is zero.
pub fn percentage(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(matched as f64 / total as f64 * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Recommendation tiers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLevel {
    Excellent,
    Good,
    Moderate,
    NeedsImprovement,
}

/// Verdict shown to the candidate. `color` is the UI accent the tier has
/// always shipped with; clients key off `level`.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub level: RecommendationLevel,
    pub message: &'static str,
    pub advice: &'static str,
    pub color: &'static str,
}

/// Maps an overall score to its tier. Boundaries are inclusive upward:
/// 80 is excellent, 60 is good, 40 is moderate.
pub fn recommend(overall_score: f64) -> Recommendation {
    if overall_score >= 80.0 {
        Recommendation {
            level: RecommendationLevel::Excellent,
            message: "Excellent Match! Your resume is highly aligned with this job description.",
            advice: "You should definitely apply! Make sure to highlight your matching skills in your cover letter.",
            color: "#28a745",
        }
    } else if overall_score >= 60.0 {
        Recommendation {
            level: RecommendationLevel::Good,
            message: "Good Match! Your profile shows good alignment with the job requirements.",
            advice: "Consider emphasizing your matched skills and learning the missing skills if possible.",
            color: "#ffc107",
        }
    } else if overall_score >= 40.0 {
        Recommendation {
            level: RecommendationLevel::Moderate,
            message: "Moderate Match. There are some gaps between your profile and job requirements.",
            advice: "Focus on building the missing skills through projects, courses, and certifications.",
            color: "#fd7e14",
        }
    } else {
        Recommendation {
            level: RecommendationLevel::NeedsImprovement,
            message: "Needs Improvement. There is a significant gap between your profile and job requirements.",
            advice: "Consider gaining more experience in the required skills before applying.",
            color: "#dc3545",
        }
    }
}
