//! Fit Analyzer — the full resume-vs-JD pipeline behind one call.
//!
//! Synchronous on purpose: handlers run it inside `spawn_blocking` with a
//! timeout around it, so everything here can stay simple straight-line
//! code. The similarity backend was chosen at startup; the analyzer never
//! cares which one it got.

use std::sync::Arc;

use serde::Serialize;

use crate::analysis::insights::{identify_strengths, suggest_improvements};
use crate::analysis::normalize::clean_text;
use crate::analysis::roles::predict_roles;
use crate::analysis::scoring::{percentage, recommend, skill_match_score, Recommendation, ScoreBreakdown};
use crate::similarity::SimilarityEngine;
use crate::skills::matcher::{SkillComparison, SkillMatcher};

/// Complete fit report for one resume against one job description.
#[derive(Debug, Clone, Serialize)]
pub struct FitAnalysis {
    pub scores: ScoreBreakdown,
    pub comparison: SkillComparison,
    pub strengths: Vec<String>,
    pub predicted_roles: Vec<String>,
    pub recommendation: Recommendation,
    pub improvement_suggestions: Vec<String>,
}

pub struct FitAnalyzer {
    matcher: Arc<SkillMatcher>,
    similarity: Arc<SimilarityEngine>,
}

impl FitAnalyzer {
    pub fn new(matcher: Arc<SkillMatcher>, similarity: Arc<SimilarityEngine>) -> Self {
        Self { matcher, similarity }
    }

    /// Scores and narrates the fit. `resume_skills` is whatever the caller
    /// trusts as the candidate's skills (extraction, parser output, or
    /// both); `jd_skills` is the requirement list.
    pub fn analyze(
        &self,
        resume_text: &str,
        jd_text: &str,
        resume_skills: &[String],
        jd_skills: &[String],
    ) -> FitAnalysis {
        let (scores, comparison) =
            self.score_with_comparison(resume_text, jd_text, resume_skills, jd_skills);

        let recommendation = recommend(scores.overall_score);
        let strengths = identify_strengths(resume_skills, jd_skills);
        let predicted_roles = predict_roles(resume_skills);
        let improvement_suggestions = suggest_improvements(
            &comparison.missing,
            comparison.matched.len(),
            scores.overall_score,
        );

        FitAnalysis {
            scores,
            comparison,
            strengths,
            predicted_roles,
            recommendation,
            improvement_suggestions,
        }
    }

    /// The numbers alone, for callers that rank rather than narrate.
    pub fn score(
        &self,
        resume_text: &str,
        jd_text: &str,
        resume_skills: &[String],
        jd_skills: &[String],
    ) -> ScoreBreakdown {
        self.score_with_comparison(resume_text, jd_text, resume_skills, jd_skills)
            .0
    }

    fn score_with_comparison(
        &self,
        resume_text: &str,
        jd_text: &str,
        resume_skills: &[String],
        jd_skills: &[String],
    ) -> (ScoreBreakdown, SkillComparison) {
        // 1. Normalize both texts so the backend sees the same vocabulary
        //    extraction saw.
        let resume_clean = clean_text(resume_text);
        let jd_clean = clean_text(jd_text);

        // 2. Semantic similarity as a percentage.
        let semantic_pct = f64::from(self.similarity.similarity(&resume_clean, &jd_clean)) * 100.0;

        // 3. Requirement coverage from the raw lists.
        let skill_pct = skill_match_score(resume_skills, jd_skills);

        // 4. Partition the requirements for the report.
        let comparison = self.matcher.compare(resume_skills, jd_skills);

        // 5. Match rate over the normalized requirement view.
        let normalized_total = comparison.matched.len() + comparison.missing.len();
        let match_rate_pct = percentage(comparison.matched.len(), normalized_total);

        (
            ScoreBreakdown::from_components(semantic_pct, skill_pct, match_rate_pct),
            comparison,
        )
    }
}
