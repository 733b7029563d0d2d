//! Skill Matcher — finds catalog skills in free text and compares skill sets.
//!
//! Extraction is whole-word and case-insensitive, with an alias table for
//! the abbreviations people actually write ("js", "k8s", "ml"). Boundary
//! checks are a manual scan rather than per-skill regexes: regex word
//! boundaries reject skills that end in symbols ("C++", "C#", "CI/CD") when
//! a space or end-of-text follows, and those are exactly the skills a resume
//! matcher cannot afford to miss.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::skills::catalog::SkillCatalog;

// ────────────────────────────────────────────────────────────────────────────
// Static tables
// ────────────────────────────────────────────────────────────────────────────

/// Abbreviation -> canonical display form. Keys are matched whole-word
/// against lowercased text; hits dedupe against direct catalog hits.
static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("js", "JavaScript"),
        ("ts", "TypeScript"),
        ("react.js", "React"),
        ("vue.js", "Vue.js"),
        ("node.js", "Node.js"),
        ("ml", "Machine Learning"),
        ("dl", "Deep Learning"),
        ("nlp", "NLP"),
        ("cv", "Computer Vision"),
        ("aws", "AWS"),
        ("gcp", "Google Cloud"),
        ("k8s", "Kubernetes"),
    ])
});

/// Held skill (lowercase) -> skills commonly learned next to it.
static ADJACENT_SKILLS: &[(&str, &[&str])] = &[
    ("python", &["Django", "Flask", "FastAPI", "Pandas", "NumPy"]),
    ("javascript", &["React", "Node.js", "TypeScript", "Vue.js"]),
    (
        "machine learning",
        &["TensorFlow", "PyTorch", "Scikit-learn", "Deep Learning"],
    ),
    ("react", &["Next.js", "Redux", "TypeScript", "Node.js"]),
    ("aws", &["Docker", "Kubernetes", "Terraform", "CI/CD"]),
];

const MAX_SUGGESTIONS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Comparison result
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of comparing a candidate's skills against a requirement list.
///
/// `matched` and `missing` partition the deduplicated requirement list:
/// their union is that list and they never overlap. `suggested` is what the
/// candidate could learn next given what they already hold.
#[derive(Debug, Clone, Serialize)]
pub struct SkillComparison {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub suggested: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher
// ────────────────────────────────────────────────────────────────────────────

pub struct SkillMatcher {
    catalog: Arc<SkillCatalog>,
}

impl SkillMatcher {
    pub fn new(catalog: Arc<SkillCatalog>) -> Self {
        Self { catalog }
    }

    /// Scans `text` for catalog skills and aliases. Returns canonical display
    /// forms, deduplicated case-insensitively, sorted case-insensitively.
    pub fn extract(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let text_lower = text.to_lowercase();
        // Keyed by lowercase so an alias hit and a direct hit collapse.
        let mut found: BTreeMap<String, String> = BTreeMap::new();

        for skill_lower in self.catalog.flattened() {
            if contains_whole_word(&text_lower, skill_lower) {
                let display = self
                    .catalog
                    .display_form(skill_lower)
                    .unwrap_or(skill_lower)
                    .to_string();
                found.insert(skill_lower.to_string(), display);
            }
        }

        for (abbrev, canonical) in ALIASES.iter() {
            if contains_whole_word(&text_lower, abbrev) {
                found
                    .entry(canonical.to_lowercase())
                    .or_insert_with(|| canonical.to_string());
            }
        }

        let mut skills: Vec<String> = found.into_values().collect();
        sort_case_insensitive(&mut skills);
        skills
    }

    /// Partitions a deduplicated view of `required` by case-insensitive
    /// membership in `candidate`, and attaches suggestions derived from what
    /// the candidate holds. Empty `required` yields empty matched/missing.
    pub fn compare(&self, candidate: &[String], required: &[String]) -> SkillComparison {
        let held: HashSet<String> = candidate.iter().map(|s| s.to_lowercase()).collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for skill in required {
            let lower = skill.to_lowercase();
            if !seen.insert(lower.clone()) {
                continue;
            }
            if held.contains(&lower) {
                matched.push(skill.clone());
            } else {
                missing.push(skill.clone());
            }
        }

        sort_case_insensitive(&mut matched);
        sort_case_insensitive(&mut missing);

        SkillComparison {
            matched,
            missing,
            suggested: self.suggest(candidate),
        }
    }

    /// Skills adjacent to what the candidate already holds, minus anything
    /// already held, sorted, capped at 5.
    pub fn suggest(&self, current: &[String]) -> Vec<String> {
        let held: HashSet<String> = current.iter().map(|s| s.to_lowercase()).collect();
        let mut suggestions: BTreeMap<String, String> = BTreeMap::new();

        for skill in current {
            let lower = skill.to_lowercase();
            let Some((_, related)) = ADJACENT_SKILLS.iter().find(|(k, _)| *k == lower) else {
                continue;
            };
            for candidate in *related {
                let candidate_lower = candidate.to_lowercase();
                if held.contains(&candidate_lower) {
                    continue;
                }
                suggestions
                    .entry(candidate_lower)
                    .or_insert_with(|| candidate.to_string());
            }
        }

        let mut out: Vec<String> = suggestions.into_values().collect();
        sort_case_insensitive(&mut out);
        out.truncate(MAX_SUGGESTIONS);
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Word-boundary scan
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `needle` occurs in `haystack` with no word character touching
/// either end of the hit. Both arguments must already be lowercased.
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    for (idx, _) in haystack.match_indices(needle) {
        let before_ok = haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let end = idx + needle.len();
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

fn sort_case_insensitive(skills: &mut [String]) {
    skills.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_matcher() -> SkillMatcher {
        SkillMatcher::new(Arc::new(SkillCatalog::builtin_default()))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── extract ────────────────────────────────────────────────────────────

    #[test]
    fn test_extract_direct_and_alias_hits_dedupe() {
        let matcher = make_matcher();
        let skills = matcher.extract("I know Python and AWS, and a bit of js");
        assert_eq!(skills, strings(&["AWS", "JavaScript", "Python"]));
    }

    #[test]
    fn test_extract_is_case_insensitive_and_canonical() {
        let matcher = make_matcher();
        let skills = matcher.extract("PYTHON, python and Python");
        assert_eq!(skills, strings(&["Python"]));
    }

    #[test]
    fn test_extract_requires_whole_words() {
        let matcher = make_matcher();
        // "Pythonista" and "javascripting" must not count as hits.
        assert!(matcher.extract("A true Pythonista").is_empty());
        assert!(matcher.extract("always javascripting around").is_empty());
        assert_eq!(matcher.extract("snake_python_case"), Vec::<String>::new());
    }

    #[test]
    fn test_extract_symbol_skills_at_word_edges() {
        let matcher = make_matcher();
        assert_eq!(matcher.extract("Fluent in C++"), strings(&["C++"]));
        assert_eq!(matcher.extract("C++, Java."), strings(&["C++", "Java"]));
        // Version suffix keeps it from being the bare skill.
        assert!(matcher.extract("loves c++11 only").is_empty());
    }

    #[test]
    fn test_extract_alias_k8s_and_gcp() {
        let matcher = make_matcher();
        let skills = matcher.extract("deployed on k8s in gcp");
        assert_eq!(skills, strings(&["Google Cloud", "Kubernetes"]));
    }

    #[test]
    fn test_extract_empty_text() {
        let matcher = make_matcher();
        assert!(matcher.extract("").is_empty());
        assert!(matcher.extract("   \n ").is_empty());
    }

    #[test]
    fn test_extract_node_js_implies_javascript_alias() {
        let matcher = make_matcher();
        // "js" occurs whole-word inside "node.js" ('.' is not a word char).
        let skills = matcher.extract("Building services in node.js");
        assert_eq!(skills, strings(&["JavaScript", "Node.js"]));
    }

    // ── compare ────────────────────────────────────────────────────────────

    #[test]
    fn test_compare_partitions_required() {
        let matcher = make_matcher();
        let result = matcher.compare(
            &strings(&["Python", "AWS"]),
            &strings(&["Python", "Docker", "AWS"]),
        );
        assert_eq!(result.matched, strings(&["AWS", "Python"]));
        assert_eq!(result.missing, strings(&["Docker"]));
    }

    #[test]
    fn test_compare_empty_required() {
        let matcher = make_matcher();
        let result = matcher.compare(&strings(&["Python"]), &[]);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_compare_is_case_insensitive() {
        let matcher = make_matcher();
        let result = matcher.compare(&strings(&["python"]), &strings(&["Python", "PYTHON"]));
        // Duplicate requirement collapses; candidate case does not matter.
        assert_eq!(result.matched, strings(&["Python"]));
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_compare_matched_and_missing_never_overlap() {
        let matcher = make_matcher();
        let result = matcher.compare(
            &strings(&["React", "Java"]),
            &strings(&["Java", "React", "Rust", "Go"]),
        );
        for m in &result.matched {
            assert!(!result.missing.contains(m), "{m} appears in both lists");
        }
        assert_eq!(result.matched.len() + result.missing.len(), 4);
    }

    // ── suggest ────────────────────────────────────────────────────────────

    #[test]
    fn test_suggest_for_python() {
        let matcher = make_matcher();
        let suggestions = matcher.suggest(&strings(&["Python"]));
        assert_eq!(
            suggestions,
            strings(&["Django", "FastAPI", "Flask", "NumPy", "Pandas"])
        );
    }

    #[test]
    fn test_suggest_excludes_already_held() {
        let matcher = make_matcher();
        let suggestions = matcher.suggest(&strings(&["Python", "Django", "Flask"]));
        assert!(!suggestions.contains(&"Django".to_string()));
        assert!(!suggestions.contains(&"Flask".to_string()));
        assert!(suggestions.contains(&"FastAPI".to_string()));
    }

    #[test]
    fn test_suggest_caps_at_five() {
        let matcher = make_matcher();
        let suggestions = matcher.suggest(&strings(&["Python", "JavaScript", "AWS"]));
        assert_eq!(suggestions.len(), 5);
    }

    #[test]
    fn test_suggest_unknown_skills_yield_nothing() {
        let matcher = make_matcher();
        assert!(matcher.suggest(&strings(&["Basket Weaving"])).is_empty());
        assert!(matcher.suggest(&[]).is_empty());
    }

    // ── boundary scan ──────────────────────────────────────────────────────

    #[test]
    fn test_contains_whole_word_edges() {
        assert!(contains_whole_word("c++", "c++"));
        assert!(contains_whole_word("knows c#", "c#"));
        assert!(contains_whole_word("ci/cd pipelines", "ci/cd"));
        assert!(!contains_whole_word("c++11", "c++"));
        assert!(!contains_whole_word("scala", "ala"));
        assert!(!contains_whole_word("snake_case", "snake"));
        assert!(!contains_whole_word("anything", ""));
    }

    #[test]
    fn test_contains_whole_word_second_occurrence_counts() {
        // First hit is embedded, second stands alone.
        assert!(contains_whole_word("pythonic code in python", "python"));
    }
}
