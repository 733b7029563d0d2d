//! Skill Catalog — the canonical skill universe, loaded from a JSON file.
//!
//! The file maps category names to lists of display-form skill names (see
//! `assets/skills.json`). A broken or missing file never takes the service
//! down: the loader logs what went wrong and falls back to a small built-in
//! catalog so every endpoint keeps working.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::{info, warn};

/// Raw catalog file shape: category name -> skill display names.
/// BTreeMap keeps category iteration deterministic.
type CatalogFile = BTreeMap<String, Vec<String>>;

/// The canonical skill universe.
///
/// Invariant: the flattened universe is unique case-insensitively. A skill
/// listed under two categories keeps its first occurrence (categories in
/// sorted name order) and the duplicate is dropped with a warning.
pub struct SkillCatalog {
    /// Category -> display-form skills, duplicates already removed.
    categories: BTreeMap<String, Vec<String>>,
    /// Lowercased skill -> canonical display form.
    display: HashMap<String, String>,
}

impl SkillCatalog {
    /// Loads the catalog from `path`, falling back to `builtin_default` on
    /// any failure. Load problems are warnings, never startup errors.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                warn!("Skill catalog {} unreadable ({e}); using built-in catalog", path.display());
                return Self::builtin_default();
            }
        };

        match serde_json::from_str::<CatalogFile>(&raw) {
            Ok(parsed) => {
                let catalog = Self::from_categories(parsed);
                if catalog.is_empty() {
                    warn!("Skill catalog {} is empty; using built-in catalog", path.display());
                    return Self::builtin_default();
                }
                info!(
                    "Loaded skill catalog from {} ({} skills, {} categories)",
                    path.display(),
                    catalog.len(),
                    catalog.categories.len()
                );
                catalog
            }
            Err(e) => {
                warn!("Skill catalog {} is not valid JSON ({e}); using built-in catalog", path.display());
                Self::builtin_default()
            }
        }
    }

    /// The catalog shipped in the binary, used when no file is available.
    pub fn builtin_default() -> Self {
        let mut map = CatalogFile::new();
        map.insert(
            "programming_languages".to_string(),
            vec!["Python", "Java", "JavaScript", "C++"].into_iter().map(String::from).collect(),
        );
        map.insert(
            "web_frameworks".to_string(),
            vec!["React", "Django", "Flask", "Node.js"].into_iter().map(String::from).collect(),
        );
        map.insert(
            "databases".to_string(),
            vec!["MySQL", "PostgreSQL", "MongoDB"].into_iter().map(String::from).collect(),
        );
        map.insert(
            "ai_ml".to_string(),
            vec!["Machine Learning", "Deep Learning", "TensorFlow", "PyTorch"]
                .into_iter()
                .map(String::from)
                .collect(),
        );
        map.insert(
            "cloud_devops".to_string(),
            vec!["AWS", "Docker", "Kubernetes", "CI/CD"].into_iter().map(String::from).collect(),
        );
        Self::from_categories(map)
    }

    fn from_categories(raw: CatalogFile) -> Self {
        let mut categories = BTreeMap::new();
        let mut display: HashMap<String, String> = HashMap::new();

        for (category, skills) in raw {
            let mut kept = Vec::with_capacity(skills.len());
            for skill in skills {
                let trimmed = skill.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let key = trimmed.to_lowercase();
                if display.contains_key(&key) {
                    warn!("Duplicate skill '{trimmed}' in category '{category}' ignored");
                    continue;
                }
                display.insert(key, trimmed.to_string());
                kept.push(trimmed.to_string());
            }
            if !kept.is_empty() {
                categories.insert(category, kept);
            }
        }

        Self { categories, display }
    }

    /// Lowercased skill names, the universe `SkillMatcher::extract` scans for.
    pub fn flattened(&self) -> impl Iterator<Item = &str> {
        self.display.keys().map(String::as_str)
    }

    /// Canonical display form for a lowercased skill name.
    pub fn display_form(&self, lower: &str) -> Option<&str> {
        self.display.get(lower).map(String::as_str)
    }

    /// Groups `skills` by catalog category. A skill goes to the first
    /// category (sorted name order) that lists it; unknown skills are
    /// dropped. Input display forms are preserved in the output.
    pub fn categorize(&self, skills: &[String]) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for skill in skills {
            let lower = skill.to_lowercase();
            let category = self.categories.iter().find_map(|(name, members)| {
                members
                    .iter()
                    .any(|m| m.to_lowercase() == lower)
                    .then(|| name.clone())
            });
            if let Some(category) = category {
                grouped.entry(category).or_default().push(skill.clone());
            }
        }

        grouped
    }

    pub fn len(&self) -> usize {
        self.display.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_catalog(json: &str) -> SkillCatalog {
        let parsed: CatalogFile = serde_json::from_str(json).unwrap();
        SkillCatalog::from_categories(parsed)
    }

    #[test]
    fn test_builtin_default_has_expected_universe() {
        let catalog = SkillCatalog::builtin_default();
        assert_eq!(catalog.len(), 19);
        assert_eq!(catalog.display_form("python"), Some("Python"));
        assert_eq!(catalog.display_form("ci/cd"), Some("CI/CD"));
        assert_eq!(catalog.display_form("node.js"), Some("Node.js"));
        assert_eq!(catalog.display_form("cobol"), None);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let catalog = SkillCatalog::load(Path::new("/nonexistent/skills.json"));
        assert_eq!(catalog.len(), 19);
    }

    #[test]
    fn test_load_malformed_json_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        let catalog = SkillCatalog::load(file.path());
        assert_eq!(catalog.len(), 19);
    }

    #[test]
    fn test_load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"languages": ["Rust", "Go"], "tools": ["Git"]}"#)
            .unwrap();
        let catalog = SkillCatalog::load(file.path());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.display_form("rust"), Some("Rust"));
        assert_eq!(catalog.display_form("git"), Some("Git"));
    }

    #[test]
    fn test_duplicate_across_categories_keeps_first() {
        let catalog = make_catalog(r#"{"a_first": ["SQL"], "b_second": ["sql", "Redis"]}"#);
        assert_eq!(catalog.len(), 2);
        // First occurrence (category "a_first") defines the display form.
        assert_eq!(catalog.display_form("sql"), Some("SQL"));
        let grouped = catalog.categorize(&["SQL".to_string(), "Redis".to_string()]);
        assert_eq!(grouped.get("a_first").unwrap(), &vec!["SQL".to_string()]);
        assert_eq!(grouped.get("b_second").unwrap(), &vec!["Redis".to_string()]);
    }

    #[test]
    fn test_categorize_drops_unknown_and_keeps_input_form() {
        let catalog = SkillCatalog::builtin_default();
        let grouped = catalog.categorize(&[
            "python".to_string(),
            "Fortran".to_string(),
            "AWS".to_string(),
        ]);
        assert_eq!(
            grouped.get("programming_languages").unwrap(),
            &vec!["python".to_string()]
        );
        assert_eq!(grouped.get("cloud_devops").unwrap(), &vec!["AWS".to_string()]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn test_blank_entries_skipped() {
        let catalog = make_catalog(r#"{"languages": ["Rust", "  ", ""]}"#);
        assert_eq!(catalog.len(), 1);
    }
}
