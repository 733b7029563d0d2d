//! Role prediction from a skill list.
//!
//! Clusters are evaluated in a fixed order; a cluster fires when any of its
//! trigger skills is held (exact, case-insensitive). Two clusters have
//! non-standard rules: full-stack fires only when both the backend and
//! frontend clusters fired, and the database cluster fires only when
//! nothing has fired before it (a DBA-only profile should not label every
//! backend developer a DBA).

use std::collections::HashSet;

use once_cell::sync::Lazy;

const MAX_ROLES: usize = 8;

/// Fallback when no cluster fires.
pub const DEFAULT_ROLES: &[&str] = &["Software Engineer", "Technical Consultant"];

enum ClusterRule {
    /// Fires on any trigger hit.
    Always,
    /// Fires when all named clusters have already fired; triggers unused.
    RequiresAll(&'static [&'static str]),
    /// Fires on a trigger hit only while no role has been predicted yet.
    OnlyIfNoneMatched,
}

struct RoleCluster {
    name: &'static str,
    triggers: &'static [&'static str],
    roles: &'static [&'static str],
    rule: ClusterRule,
}

static ROLE_CLUSTERS: Lazy<Vec<RoleCluster>> = Lazy::new(|| {
    vec![
        RoleCluster {
            name: "ai_ml",
            triggers: &[
                "machine learning",
                "deep learning",
                "tensorflow",
                "pytorch",
                "nlp",
                "computer vision",
                "artificial intelligence",
                "neural networks",
                "keras",
                "scikit-learn",
                "opencv",
                "transformers",
                "huggingface",
            ],
            roles: &["Machine Learning Engineer", "AI Engineer"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "nlp",
            triggers: &["nlp", "natural language processing"],
            roles: &["NLP Engineer"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "computer_vision",
            triggers: &["computer vision", "opencv"],
            roles: &["Computer Vision Engineer"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "data_science",
            triggers: &[
                "data analysis",
                "pandas",
                "numpy",
                "statistics",
                "data visualization",
                "tableau",
                "power bi",
                "matplotlib",
                "seaborn",
                "data science",
                "r programming",
            ],
            roles: &["Data Scientist", "Data Analyst"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "data_engineering",
            triggers: &[
                "apache spark",
                "hadoop",
                "airflow",
                "etl",
                "data pipeline",
                "kafka",
                "data warehouse",
                "bigquery",
                "snowflake",
                "databricks",
            ],
            roles: &["Data Engineer"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "backend",
            triggers: &[
                "python",
                "java",
                "node.js",
                "django",
                "flask",
                "fastapi",
                "spring boot",
                "express.js",
                "ruby on rails",
                "golang",
                "rust",
                ".net",
                "c#",
                "php",
                "laravel",
            ],
            roles: &["Backend Developer", "Software Engineer"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "frontend",
            triggers: &[
                "react",
                "angular",
                "vue.js",
                "javascript",
                "typescript",
                "html",
                "css",
                "next.js",
                "svelte",
                "tailwind",
                "bootstrap",
                "sass",
                "redux",
                "webpack",
            ],
            roles: &["Frontend Developer", "UI Developer"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "full_stack",
            triggers: &[],
            roles: &["Full Stack Developer"],
            rule: ClusterRule::RequiresAll(&["backend", "frontend"]),
        },
        RoleCluster {
            name: "devops",
            triggers: &[
                "docker",
                "kubernetes",
                "aws",
                "azure",
                "ci/cd",
                "jenkins",
                "terraform",
                "ansible",
                "gcp",
                "linux",
                "devops",
                "helm",
                "prometheus",
                "grafana",
                "nginx",
            ],
            roles: &["DevOps Engineer", "Cloud Engineer", "SRE"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "mobile",
            triggers: &[
                "android",
                "ios",
                "flutter",
                "react native",
                "swift",
                "kotlin",
                "xamarin",
                "ionic",
                "mobile development",
            ],
            roles: &["Mobile Developer"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "security",
            triggers: &[
                "cybersecurity",
                "penetration testing",
                "security",
                "ethical hacking",
                "siem",
                "soc",
                "vulnerability assessment",
                "network security",
            ],
            roles: &["Security Engineer"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "database",
            triggers: &[
                "sql",
                "mysql",
                "postgresql",
                "mongodb",
                "redis",
                "database",
                "oracle",
                "cassandra",
                "elasticsearch",
                "dynamodb",
            ],
            roles: &["Database Administrator"],
            rule: ClusterRule::OnlyIfNoneMatched,
        },
        RoleCluster {
            name: "qa",
            triggers: &[
                "selenium",
                "testing",
                "qa",
                "automation testing",
                "cypress",
                "jest",
                "junit",
                "test automation",
                "quality assurance",
            ],
            roles: &["QA Engineer"],
            rule: ClusterRule::Always,
        },
        RoleCluster {
            name: "pm",
            triggers: &["agile", "scrum", "jira", "product management", "project management"],
            roles: &["Technical Project Manager"],
            rule: ClusterRule::Always,
        },
    ]
});

/// Predicts roles for a skill list. First-occurrence order, no duplicates,
/// capped at 8; `DEFAULT_ROLES` when nothing fires.
pub fn predict_roles(skills: &[String]) -> Vec<String> {
    let held: HashSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();

    let mut fired: HashSet<&str> = HashSet::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut roles: Vec<String> = Vec::new();

    for cluster in ROLE_CLUSTERS.iter() {
        let triggered = match cluster.rule {
            ClusterRule::Always => any_trigger_held(cluster, &held),
            ClusterRule::RequiresAll(deps) => deps.iter().all(|d| fired.contains(d)),
            ClusterRule::OnlyIfNoneMatched => roles.is_empty() && any_trigger_held(cluster, &held),
        };
        if !triggered {
            continue;
        }
        fired.insert(cluster.name);
        for role in cluster.roles {
            if seen.insert(role) {
                roles.push(role.to_string());
            }
        }
    }

    roles.truncate(MAX_ROLES);

    if roles.is_empty() {
        return DEFAULT_ROLES.iter().map(|r| r.to_string()).collect();
    }
    roles
}

fn any_trigger_held(cluster: &RoleCluster, held: &HashSet<String>) -> bool {
    cluster.triggers.iter().any(|t| held.contains(*t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_backend_plus_frontend_implies_full_stack() {
        let roles = predict_roles(&strings(&["Python", "React"]));
        assert!(roles.contains(&"Backend Developer".to_string()));
        assert!(roles.contains(&"Frontend Developer".to_string()));
        assert!(roles.contains(&"Full Stack Developer".to_string()));
    }

    #[test]
    fn test_backend_alone_is_not_full_stack() {
        let roles = predict_roles(&strings(&["Python", "Django"]));
        assert!(!roles.contains(&"Full Stack Developer".to_string()));
    }

    #[test]
    fn test_ml_skills_predict_ml_and_nlp_roles() {
        let roles = predict_roles(&strings(&["TensorFlow", "NLP"]));
        assert_eq!(
            roles,
            strings(&["Machine Learning Engineer", "AI Engineer", "NLP Engineer"])
        );
    }

    #[test]
    fn test_database_only_profile_gets_dba() {
        let roles = predict_roles(&strings(&["SQL", "Oracle"]));
        assert_eq!(roles, strings(&["Database Administrator"]));
    }

    #[test]
    fn test_database_skills_with_backend_do_not_add_dba() {
        let roles = predict_roles(&strings(&["SQL", "Python"]));
        assert!(!roles.contains(&"Database Administrator".to_string()));
        assert!(roles.contains(&"Backend Developer".to_string()));
    }

    #[test]
    fn test_dba_can_coexist_with_later_clusters() {
        // qa is evaluated after the database rule, so a DBA/tester profile
        // keeps both labels.
        let roles = predict_roles(&strings(&["SQL", "Selenium"]));
        assert_eq!(roles, strings(&["Database Administrator", "QA Engineer"]));
    }

    #[test]
    fn test_no_triggers_falls_back_to_defaults() {
        let roles = predict_roles(&strings(&["Underwater Basket Weaving"]));
        assert_eq!(roles, strings(&["Software Engineer", "Technical Consultant"]));
        assert_eq!(predict_roles(&[]).len(), 2);
    }

    #[test]
    fn test_roles_capped_at_eight() {
        let roles = predict_roles(&strings(&[
            "Machine Learning",
            "Pandas",
            "Python",
            "React",
            "Docker",
        ]));
        assert_eq!(roles.len(), 8);
        // The cap cuts in cluster order, so the earliest roles survive.
        assert_eq!(roles[0], "Machine Learning Engineer");
    }

    #[test]
    fn test_trigger_match_is_case_insensitive_and_exact() {
        assert!(predict_roles(&strings(&["PYTHON"])).contains(&"Backend Developer".to_string()));
        // Substrings must not trigger: "python3" is not the skill "python".
        let roles = predict_roles(&strings(&["python3"]));
        assert_eq!(roles, strings(&["Software Engineer", "Technical Consultant"]));
    }

    #[test]
    fn test_no_duplicate_roles() {
        let roles = predict_roles(&strings(&[
            "Python", "Java", "React", "Docker", "SQL", "Selenium", "Agile",
        ]));
        let mut unique: Vec<&String> = roles.iter().collect();
        unique.dedup();
        assert_eq!(unique.len(), roles.len());
    }
}
