//! Static tables driving classification and goal tracking. They are plain data so they can be
//! loaded from a rule file or swapped out in tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Keywords of one category. Order of keywords matters: the first one found in an event title
/// becomes the subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRule {
    pub name: Category,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: Category, keywords: &[&str]) -> Self {
        Self {
            name,
            keywords: keywords.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Category used for events no keyword matched, decided by the source tag of the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceFallback {
    pub default: Category,
    /// Source tag to category. Tags are compared case-insensitively.
    pub sources: BTreeMap<String, Category>,
}

impl Default for SourceFallback {
    fn default() -> Self {
        Self {
            default: Category::Work,
            sources: BTreeMap::from([
                ("Class".to_string(), Category::Study),
                ("Study".to_string(), Category::Study),
            ]),
        }
    }
}

impl SourceFallback {
    pub fn category_for(&self, source_type: &str) -> Category {
        self.sources
            .iter()
            .find(|(tag, _)| tag.eq_ignore_ascii_case(source_type))
            .map(|(_, category)| *category)
            .unwrap_or(self.default)
    }
}

/// Ordered keyword table. Categories are checked in the order they are declared, not
/// alphabetically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRuleTable {
    #[serde(rename = "category")]
    pub categories: Vec<CategoryRule>,
    #[serde(default)]
    pub fallback: SourceFallback,
}

impl CategoryRuleTable {
    pub fn new(categories: Vec<CategoryRule>) -> Self {
        Self {
            categories,
            fallback: SourceFallback::default(),
        }
    }

    pub fn with_fallback(self, fallback: SourceFallback) -> Self {
        Self { fallback, ..self }
    }
}

impl Default for CategoryRuleTable {
    fn default() -> Self {
        Self::new(vec![
            CategoryRule::new(
                Category::Work,
                &[
                    "SITCON",
                    "SDC",
                    "COSCUP",
                    "emtech",
                    "Coding",
                    "justfont",
                    "justwriteNOW",
                    "Debate",
                    "Core System",
                    "Bamboofox",
                ],
            ),
            CategoryRule::new(Category::Study, &[]),
            CategoryRule::new(Category::Life, &["Gym", "Swimming"]),
        ])
    }
}

/// Keywords and daily targets (in hours) of the tracked goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoalRules {
    pub coding_keywords: Vec<String>,
    pub sport_keywords: Vec<String>,
    pub coding_target: f64,
    pub study_target: f64,
    pub sport_target: f64,
}

impl Default for GoalRules {
    fn default() -> Self {
        Self {
            coding_keywords: vec!["coding".into()],
            sport_keywords: ["gym", "sport", "exercise", "swimming"]
                .into_iter()
                .map(String::from)
                .collect(),
            coding_target: 2.,
            study_target: 2.,
            sport_target: 0.5,
        }
    }
}

/// Everything the analysis is configured with. Serializes into the shape of the rule file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rules {
    #[serde(flatten)]
    pub table: CategoryRuleTable,
    pub goals: GoalRules,
}
