//! Loading of the rule file. The file is optional, every section that's missing falls back to
//! the built-in rules.

use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    analysis::rules::{CategoryRule, CategoryRuleTable, GoalRules, Rules, SourceFallback},
    utils::dir::application_config_path,
};

pub const RULES_FILE_NAME: &str = "rules.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    category: Option<Vec<CategoryRule>>,
    fallback: Option<SourceFallback>,
    goals: Option<GoalRules>,
}

impl From<RuleFile> for Rules {
    fn from(
        RuleFile {
            category,
            fallback,
            goals,
        }: RuleFile,
    ) -> Self {
        let table = category
            .map(CategoryRuleTable::new)
            .unwrap_or_default()
            .with_fallback(fallback.unwrap_or_default());
        Rules {
            table,
            goals: goals.unwrap_or_default(),
        }
    }
}

/// Parses and validates the contents of a rule file.
pub fn parse_rules(content: &str) -> Result<Rules> {
    let file: RuleFile = toml::from_str(content)?;
    let rules = Rules::from(file);
    validate(&rules)?;
    Ok(rules)
}

fn validate(rules: &Rules) -> Result<()> {
    let mut seen = HashSet::new();
    for rule in &rules.table.categories {
        if !seen.insert(rule.name) {
            bail!("Category {} is declared more than once", rule.name);
        }
        if rule.keywords.iter().any(|v| v.trim().is_empty()) {
            bail!("Category {} has an empty keyword", rule.name);
        }
    }

    let goals = &rules.goals;
    for (name, target) in [
        ("coding_target", goals.coding_target),
        ("study_target", goals.study_target),
        ("sport_target", goals.sport_target),
    ] {
        if target.is_nan() || target < 0. {
            bail!("Goal {name} must be a non-negative number of hours, got {target}");
        }
    }
    if goals
        .coding_keywords
        .iter()
        .chain(&goals.sport_keywords)
        .any(|v| v.trim().is_empty())
    {
        bail!("Goal keywords can't be empty");
    }
    Ok(())
}

pub fn default_rules_path() -> Result<PathBuf> {
    Ok(application_config_path()?.join(RULES_FILE_NAME))
}

/// Loads rules from `path`. Without a path the default location is tried and the built-in rules
/// are used if there is no file there.
pub async fn load_rules(path: Option<&Path>) -> Result<Rules> {
    let (path, required) = match path {
        Some(v) => (v.to_path_buf(), true),
        None => (default_rules_path()?, false),
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            info!("Using rules from {path:?}");
            parse_rules(&content).with_context(|| format!("Invalid rule file {path:?}"))
        }
        Err(e) if e.kind() == ErrorKind::NotFound && !required => {
            debug!("No rule file at {path:?}, using built-in rules");
            Ok(Rules::default())
        }
        Err(e) => Err(e).with_context(|| format!("Can't read rule file {path:?}")),
    }
}
