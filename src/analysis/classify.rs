use std::sync::Arc;

use serde::Serialize;

use super::{category::Category, event::Event, rules::CategoryRuleTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub subcategory: Arc<str>,
}

/// Assigns a category and subcategory to an event.
///
/// The title is matched against the keywords of every category in table order and the first
/// keyword contained in the title decides both values. Titles without a match fall back to the
/// category of the event's source tag and use the title itself as the subcategory.
pub fn classify(event: &Event, table: &CategoryRuleTable) -> Classification {
    let summary = event.summary.to_lowercase();

    table
        .categories
        .iter()
        .find_map(|rule| {
            rule.keywords
                .iter()
                .filter(|keyword| !keyword.is_empty())
                .find(|keyword| summary.contains(&keyword.to_lowercase()))
                .map(|keyword| Classification {
                    category: rule.name,
                    subcategory: capitalize_first(keyword).into(),
                })
        })
        .unwrap_or_else(|| Classification {
            category: table.fallback.category_for(&event.source_type),
            subcategory: event.summary.clone(),
        })
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
