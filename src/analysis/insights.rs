//! Read-only views over analysis results used by reports: rankings, goal adherence and the
//! drill-down event log.

use std::{cmp::Ordering, sync::Arc};

use serde::Serialize;

use crate::utils::{
    percentage::{ratio_percentage, Percentage},
    time::date_key,
};

use super::{
    aggregate::AnalysisResult,
    category::Category,
    classify::classify,
    event::Event,
    goals::{GoalAnalysis, GoalKind},
    rules::CategoryRuleTable,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRank {
    pub rank: usize,
    pub category: Category,
    pub hours: f64,
    pub share: Percentage,
}

/// Categories ordered by time spent, largest first.
pub fn category_ranking(analysis: &AnalysisResult) -> Vec<CategoryRank> {
    let total = analysis.total_hours.sum();
    let mut totals = analysis
        .total_hours
        .iter()
        .map(|(category, hours)| (category, *hours))
        .collect::<Vec<_>>();
    // stable sort keeps declaration order for ties
    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    totals
        .into_iter()
        .enumerate()
        .map(|(index, (category, hours))| CategoryRank {
            rank: index + 1,
            category,
            hours,
            share: ratio_percentage(hours, total),
        })
        .collect()
}

/// Hours across every category.
pub fn total_hours(analysis: &AnalysisResult) -> f64 {
    analysis.total_hours.sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryRank {
    pub subcategory: Arc<str>,
    pub hours: f64,
}

/// Subcategories of a category ordered by time spent, ties ordered by name.
pub fn subcategory_ranking(analysis: &AnalysisResult, category: Category) -> Vec<SubcategoryRank> {
    let mut ranking = analysis.subcategory_hours[category]
        .iter()
        .map(|(subcategory, hours)| SubcategoryRank {
            subcategory: subcategory.clone(),
            hours: *hours,
        })
        .collect::<Vec<_>>();
    ranking.sort_by(|a, b| {
        b.hours
            .partial_cmp(&a.hours)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.subcategory.cmp(&b.subcategory))
    });
    ranking
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub kind: GoalKind,
    pub days_met: usize,
    pub total_days: usize,
    pub percentage: Percentage,
    pub total_actual: f64,
    pub total_goal: f64,
}

impl GoalSummary {
    /// Whether the goal was met on at least `threshold` of the days.
    pub fn on_track(&self, threshold: Percentage) -> bool {
        self.percentage >= threshold
    }
}

/// Summarises how often a goal was reached over the series.
pub fn goal_summary(goals: &[GoalAnalysis], kind: GoalKind) -> GoalSummary {
    let days_met = goals.iter().filter(|v| v.is_met(kind)).count();
    GoalSummary {
        kind,
        days_met,
        total_days: goals.len(),
        percentage: ratio_percentage(days_met as f64, goals.len() as f64),
        total_actual: goals.iter().map(|v| v.actual(kind)).sum(),
        total_goal: goals.iter().map(|v| v.goal(kind)).sum(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub event: Event,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryLog {
    pub subcategory: Arc<str>,
    pub hours: f64,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLog {
    pub category: Category,
    pub event_count: usize,
    pub hours: f64,
    /// Groups appear in the order their first event appeared.
    pub subcategories: Vec<SubcategoryLog>,
}

/// Time of an event as shown in the log, `All day: 2024-03-01` or `2024-03-01 09:00 - 11:30`.
pub fn format_event_time(event: &Event) -> String {
    match (event.start.date_time, event.start.date) {
        (Some(start), _) => {
            let mut value = start.format("%Y-%m-%d %H:%M").to_string();
            if let Some(end) = event.end.date_time {
                value.push_str(&end.format(" - %H:%M").to_string());
            }
            value
        }
        (None, Some(date)) => format!("All day: {}", date_key(date)),
        (None, None) => "Unknown time".into(),
    }
}

/// Groups the events of every category by subcategory.
pub fn event_log(analysis: &AnalysisResult, table: &CategoryRuleTable) -> Vec<CategoryLog> {
    analysis
        .events_by_category
        .iter()
        .map(|(category, events)| {
            let mut subcategories = Vec::<SubcategoryLog>::new();
            for event in events {
                let subcategory = classify(event, table).subcategory;
                let hours = event.duration_hours();
                let entry = LogEntry {
                    event: event.clone(),
                    hours,
                };
                match subcategories
                    .iter_mut()
                    .find(|v| v.subcategory == subcategory)
                {
                    Some(group) => {
                        group.hours += hours;
                        group.entries.push(entry);
                    }
                    None => subcategories.push(SubcategoryLog {
                        subcategory,
                        hours,
                        entries: vec![entry],
                    }),
                }
            }

            CategoryLog {
                category,
                event_count: events.len(),
                hours: events.iter().map(Event::duration_hours).sum(),
                subcategories,
            }
        })
        .collect()
}
