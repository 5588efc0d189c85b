use std::{collections::BTreeMap, fmt::Display};

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

use super::{
    category::Category,
    classify::classify,
    event::Event,
    rules::{CategoryRuleTable, GoalRules},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum GoalKind {
    Coding,
    Study,
    Sport,
}

impl GoalKind {
    pub const ALL: [GoalKind; 3] = [GoalKind::Coding, GoalKind::Study, GoalKind::Sport];
}

impl Display for GoalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalKind::Coding => write!(f, "Coding"),
            GoalKind::Study => write!(f, "Study"),
            GoalKind::Sport => write!(f, "Sport"),
        }
    }
}

/// Tracked activity of a single day next to the daily targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAnalysis {
    pub date: NaiveDate,
    pub coding_hours: f64,
    pub study_hours: f64,
    pub sport_hours: f64,
    pub coding_goal: f64,
    pub study_goal: f64,
    pub sport_goal: f64,
}

impl GoalAnalysis {
    pub fn actual(&self, kind: GoalKind) -> f64 {
        match kind {
            GoalKind::Coding => self.coding_hours,
            GoalKind::Study => self.study_hours,
            GoalKind::Sport => self.sport_hours,
        }
    }

    pub fn goal(&self, kind: GoalKind) -> f64 {
        match kind {
            GoalKind::Coding => self.coding_goal,
            GoalKind::Study => self.study_goal,
            GoalKind::Sport => self.sport_goal,
        }
    }

    pub fn is_met(&self, kind: GoalKind) -> bool {
        self.actual(kind) >= self.goal(kind)
    }
}

#[derive(Default)]
struct GoalHours {
    coding: f64,
    study: f64,
    sport: f64,
}

fn mentions_any(summary: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .filter(|keyword| !keyword.is_empty())
        .any(|keyword| summary.contains(&keyword.to_lowercase()))
}

/// Builds the per day goal series. An event can count towards several goals at once, e.g.
/// "Coding class" from a class calendar is both coding and study time.
pub fn evaluate_goals<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    table: &CategoryRuleTable,
    rules: &GoalRules,
) -> Vec<GoalAnalysis> {
    let mut daily = BTreeMap::<NaiveDate, GoalHours>::new();

    for event in events {
        let Some(date) = event.date() else {
            continue;
        };
        let hours = daily.entry(date).or_default();
        let duration = event.duration_hours();
        let summary = event.summary.to_lowercase();

        if mentions_any(&summary, &rules.coding_keywords) {
            hours.coding += duration;
        }
        if classify(event, table).category == Category::Study {
            hours.study += duration;
        }
        if mentions_any(&summary, &rules.sport_keywords) {
            hours.sport += duration;
        }
    }

    daily
        .into_iter()
        .map(|(date, hours)| GoalAnalysis {
            date,
            coding_hours: hours.coding,
            study_hours: hours.study,
            sport_hours: hours.sport,
            coding_goal: rules.coding_target,
            study_goal: rules.study_target,
            sport_goal: rules.sport_target,
        })
        .collect()
}
