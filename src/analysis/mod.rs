//! Classification and aggregation of calendar events.
//!
//! Apart from [dashboard], everything here is a pure function of an event list and a set of
//! [rules::Rules]. Results are recomputed from scratch every time, nothing is updated
//! incrementally.

pub mod aggregate;
pub mod category;
pub mod classify;
pub mod dashboard;
pub mod event;
pub mod filter;
pub mod goals;
pub mod insights;
pub mod rules;

use serde::Serialize;
use tracing::{debug, instrument};

use self::{
    aggregate::{aggregate, AnalysisResult},
    event::Event,
    filter::filter_holidays,
    goals::{evaluate_goals, GoalAnalysis},
    rules::Rules,
};

/// Immutable result of one analysis run handed over to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub exclude_holidays: bool,
    pub analysis: AnalysisResult,
    pub goals: Vec<GoalAnalysis>,
}

/// Filters the events once and feeds the same set into both the aggregation and the goal
/// evaluation.
#[instrument(skip(events, rules), fields(event_count = events.len()))]
pub fn analyze(events: &[Event], rules: &Rules, exclude_holidays: bool) -> Snapshot {
    let filtered = filter_holidays(events, exclude_holidays);
    let analysis = aggregate(filtered.clone(), &rules.table);
    let goals = evaluate_goals(filtered, &rules.table, &rules.goals);
    debug!(
        "Analyzed {} days, {} goal records",
        analysis.daily_breakdown.len(),
        goals.len()
    );
    Snapshot {
        exclude_holidays,
        analysis,
        goals,
    }
}
