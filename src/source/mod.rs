//! Sources of calendar events. The analysis never talks to a calendar provider directly, it only
//! receives whatever an [EventSource] produced.

pub mod export;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::analysis::event::Event;

/// Inclusive range events are requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// Checks the start of an event against the window. Whole day events are compared by date in
    /// the window's offset. Events without a start can't be placed and are kept.
    pub fn contains(&self, event: &Event) -> bool {
        match (event.start.date_time, event.start.date) {
            (Some(moment), _) => moment >= self.start && moment <= self.end,
            (None, Some(date)) => date >= self.start.date_naive() && date <= self.end.date_naive(),
            (None, None) => true,
        }
    }
}

/// Interface of anything able to provide events from a set of named calendars.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Retrieves events of every calendar whose name contains one of `calendars`
    /// (case-insensitive) that start inside of `window`.
    async fn fetch_events(&self, calendars: &[String], window: DateWindow) -> Result<Vec<Event>>;
}

/// Coarse tag of a calendar used as a classification fallback for its events.
pub fn source_type_for_calendar(calendar_name: &str) -> &'static str {
    let name = calendar_name.to_lowercase();
    if name.contains("class") {
        "Class"
    } else if name.contains("study") {
        "Study"
    } else {
        "Work"
    }
}

/// Whether a calendar was asked for.
pub fn calendar_matches(calendar_name: &str, calendars: &[String]) -> bool {
    let name = calendar_name.to_lowercase();
    calendars
        .iter()
        .any(|requested| name.contains(&requested.to_lowercase()))
}
