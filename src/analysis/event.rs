use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

const MILLIS_IN_HOUR: f64 = 60. * 60. * 1000.;

/// One side of an event. Calendars either specify an exact moment or only a date, the latter
/// meaning the event lasts the whole day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl EventTime {
    pub fn timed(date_time: DateTime<FixedOffset>) -> Self {
        Self {
            date_time: Some(date_time),
            date: None,
        }
    }

    pub fn all_day(date: NaiveDate) -> Self {
        Self {
            date_time: None,
            date: Some(date),
        }
    }

    /// Calendar date of this side. Timed values use the offset they were recorded with, so an
    /// event at 23:30 in Taipei stays on the same day no matter where the analysis runs.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.date_time.map(|v| v.date_naive()).or(self.date)
    }
}

/// Calendar event as handed over by an [crate::source::EventSource]. Never modified by the
/// analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Arc<str>,
    pub summary: Arc<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Arc<str>>,
    pub start: EventTime,
    pub end: EventTime,
    /// Coarse tag of where the event came from, e.g. the kind of calendar. Only used when no
    /// keyword matches during classification.
    pub source_type: Arc<str>,
}

impl Event {
    pub fn timed(
        id: impl Into<Arc<str>>,
        summary: impl Into<Arc<str>>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            description: None,
            start: EventTime::timed(start),
            end: EventTime::timed(end),
            source_type: "Work".into(),
        }
    }

    /// Creates an event lasting from `start` up to (excluding) `end`, the way calendars export
    /// whole day events.
    pub fn all_day(
        id: impl Into<Arc<str>>,
        summary: impl Into<Arc<str>>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            description: None,
            start: EventTime::all_day(start),
            end: EventTime::all_day(end),
            source_type: "Work".into(),
        }
    }

    pub fn with_description(self, description: impl Into<Arc<str>>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    pub fn with_source_type(self, source_type: impl Into<Arc<str>>) -> Self {
        Self {
            source_type: source_type.into(),
            ..self
        }
    }

    /// An event that only has a date for its start.
    pub fn is_all_day(&self) -> bool {
        self.start.date.is_some() && self.start.date_time.is_none()
    }

    /// Date the event is accounted to.
    pub fn date(&self) -> Option<NaiveDate> {
        self.start.calendar_date()
    }

    /// Time spent on the event in hours. Whole day events are markers rather than spent time,
    /// so anything without a moment on both sides counts as 0. Same goes for spans that end
    /// before they start.
    pub fn duration_hours(&self) -> f64 {
        let (Some(start), Some(end)) = (self.start.date_time, self.end.date_time) else {
            return 0.;
        };
        let span = end - start;
        if span < Duration::zero() {
            return 0.;
        }
        span.num_milliseconds() as f64 / MILLIS_IN_HOUR
    }
}
