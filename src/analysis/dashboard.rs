use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::source::{DateWindow, EventSource};

use super::{analyze, event::Event, rules::Rules, Snapshot};

/// Identifies one fetch request. Only the latest ticket is allowed to replace the events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Owns the current event list and the holiday toggle, and keeps the [Snapshot] derived from
/// them. Any change recomputes the whole snapshot.
pub struct Dashboard {
    rules: Rules,
    exclude_holidays: bool,
    events: Vec<Event>,
    snapshot: Arc<Snapshot>,
    generation: u64,
}

impl Dashboard {
    pub fn new(rules: Rules, exclude_holidays: bool) -> Self {
        let snapshot = Arc::new(analyze(&[], &rules, exclude_holidays));
        Self {
            rules,
            exclude_holidays,
            events: vec![],
            snapshot,
            generation: 0,
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.clone()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn exclude_holidays(&self) -> bool {
        self.exclude_holidays
    }

    pub fn set_exclude_holidays(&mut self, exclude_holidays: bool) -> Arc<Snapshot> {
        if self.exclude_holidays != exclude_holidays {
            self.exclude_holidays = exclude_holidays;
            self.recompute();
        }
        self.snapshot()
    }

    /// Starts a new fetch. Every ticket handed out before this one becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Replaces the events with the result of a fetch. Returns [None] without touching anything
    /// if a newer fetch was started in the meantime.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        events: Vec<Event>,
    ) -> Option<Arc<Snapshot>> {
        if ticket.0 != self.generation {
            debug!(
                "Discarding {} events of stale fetch {} (current {})",
                events.len(),
                ticket.0,
                self.generation
            );
            return None;
        }
        Some(self.replace_events(events))
    }

    /// Fetches events from `source` and recomputes. A failed fetch leaves the previous snapshot
    /// in place.
    ///
    /// The dashboard stays borrowed for the whole fetch, so nothing can overtake it. Tickets
    /// handed out by [Dashboard::begin_fetch] before the call become stale. Callers that need
    /// overlapping fetches use [Dashboard::begin_fetch] and [Dashboard::complete_fetch] instead.
    #[instrument(skip(self, source))]
    pub async fn refresh(
        &mut self,
        source: &dyn EventSource,
        calendars: &[String],
        window: DateWindow,
    ) -> Result<Arc<Snapshot>> {
        self.begin_fetch();
        let events = source
            .fetch_events(calendars, window)
            .await
            .context("Failed to fetch events")?;
        info!("Fetched {} events", events.len());
        Ok(self.replace_events(events))
    }

    fn replace_events(&mut self, events: Vec<Event>) -> Arc<Snapshot> {
        self.events = events;
        self.recompute();
        self.snapshot()
    }

    fn recompute(&mut self) {
        self.snapshot = Arc::new(analyze(&self.events, &self.rules, self.exclude_holidays));
    }
}
