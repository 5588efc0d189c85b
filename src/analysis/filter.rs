use chrono::{Datelike, Weekday};

use super::event::Event;

const FAMILY_TAG: &str = "family";

/// Whether the event falls on a Saturday or Sunday.
pub fn is_weekend(event: &Event) -> bool {
    event
        .date()
        .is_some_and(|date| matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
}

/// A whole day event tagged with "family" in its title or description. Timed events mentioning
/// family are regular time spent and are kept.
pub fn is_family_day(event: &Event) -> bool {
    let tagged = event.summary.to_lowercase().contains(FAMILY_TAG)
        || event
            .description
            .as_deref()
            .is_some_and(|v| v.to_lowercase().contains(FAMILY_TAG));
    tagged && event.is_all_day()
}

/// Events dropped when holidays are excluded from the analysis.
pub fn is_excluded(event: &Event) -> bool {
    is_weekend(event) || is_family_day(event)
}

/// Returns events that survive the holiday filter when it's enabled, or every event otherwise.
pub fn filter_holidays(
    events: &[Event],
    exclude_holidays: bool,
) -> impl Iterator<Item = &Event> + Clone {
    events
        .iter()
        .filter(move |event| !exclude_holidays || !is_excluded(event))
}
