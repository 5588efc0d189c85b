use std::{collections::BTreeMap, sync::Arc};

use chrono::NaiveDate;
use serde::Serialize;

use super::{
    category::PerCategory,
    classify::classify,
    event::Event,
    filter::filter_holidays,
    rules::CategoryRuleTable,
};

/// Hours spent per category on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyHours {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub hours: PerCategory<f64>,
}

/// Everything derived from a list of events. Rebuilt from scratch on every analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub total_hours: PerCategory<f64>,
    pub subcategory_hours: PerCategory<BTreeMap<Arc<str>, f64>>,
    /// Sorted by date, one entry per date that had an event.
    pub daily_breakdown: Vec<DailyHours>,
    /// Events of each category in the order they were given.
    pub events_by_category: PerCategory<Vec<Event>>,
}

/// Folds events into category totals, subcategory totals and a daily series.
pub fn aggregate<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    table: &CategoryRuleTable,
) -> AnalysisResult {
    let mut result = AnalysisResult::default();
    let mut daily = BTreeMap::<NaiveDate, PerCategory<f64>>::new();

    for event in events {
        let classification = classify(event, table);
        let category = classification.category;
        let duration = event.duration_hours();

        *result.subcategory_hours[category]
            .entry(classification.subcategory)
            .or_insert(0.) += duration;
        result.events_by_category[category].push(event.clone());

        // Events without any start date have no duration either, so they can't change the totals
        if let Some(date) = event.date() {
            daily.entry(date).or_default()[category] += duration;
        }
    }

    result.daily_breakdown = daily
        .into_iter()
        .map(|(date, hours)| DailyHours { date, hours })
        .collect();
    // Summed from the daily series in date order so both add up to the exact same value
    result.total_hours = PerCategory::from_fn(|category| {
        result
            .daily_breakdown
            .iter()
            .map(|v| v.hours[category])
            .sum()
    });
    result
}

/// Runs [aggregate] over events, dropping weekends and family days first if requested.
pub fn analyze_events(
    events: &[Event],
    table: &CategoryRuleTable,
    exclude_holidays: bool,
) -> AnalysisResult {
    aggregate(filter_holidays(events, exclude_holidays), table)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use crate::analysis::{
        category::{Category, PerCategory},
        event::{
            test_events::{all_day, at, day, timed},
            Event,
        },
        filter::is_excluded,
        rules::CategoryRuleTable,
    };

    use super::{aggregate, analyze_events, AnalysisResult};

    fn sample_events() -> Vec<Event> {
        vec![
            timed("Coding review", "2024-03-04T09:00", "2024-03-04T11:30"),
            timed("Gym", "2024-03-01T18:00", "2024-03-01T18:45"),
            timed("Calculus", "2024-03-01T10:00", "2024-03-01T12:00").with_source_type("Class"),
            timed("SITCON meeting", "2024-03-02T13:00", "2024-03-02T15:00"),
            all_day("Family day", "2024-03-05"),
            timed("coding", "2024-03-01T20:00", "2024-03-01T21:00"),
        ]
    }

    #[test]
    fn empty_input() {
        let events: Vec<Event> = vec![];
        let result = aggregate(&events, &CategoryRuleTable::default());
        assert_eq!(result, AnalysisResult::default());
        assert_eq!(result.total_hours, PerCategory { work: 0., study: 0., life: 0. });
        assert!(result.daily_breakdown.is_empty());
        assert!(result.subcategory_hours.iter().all(|(_, v)| v.is_empty()));
        assert!(result.events_by_category.iter().all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn totals_and_subcategories() {
        let events = sample_events();
        let result = aggregate(&events, &CategoryRuleTable::default());

        assert_eq!(result.total_hours.work, 2.5 + 2. + 1.);
        assert_eq!(result.total_hours.study, 2.);
        assert_eq!(result.total_hours.life, 0.75);

        assert_eq!(result.subcategory_hours.work.get("Coding"), Some(&3.5));
        assert_eq!(result.subcategory_hours.work.get("SITCON"), Some(&2.));
        assert_eq!(result.subcategory_hours.work.get("Family day"), Some(&0.));
        assert_eq!(result.subcategory_hours.study.get("Calculus"), Some(&2.));
        assert_eq!(result.subcategory_hours.life.get("Gym"), Some(&0.75));
    }

    #[test]
    fn events_keep_input_order() {
        let events = sample_events();
        let result = aggregate(&events, &CategoryRuleTable::default());

        let work = result
            .events_by_category
            .work
            .iter()
            .map(|v| &*v.summary)
            .collect::<Vec<_>>();
        assert_eq!(work, vec!["Coding review", "SITCON meeting", "Family day", "coding"]);
        assert_eq!(result.events_by_category[Category::Life].len(), 1);
    }

    #[test]
    fn daily_breakdown_is_sorted() {
        let events = sample_events();
        let result = aggregate(&events, &CategoryRuleTable::default());

        let dates = result
            .daily_breakdown
            .iter()
            .map(|v| v.date)
            .collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![
                day("2024-03-01"),
                day("2024-03-02"),
                day("2024-03-04"),
                day("2024-03-05")
            ]
        );
        assert_eq!(
            result.daily_breakdown[0].hours,
            PerCategory { work: 1., study: 2., life: 0.75 }
        );
    }

    #[test]
    fn daily_sums_match_totals() {
        let events = sample_events();
        let result = aggregate(&events, &CategoryRuleTable::default());

        for category in Category::ALL {
            let daily: f64 = result
                .daily_breakdown
                .iter()
                .map(|v| v.hours[category])
                .sum();
            assert_eq!(daily, result.total_hours[category], "{category}");
        }
    }

    #[test]
    fn daily_sums_match_totals_for_minute_durations() {
        // Durations in minutes are not exact binary fractions, interleaving the dates changes
        // the order of additions between the totals and the daily buckets
        let mut seed = 17u32;
        let events = (0..90)
            .map(|index| {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let minutes = i64::from(seed >> 16) % 59 + 1;
                let start = at(&format!("2024-03-0{}T09:00:00+08:00", index % 3 + 4));
                Event::timed(
                    format!("e{index}"),
                    "Coding",
                    start,
                    start + Duration::minutes(minutes),
                )
            })
            .collect::<Vec<_>>();
        let result = aggregate(&events, &CategoryRuleTable::default());

        assert_eq!(result.daily_breakdown.len(), 3);
        let daily: f64 = result
            .daily_breakdown
            .iter()
            .map(|v| v.hours[Category::Work])
            .sum();
        assert_eq!(daily, result.total_hours[Category::Work]);
        assert!(result.total_hours[Category::Work] > 0.);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let events = sample_events();
        let table = CategoryRuleTable::default();
        assert_eq!(aggregate(&events, &table), aggregate(&events, &table));
    }

    #[test]
    fn holiday_toggle_removes_excluded_durations() {
        let events = sample_events();
        let table = CategoryRuleTable::default();

        let with_holidays = analyze_events(&events, &table, false);
        let without_holidays = analyze_events(&events, &table, true);

        let excluded: f64 = events
            .iter()
            .filter(|v| is_excluded(v))
            .map(|v| v.duration_hours())
            .sum();
        assert_eq!(excluded, 2.);
        assert_eq!(
            with_holidays.total_hours.sum() - without_holidays.total_hours.sum(),
            excluded
        );
        assert_eq!(without_holidays.total_hours.work, 3.5);
        assert_eq!(without_holidays.daily_breakdown.len(), 2);
        assert!(without_holidays.subcategory_hours.work.get("SITCON").is_none());
    }
}
