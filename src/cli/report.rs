//! Terminal and JSON rendering of analysis snapshots. Every report writes into a [Write] so the
//! output can be inspected in tests.

use std::io::Write;

use ansi_term::{Colour, Style};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    analysis::{
        aggregate::DailyHours,
        category::{Category, PerCategory},
        goals::{GoalAnalysis, GoalKind},
        insights::{
            category_ranking, format_event_time, goal_summary, subcategory_ranking, total_hours,
            CategoryLog, CategoryRank, GoalSummary, SubcategoryRank,
        },
        rules::Rules,
        Snapshot,
    },
    utils::{
        percentage::Percentage,
        time::{date_key, format_date_range},
    },
};

fn category_style(category: Category) -> Style {
    match category {
        Category::Work => Colour::Blue.bold(),
        Category::Study => Colour::Green.bold(),
        Category::Life => Colour::Yellow.bold(),
    }
}

fn status_style(ok: bool) -> Style {
    if ok {
        Colour::Green.normal()
    } else {
        Colour::Red.normal()
    }
}

pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}h")
}

pub fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub exclude_holidays: bool,
    pub total_hours: &'a PerCategory<f64>,
    pub grand_total: f64,
    pub ranking: Vec<CategoryRank>,
    pub subcategories: PerCategory<Vec<SubcategoryRank>>,
}

impl<'a> SummaryReport<'a> {
    pub fn new(snapshot: &'a Snapshot, start: NaiveDate, end: NaiveDate) -> Self {
        let analysis = &snapshot.analysis;
        Self {
            start,
            end,
            exclude_holidays: snapshot.exclude_holidays,
            total_hours: &analysis.total_hours,
            grand_total: total_hours(analysis),
            ranking: category_ranking(analysis),
            subcategories: PerCategory::from_fn(|category| subcategory_ranking(analysis, category)),
        }
    }
}

pub fn write_summary(out: &mut impl Write, report: &SummaryReport) -> Result<()> {
    writeln!(
        out,
        "{}",
        Style::new()
            .bold()
            .paint(format_date_range(report.start, report.end))
    )?;
    if report.exclude_holidays {
        writeln!(out, "Weekends and whole day family events are excluded")?;
    }
    writeln!(out)?;

    for rank in &report.ranking {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            rank.rank,
            category_style(rank.category).paint(rank.category.to_string()),
            format_hours(rank.hours),
            rank.share
        )?;
    }
    writeln!(out, "\tTotal\t{}", format_hours(report.grand_total))?;

    for (category, subcategories) in report.subcategories.iter() {
        if subcategories.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "{}", category_style(category).paint(category.to_string()))?;
        for entry in subcategories {
            writeln!(out, "\t{}\t{}", format_hours(entry.hours), entry.subcategory)?;
        }
    }
    Ok(())
}

pub fn write_daily(out: &mut impl Write, daily: &[DailyHours]) -> Result<()> {
    if daily.is_empty() {
        writeln!(out, "No events in range")?;
        return Ok(());
    }

    write!(out, "Date")?;
    for category in Category::ALL {
        write!(out, "\t{}", category_style(category).paint(category.to_string()))?;
    }
    writeln!(out, "\tTotal")?;

    for day in daily {
        write!(out, "{}", date_key(day.date))?;
        for (_, hours) in day.hours.iter() {
            write!(out, "\t{}", format_hours(*hours))?;
        }
        writeln!(out, "\t{}", format_hours(day.hours.sum()))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalReport<'a> {
    pub threshold: Percentage,
    pub summaries: Vec<GoalSummary>,
    pub days: &'a [GoalAnalysis],
    #[serde(skip)]
    kinds: Vec<GoalKind>,
}

impl<'a> GoalReport<'a> {
    pub fn new(goals: &'a [GoalAnalysis], kinds: &[GoalKind], threshold: Percentage) -> Self {
        let kinds = if kinds.is_empty() {
            GoalKind::ALL.to_vec()
        } else {
            kinds.to_vec()
        };
        Self {
            threshold,
            summaries: kinds.iter().map(|kind| goal_summary(goals, *kind)).collect(),
            days: goals,
            kinds,
        }
    }
}

pub fn write_goals(out: &mut impl Write, report: &GoalReport) -> Result<()> {
    for summary in &report.summaries {
        let on_track = summary.on_track(report.threshold);
        writeln!(
            out,
            "{}\t{}/{} days\t{}\t{} of {}\t{}",
            Style::new().bold().paint(summary.kind.to_string()),
            summary.days_met,
            summary.total_days,
            summary.percentage,
            format_hours(summary.total_actual),
            format_hours(summary.total_goal),
            status_style(on_track).paint(if on_track { "On track" } else { "Needs work" })
        )?;
    }

    if report.days.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    write!(out, "Date")?;
    for kind in &report.kinds {
        write!(out, "\t{kind}")?;
    }
    writeln!(out)?;
    for day in report.days {
        write!(out, "{}", date_key(day.date))?;
        for kind in &report.kinds {
            let value = format!(
                "{}/{}",
                format_hours(day.actual(*kind)),
                format_hours(day.goal(*kind))
            );
            write!(out, "\t{}", status_style(day.is_met(*kind)).paint(value))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_log(out: &mut impl Write, log: &[CategoryLog]) -> Result<()> {
    for category in log {
        writeln!(
            out,
            "{}\t{} events\t{}",
            category_style(category.category).paint(category.category.to_string()),
            category.event_count,
            format_hours(category.hours)
        )?;
        for group in &category.subcategories {
            writeln!(out, "\t{}\t{}", group.subcategory, format_hours(group.hours))?;
            for entry in &group.entries {
                writeln!(
                    out,
                    "\t\t{}\t{:.2}h\t{}",
                    format_event_time(&entry.event),
                    entry.hours,
                    entry.event.summary
                )?;
                if let Some(description) = entry.event.description.as_deref() {
                    for line in description.lines().filter(|v| !v.trim().is_empty()) {
                        writeln!(out, "\t\t\t{}", line.trim())?;
                    }
                }
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Prints the rules in the format of a rule file, so the output can be used as a starting point.
pub fn write_rules(out: &mut impl Write, rules: &Rules) -> Result<()> {
    write!(out, "{}", toml::to_string_pretty(rules)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        analysis::{
            analyze,
            event::test_events::{all_day, timed},
            goals::GoalKind,
            insights::event_log,
            rules::Rules,
            Snapshot,
        },
        config::parse_rules,
    };

    use super::{
        write_daily, write_goals, write_json, write_log, write_rules, write_summary, GoalReport,
        SummaryReport,
    };

    fn snapshot() -> Snapshot {
        let events = vec![
            timed("Coding", "2024-03-01T09:00", "2024-03-01T12:00"),
            timed("Gym", "2024-03-01T18:00", "2024-03-01T19:00"),
            timed("Lecture", "2024-03-04T10:00", "2024-03-04T12:00")
                .with_source_type("Class")
                .with_description("Room 101\n\nBring the laptop"),
            all_day("Conference", "2024-03-05"),
        ];
        analyze(&events, &Rules::default(), true)
    }

    fn render(write: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut out = vec![];
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn march() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
    }

    #[test]
    fn summary() {
        let snapshot = snapshot();
        let (start, end) = march();
        let report = SummaryReport::new(&snapshot, start, end);
        assert_eq!(report.grand_total, 6.);

        let text = render(|out| write_summary(out, &report));
        assert!(text.contains("Mar 1, 2024 - Mar 31, 2024"));
        assert!(text.contains("excluded"));
        assert!(text.contains("50.0%"));
        assert!(text.contains("\tTotal\t6.0h"));
        assert!(text.contains("\t3.0h\tCoding"));
        assert!(text.contains("\t2.0h\tLecture"));

        let json = render(|out| write_json(out, &report));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["grandTotal"], 6.);
        assert_eq!(value["totalHours"]["Study"], 2.);
        assert_eq!(value["ranking"][0]["category"], "Work");
        assert_eq!(value["start"], "2024-03-01");
    }

    #[test]
    fn daily() {
        let text = render(|out| write_daily(out, &snapshot().analysis.daily_breakdown));
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2024-03-01\t3.0h\t0.0h\t1.0h\t4.0h"));
        assert!(lines[3].starts_with("2024-03-05\t0.0h"));

        assert_eq!(render(|out| write_daily(out, &[])), "No events in range\n");
    }

    #[test]
    fn goals() {
        let snapshot = snapshot();
        let report = GoalReport::new(
            &snapshot.goals,
            &[GoalKind::Coding, GoalKind::Sport],
            "50".parse().unwrap(),
        );
        assert_eq!(report.summaries.len(), 2);

        let text = render(|out| write_goals(out, &report));
        assert!(text.contains("1/3 days"));
        assert!(text.contains("Needs work"));
        assert!(!text.contains("Study"));

        let all = GoalReport::new(&snapshot.goals, &[], "50".parse().unwrap());
        assert_eq!(all.summaries.len(), 3);
    }

    #[test]
    fn log() {
        let snapshot = snapshot();
        let log = event_log(&snapshot.analysis, &Rules::default().table);
        let text = render(|out| write_log(out, &log));

        assert!(text.contains("\t\t2024-03-01 09:00 - 12:00\t3.00h\tCoding"));
        assert!(text.contains("\t\tAll day: 2024-03-05\t0.00h\tConference"));
        assert!(text.contains("2 events"));
        assert!(text.contains(
            "\t\t2024-03-04 10:00 - 12:00\t2.00h\tLecture\n\t\t\tRoom 101\n\t\t\tBring the laptop\n"
        ));
        // events without a description are followed directly by the next entry
        assert!(text.contains("\tCoding\n\tConference"));
    }

    #[test]
    fn printed_rules_are_a_valid_rule_file() {
        let text = render(|out| write_rules(out, &Rules::default()));
        assert!(text.contains("[[category]]"));
        assert_eq!(parse_rules(&text).unwrap(), Rules::default());
    }
}
