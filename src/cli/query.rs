use std::{fmt::Display, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};
use now::DateTimeNow;

use crate::{source::DateWindow, utils::time::detect_semester};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Options shared by every report: where events come from and which of them are analyzed.
#[derive(Debug, clap::Args)]
pub struct QueryArgs {
    #[arg(
        long,
        global = true,
        help = "Directory with calendar exports. By default <state dir>/events, where state dir is $XDG_STATE_HOME/calsight or $HOME/.local/state/calsight"
    )]
    pub events: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Rule file. By default $XDG_CONFIG_HOME/calsight/rules.toml, built-in rules are used if it doesn't exist"
    )]
    pub rules: Option<PathBuf>,
    #[arg(
        long = "calendar",
        global = true,
        default_values = ["Work", "Life", "Study"],
        help = "Calendars to analyze. A calendar is used when its name contains one of these"
    )]
    pub calendars: Vec<String>,
    #[arg(
        long = "start",
        short,
        global = true,
        help = "Start of the range. Examples are \"yesterday\", \"2 weeks ago\", \"15/03/2025\". Defaults to the start of the current semester"
    )]
    pub start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        global = true,
        help = "End of the range. Examples are \"today\", \"15/03/2025\". Defaults to the end of tomorrow"
    )]
    pub end_date: Option<String>,
    #[arg(long, global = true, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    pub date_style: DateStyle,
    #[arg(
        long,
        global = true,
        help = "Keep weekend events and whole day family events"
    )]
    pub include_holidays: bool,
    #[arg(long, global = true, help = "Print reports as JSON")]
    pub json: bool,
}

impl QueryArgs {
    pub fn window(&self) -> Result<DateWindow> {
        resolve_window(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.date_style,
            Local::now(),
        )
    }
}

fn parse_date(
    value: &str,
    now: DateTime<Local>,
    date_style: DateStyle,
    name: &str,
) -> Result<DateTime<Local>> {
    parse_date_string(value, now, date_style.into()).map_err(|e| {
        Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate {name} date {e}"),
            )
            .into()
    })
}

/// Turns the date options into a window of whole days. Without a start the current semester is
/// used, without an end the window lasts until the end of tomorrow.
fn resolve_window(
    start_date: Option<&str>,
    end_date: Option<&str>,
    date_style: DateStyle,
    now: DateTime<Local>,
) -> Result<DateWindow> {
    let start = match start_date {
        Some(v) => parse_date(v, now, date_style, "start")?.beginning_of_day(),
        None => {
            let semester = detect_semester(now.date_naive());
            Local
                .from_local_datetime(&semester.start.and_time(NaiveTime::MIN))
                .earliest()
                .with_context(|| format!("Can't find start of {semester} in local time"))?
        }
    };
    let end = match end_date {
        Some(v) => parse_date(v, now, date_style, "end")?,
        None => now + Duration::days(1),
    }
    .end_of_day();

    if start > end {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Start {} is after end {}", start.format("%x"), end.format("%x")),
            )
            .into());
    }

    Ok(DateWindow::new(start.fixed_offset(), end.fixed_offset()))
}
