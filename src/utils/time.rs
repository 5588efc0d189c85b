use std::fmt::Display;

use chrono::{Datelike, NaiveDate};

/// This is the standard way of converting a date to a string in calsight.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Fall,
    Spring,
    Summer,
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Fall => write!(f, "Fall"),
            Term::Spring => write!(f, "Spring"),
            Term::Summer => write!(f, "Summer"),
        }
    }
}

/// Academic term a date belongs to, with inclusive first and last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semester {
    pub term: Term,
    /// Year the term started in.
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.term, self.year)
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Fall runs September to January, Spring February to June and Summer covers July and August.
pub fn detect_semester(today: NaiveDate) -> Semester {
    let year = today.year();
    match today.month() {
        9..=12 => Semester {
            term: Term::Fall,
            year,
            start: ymd(year, 9, 1),
            end: ymd(year + 1, 1, 31),
        },
        1 => Semester {
            term: Term::Fall,
            year: year - 1,
            start: ymd(year - 1, 9, 1),
            end: ymd(year, 1, 31),
        },
        2..=6 => Semester {
            term: Term::Spring,
            year,
            start: ymd(year, 2, 1),
            end: ymd(year, 6, 30),
        },
        _ => Semester {
            term: Term::Summer,
            year,
            start: ymd(year, 7, 1),
            end: ymd(year, 8, 31),
        },
    }
}

/// Formats dates as `Sep 1, 2024 - Jan 31, 2025`.
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    const FORMAT: &str = "%b %-d, %Y";
    format!("{} - {}", start.format(FORMAT), end.format(FORMAT))
}
