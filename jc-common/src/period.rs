//! Reporting periods and ISO calendar helpers
//!
//! A `Period` is one (week, year) reporting slot. Weeks follow ISO-8601
//! numbering, so a year has either 52 or 53 of them.
//!
//! `PeriodRange` turns the user's start/end arguments into the ordered list of
//! periods an audit run checks against.

use crate::{Error, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest week number any year can have
pub const MAX_WEEK: u32 = 53;

/// One weekly reporting slot
///
/// Field order matters: the derived `Ord` compares the year first, which makes
/// sorting chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub week: u32,
}

impl Period {
    /// Create a period without calendar validation
    pub fn new(week: u32, year: i32) -> Self {
        Self { year, week }
    }

    /// Create a period, rejecting weeks that do not exist in `year`
    pub fn checked(week: u32, year: i32) -> Result<Self> {
        if year <= 0 {
            return Err(Error::InvalidInput(format!("Year must be positive: {}", year)));
        }
        let last_week = weeks_in_year(year);
        if week == 0 || week > last_week {
            return Err(Error::InvalidInput(format!(
                "Week is outside the valid range: {}/{} (year has {} weeks)",
                week, year, last_week
            )));
        }
        Ok(Self { year, week })
    }

    /// `true` if this period lies strictly after `other`
    pub fn is_after(&self, other: &Period) -> bool {
        self > other
    }

    /// The period immediately following this one
    pub fn next(&self) -> Period {
        if self.week < weeks_in_year(self.year) {
            Period::new(self.week + 1, self.year)
        } else {
            Period::new(1, self.year + 1)
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.week, self.year)
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parse `WW/YYYY`; `5/2023` and `05/2023` are the same period
    fn from_str(s: &str) -> Result<Self> {
        let (week, year) = s
            .split_once('/')
            .ok_or_else(|| Error::InvalidInput(format!("Expected WW/YYYY: {}", s)))?;
        let week = week
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidInput(format!("Invalid week: {}", s)))?;
        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::InvalidInput(format!("Invalid year: {}", s)))?;
        Ok(Period::new(week, year))
    }
}

/// Number of ISO weeks in `year` (52 or 53)
///
/// December 28th always falls into the last ISO week of its year.
pub fn weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

/// ISO week of a calendar date
pub fn period_of(date: NaiveDate) -> Period {
    let iso = date.iso_week();
    Period::new(iso.week(), iso.year())
}

/// Current ISO week according to the local clock
pub fn current_period() -> Period {
    period_of(Local::now().date_naive())
}

/// Inclusive range of reporting periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodRange {
    pub start: Period,
    pub end: Period,
}

impl PeriodRange {
    /// Create a validated range
    ///
    /// Both ends must be real calendar weeks and `start` must not lie after `end`.
    pub fn new(start: Period, end: Period) -> Result<Self> {
        let start = Period::checked(start.week, start.year)?;
        let end = Period::checked(end.week, end.year)?;
        if start.is_after(&end) {
            return Err(Error::InvalidInput(format!(
                "End week ({}) lies before start week ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Build the range from optional command-line arguments
    ///
    /// - no start: the configured first week of the work year
    /// - no end: the current week
    pub fn from_args(
        start: Option<&str>,
        end: Option<&str>,
        first_week_of_work_year: u32,
        today: Period,
    ) -> Result<Self> {
        let start = match start {
            Some(arg) => parse_period_arg(arg, today)?,
            None => Period::new(
                first_week_of_work_year,
                year_for_week(first_week_of_work_year, today),
            ),
        };
        let end = match end {
            Some(arg) => parse_period_arg(arg, today)?,
            None => today,
        };
        Self::new(start, end)
    }

    /// All periods from `start` to `end`, inclusive, in chronological order
    pub fn periods(&self) -> Vec<Period> {
        let mut periods = Vec::new();
        let mut current = self.start;
        while current <= self.end {
            periods.push(current);
            current = current.next();
        }
        periods
    }
}

/// Parse a period argument: `W` or `W/Y`
///
/// A bare week belongs to the current year unless it still lies ahead, in which
/// case the previous year is meant. Two-digit years are expanded relative to
/// the current year.
pub fn parse_period_arg(arg: &str, today: Period) -> Result<Period> {
    let tokens: Vec<&str> = arg.split('/').collect();
    match tokens.as_slice() {
        [week] => {
            let week = parse_week(week, arg)?;
            Ok(Period::new(week, year_for_week(week, today)))
        }
        [week, year] => {
            let week = parse_week(week, arg)?;
            let year = year
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|y| *y > 0)
                .ok_or_else(|| Error::InvalidInput(format!("Invalid year argument: {}", arg)))?;
            Ok(Period::new(week, expand_two_digit_year(year, today.year)))
        }
        _ => Err(Error::InvalidInput(format!("Malformed period argument: {}", arg))),
    }
}

fn parse_week(token: &str, arg: &str) -> Result<u32> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::InvalidInput(format!("Invalid week argument: {}", arg)))
}

fn year_for_week(week: u32, today: Period) -> i32 {
    if week <= today.week {
        today.year
    } else {
        today.year - 1
    }
}

fn expand_two_digit_year(year: i32, current_year: i32) -> i32 {
    if year >= 100 {
        year
    } else if year < current_year - 2000 {
        year + 2000
    } else {
        year + 1900
    }
}
