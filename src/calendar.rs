//! ISO week arithmetic over `YYYY-MM-DD` dates.
//!
//! Weekdays are numbered Monday=0 through Sunday=6. Every textual entry point
//! returns a [`CalendarError`] for malformed input instead of panicking, so the
//! error text can be handed straight back to a user or a model.

use chrono::{Datelike, Days, Local, NaiveDate};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid date '{0}'. Please use YYYY-MM-DD format.")]
    InvalidDate(String),
    #[error("Date '{0}' is outside the supported calendar range.")]
    OutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// ISO weekday index, 0 for Monday through 6 for Sunday.
    pub fn weekday(&self) -> u32 {
        self.0.weekday().num_days_from_monday()
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[self.weekday() as usize]
    }

    pub fn monday(&self) -> Result<CalendarDate, CalendarError> {
        self.0
            .checked_sub_days(Days::new(u64::from(self.weekday())))
            .map(CalendarDate)
            .ok_or_else(|| CalendarError::OutOfRange(self.to_string()))
    }

    /// The seven days of this date's week, Monday first.
    pub fn week(&self) -> Result<Vec<(&'static str, CalendarDate)>, CalendarError> {
        let monday = self.monday()?;
        WEEKDAY_NAMES
            .iter()
            .zip(0u64..)
            .map(|(name, offset)| {
                monday
                    .0
                    .checked_add_days(Days::new(offset))
                    .map(|day| (*name, CalendarDate(day)))
                    .ok_or_else(|| CalendarError::OutOfRange(self.to_string()))
            })
            .collect()
    }
}

impl FromStr for CalendarDate {
    type Err = CalendarError;

    // chrono accepts unpadded fields, so the shape is checked first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(CalendarError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(CalendarDate)
            .map_err(|_| CalendarError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Source of "today". Injected so tests can pin the date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn monday_of(date: &str) -> Result<String, CalendarError> {
    let date: CalendarDate = date.parse()?;
    date.monday().map(|monday| monday.to_string())
}

pub fn weekday_name(date: &str) -> Result<&'static str, CalendarError> {
    let date: CalendarDate = date.parse()?;
    Ok(date.weekday_name())
}

pub fn week_info(date: &str) -> Result<Vec<(&'static str, String)>, CalendarError> {
    let date: CalendarDate = date.parse()?;
    Ok(date
        .week()?
        .into_iter()
        .map(|(name, day)| (name, day.to_string()))
        .collect())
}

pub fn today(clock: &dyn Clock) -> String {
    CalendarDate(clock.today()).to_string()
}
