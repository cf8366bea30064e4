// Date windows for the custom stats endpoint
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::fmt;

use crate::error::ProbeError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[start, end]` window sent as `start_date` / `end_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StatsRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Fill in whatever the caller left out: start defaults to the first of
    /// `today`'s month, end defaults to `today`.
    pub fn resolve(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self {
            start: start.unwrap_or_else(|| first_of_month(today)),
            end: end.unwrap_or(today),
        }
    }

    pub fn current_month(today: NaiveDate) -> Self {
        Self::resolve(None, None, today)
    }

    /// The 365 days leading up to `today`
    pub fn last_year(today: NaiveDate) -> Self {
        Self::new(today - Duration::days(365), today)
    }

    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    pub fn query(&self) -> [(&'static str, String); 2] {
        [("start_date", self.start_param()), ("end_date", self.end_param())]
    }
}

impl fmt::Display for StatsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_param(), self.end_param())
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ProbeError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| ProbeError::InvalidDate(input.to_string()))
}
