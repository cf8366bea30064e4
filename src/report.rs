// Offline analysis of a stats payload: echoes raw fields and recomputes durations
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt;

use crate::error::ProbeError;
use crate::models::{coerce_seconds, plain, FieldValue, SessionEntry, StatsResponse, ValueKind};

/// How many daily stats and entries get a detailed breakdown
pub const SAMPLE_SIZE: usize = 3;

pub const UNKNOWN_STATUS: &str = "неизвестно";
pub const MISSING_START: &str = "не указано";
pub const NOT_FINISHED: &str = "не завершено";
pub const ACTIVE_SESSION: &str = "активная сессия";

/// Whole hours, minutes and seconds of a duration. Fractional seconds are
/// truncated, never rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBreakdown {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl DurationBreakdown {
    pub fn from_seconds(secs: f64) -> Self {
        let whole = if secs.is_finite() { secs.floor() as i64 } else { 0 };
        Self {
            hours: whole.div_euclid(3600),
            minutes: whole.rem_euclid(3600) / 60,
            seconds: whole.rem_euclid(60),
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes * 60 + self.seconds)
    }
}

impl fmt::Display for DurationBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ч. {} мин. {} сек.", self.hours, self.minutes, self.seconds)
    }
}

/// Parse an ISO-8601 timestamp as the API emits it. A trailing `Z` is read as
/// `+00:00`; timestamps without any offset are taken to be UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>, ProbeError> {
    let trimmed = input.trim();
    let normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(stem) => format!("{}+00:00", stem),
        None => trimmed.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(parsed);
    }

    // Offsets without a colon, or minute precision
    for pattern in [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%dT%H:%M%z",
        "%Y-%m-%d %H:%M%:z",
        "%Y-%m-%d %H:%M%z",
    ] {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, pattern) {
            return Ok(parsed);
        }
    }

    for pattern in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, pattern) {
            return Ok(DateTime::<FixedOffset>::from(naive.and_utc()));
        }
    }

    // A bare date is midnight UTC
    if let Some(midnight) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(DateTime::<FixedOffset>::from(midnight.and_utc()));
    }

    Err(ProbeError::TimestampParse {
        value: input.to_string(),
        reason: "not an ISO-8601 date-time".to_string(),
    })
}

/// `(end - start) - paused`, in seconds
pub fn entry_duration_seconds(start: &str, end: &str, paused: f64) -> Result<f64, ProbeError> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    let elapsed = end.signed_duration_since(start);
    let elapsed_secs = elapsed
        .num_microseconds()
        .map(|us| us as f64 / 1_000_000.0)
        .unwrap_or_else(|| elapsed.num_seconds() as f64);
    Ok(elapsed_secs - paused)
}

#[derive(Debug)]
pub struct FieldEcho {
    pub label: &'static str,
    pub value: FieldValue,
}

#[derive(Debug)]
pub struct DailyLine {
    pub date: String,
    pub raw: Value,
    pub breakdown: DurationBreakdown,
}

#[derive(Debug)]
pub enum EntryDuration {
    Completed { seconds: f64, breakdown: DurationBreakdown },
    Active,
    Invalid(ProbeError),
}

#[derive(Debug)]
pub struct EntryLine {
    /// 1-based position in the payload
    pub number: usize,
    pub status: String,
    pub start: String,
    pub end: Option<String>,
    pub paused: Value,
    pub duration: EntryDuration,
}

impl EntryLine {
    fn from_entry(number: usize, entry: &SessionEntry) -> Self {
        let duration = match entry.finished_at() {
            None => EntryDuration::Active,
            Some(end) => match finished_duration(entry, end) {
                Ok(seconds) => EntryDuration::Completed {
                    seconds,
                    breakdown: DurationBreakdown::from_seconds(seconds),
                },
                Err(e) => EntryDuration::Invalid(e),
            },
        };

        Self {
            number,
            status: entry.status.text().unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
            start: entry.start_time.text().unwrap_or_else(|| MISSING_START.to_string()),
            end: entry.finished_at().map(plain),
            paused: entry.total_paused.value().cloned().unwrap_or(Value::from(0)),
            duration,
        }
    }
}

fn timestamp_text<'a>(field: &'static str, value: &'a Value) -> Result<&'a str, ProbeError> {
    value.as_str().ok_or_else(|| ProbeError::TimestampParse {
        value: plain(value),
        reason: format!("{} is a {}, not a string", field, ValueKind::of(value)),
    })
}

fn finished_duration(entry: &SessionEntry, end: &Value) -> Result<f64, ProbeError> {
    let start = entry
        .start_time
        .value()
        .filter(|v| !v.is_null())
        .ok_or_else(|| ProbeError::TimestampParse {
            value: String::new(),
            reason: "start_time is missing on a finished entry".to_string(),
        })?;
    let start = timestamp_text("start_time", start)?;
    let end = timestamp_text("end_time", end)?;
    entry_duration_seconds(start, end, entry.paused_seconds())
}

/// Everything the stats check prints after the raw JSON echo
#[derive(Debug)]
pub struct DisplayReport {
    pub fields: Vec<FieldEcho>,
    pub total: Option<DurationBreakdown>,
    pub daily_count: usize,
    pub daily: Vec<DailyLine>,
    pub entry_count: usize,
    pub entries: Vec<EntryLine>,
}

impl DisplayReport {
    /// Data-quality problems found while summarizing
    pub fn errors(&self) -> Vec<&ProbeError> {
        self.entries
            .iter()
            .filter_map(|line| match &line.duration {
                EntryDuration::Invalid(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }
}

pub fn summarize(stats: &StatsResponse) -> DisplayReport {
    let fields = vec![
        FieldEcho { label: "Общая продолжительность", value: stats.total_duration.clone() },
        FieldEcho { label: "Среднее время в день", value: stats.average_daily_hours.clone() },
        FieldEcho { label: "Самая длинная сессия", value: stats.longest_session.clone() },
    ];

    let total = stats
        .total_duration
        .is_set()
        .then(|| DurationBreakdown::from_seconds(stats.total_duration.seconds()));

    let daily = stats
        .daily_stats
        .iter()
        .take(SAMPLE_SIZE)
        .map(|(date, raw)| DailyLine {
            date: date.clone(),
            raw: raw.clone(),
            breakdown: DurationBreakdown::from_seconds(coerce_seconds(raw)),
        })
        .collect();

    let entries = stats
        .entries
        .iter()
        .take(SAMPLE_SIZE)
        .enumerate()
        .map(|(i, entry)| EntryLine::from_entry(i + 1, entry))
        .collect();

    DisplayReport {
        fields,
        total,
        daily_count: stats.daily_stats.len(),
        daily,
        entry_count: stats.entries.len(),
        entries,
    }
}

impl fmt::Display for DisplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📋 Анализ статистики:")?;
        for field in &self.fields {
            match &field.value {
                FieldValue::Absent => writeln!(f, "- {}: отсутствует", field.label)?,
                FieldValue::Present(v) => writeln!(
                    f,
                    "- {}: {} (тип: {})",
                    field.label,
                    v,
                    ValueKind::of(v)
                )?,
            }
        }

        if let Some(total) = &self.total {
            writeln!(f, "- Общая продолжительность (преобразованная): {}", total)?;
        }

        writeln!(f, "- Ежедневная статистика: {} дней", self.daily_count)?;
        for day in &self.daily {
            writeln!(
                f,
                "  * {}: {} (тип: {})",
                day.date,
                day.raw,
                ValueKind::of(&day.raw)
            )?;
            writeln!(f, "    Преобразованная длительность: {}", day.breakdown)?;
        }

        writeln!(f, "- Записи: {}", self.entry_count)?;
        for line in &self.entries {
            writeln!(
                f,
                "  * Запись {}: статус={}, начало={}, окончание={}",
                line.number,
                line.status,
                line.start,
                line.end.as_deref().unwrap_or(NOT_FINISHED)
            )?;
            match &line.duration {
                EntryDuration::Completed { breakdown, .. } => writeln!(
                    f,
                    "    Длительность: {}, Пауза: {} сек.",
                    breakdown,
                    plain(&line.paused)
                )?,
                EntryDuration::Active => writeln!(
                    f,
                    "    Длительность: {}, Пауза: {} сек.",
                    ACTIVE_SESSION,
                    plain(&line.paused)
                )?,
                EntryDuration::Invalid(e) => writeln!(
                    f,
                    "    ❌ [{}] Длительность не вычислена: {}, Пауза: {} сек.",
                    e.label(),
                    e,
                    plain(&line.paused)
                )?,
            }
        }
        Ok(())
    }
}
