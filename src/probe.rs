// Runs the fixed sequence of checks against the service and prints the results
use chrono::NaiveDate;
use std::fmt;

use crate::client::TimeTrackerClient;
use crate::error::ProbeError;
use crate::models::TimeStatusResponse;
use crate::range::StatsRange;
use crate::report::{summarize, DisplayReport};
use crate::{v_error, v_info, v_summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStep {
    TimeStatus,
    /// Current month, or the range given on the command line
    PrimaryStats,
    LastYearStats,
}

impl fmt::Display for ProbeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStep::TimeStatus => write!(f, "статус времени"),
            ProbeStep::PrimaryStats => write!(f, "статистика за выбранный период"),
            ProbeStep::LastYearStats => write!(f, "статистика за последний год"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub failures: Vec<(ProbeStep, String)>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record<T>(&mut self, step: ProbeStep, result: Result<T, ProbeError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.failures.push((step, e.to_string()));
                None
            }
        }
    }

    // A report with unreadable entry timestamps still counts as a failed step
    fn record_stats(&mut self, step: ProbeStep, result: Result<DisplayReport, ProbeError>) {
        if let Some(report) = self.record(step, result) {
            let errors = report.errors();
            if let Some(first) = errors.first() {
                self.failures.push((
                    step,
                    format!("{} entries with unreadable timestamps, first: {}", errors.len(), first),
                ));
            }
        }
    }
}

pub struct StatsProbe {
    pub client: TimeTrackerClient,
    today: NaiveDate,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
}

impl StatsProbe {
    pub fn new(client: TimeTrackerClient, today: NaiveDate) -> Self {
        Self {
            client,
            today,
            custom_start: None,
            custom_end: None,
        }
    }

    /// Override either end of the primary stats window
    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.custom_start = start;
        self.custom_end = end;
        self
    }

    pub fn primary_range(&self) -> StatsRange {
        StatsRange::resolve(self.custom_start, self.custom_end, self.today)
    }

    pub fn yearly_range(&self) -> StatsRange {
        StatsRange::last_year(self.today)
    }

    pub async fn check_time_status(&self) -> Result<TimeStatusResponse, ProbeError> {
        match self.client.fetch_time_status().await {
            Ok(status) => {
                v_summary!("✅ Статус времени: {}", pretty(&status));
                Ok(status)
            }
            Err(e) => {
                report_failure("Ошибка при получении статуса времени", &e);
                Err(e)
            }
        }
    }

    /// Fetch stats for `range`, print the raw payload and the analysis
    pub async fn check_stats(&self, range: &StatsRange) -> Result<DisplayReport, ProbeError> {
        v_summary!("\n📊 Запрос статистики за период: {}", range);

        let stats = match self.client.fetch_stats_range(range).await {
            Ok(stats) => stats,
            Err(e) => {
                report_failure("Ошибка при получении статистики", &e);
                return Err(e);
            }
        };

        v_summary!("✅ Статистика получена: {}", pretty(&stats.raw));

        let report = summarize(&stats);
        v_summary!("\n{}", report);

        Ok(report)
    }

    /// Status, primary stats, then last-year stats. A failing step never stops the next one.
    pub async fn run(&self) -> RunOutcome {
        v_summary!("🚀 Начало проверки статистики ({})", self.client.base_url());
        let mut outcome = RunOutcome::default();

        let status = self.check_time_status().await;
        outcome.record(ProbeStep::TimeStatus, status);

        let primary = self.check_stats(&self.primary_range()).await;
        outcome.record_stats(ProbeStep::PrimaryStats, primary);

        let yearly = self.check_stats(&self.yearly_range()).await;
        outcome.record_stats(ProbeStep::LastYearStats, yearly);

        v_summary!("\n✨ Проверка завершена");
        if !outcome.is_success() {
            v_summary!("⚠️ Шагов с ошибками: {}", outcome.failures.len());
            for (step, message) in &outcome.failures {
                v_info!("   • {}: {}", step, message);
            }
        }
        outcome
    }
}

fn report_failure(context: &str, e: &ProbeError) {
    match e {
        ProbeError::HttpStatus { status, body } => {
            v_error!("❌ {}: {}", context, status);
            v_error!("{}", body);
        }
        other => v_error!("❌ {} [{}]: {}", context, other.label(), other),
    }
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "<unprintable>".to_string())
}
