use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::time::Duration;

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::models::*;
use crate::range::{self, StatsRange};
use crate::{v_debug, v_summary};

pub const TIME_STATUS_PATH: &str = "/api/time/status";
pub const CUSTOM_STATS_PATH: &str = "/api/stats/custom";

/// How much of an undecodable body is kept in the error
const SNIPPET_CHARS: usize = 200;

#[derive(Clone)]
pub struct TimeTrackerClient {
    client: reqwest::Client,
    base_url: String,
    api_log_path: Option<String>,
}

impl TimeTrackerClient {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let token = config
            .api
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProbeError::Config("no bearer token supplied".to_string()))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ProbeError::Config("token contains characters not allowed in a header".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .build()?;

        Ok(TimeTrackerClient {
            client,
            base_url: config.base_url().to_string(),
            api_log_path: config.output.api_log_path.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn log_api_call(&self, url: &str, response_status: u16, response_body: &str) {
        let Some(path) = &self.api_log_path else {
            return;
        };

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let log_entry = format!(
            "\n=== API CALL [{timestamp}] ===\n\
             Method: GET\n\
             URL: {url}\n\
             Response Status: {response_status}\n\
             Response Body: {response_body}\n\
             ========================================\n"
        );

        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = file.write_all(log_entry.as_bytes());
        }
    }

    /// GET a path and return the body of a 200 response as JSON
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ProbeError> {
        let url = format!("{}{}", self.base_url, path);
        v_debug!("🌐 [{}] API: GET {} {:?}", chrono::Utc::now().format("%H:%M:%S%.3f"), url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();

        v_summary!("📤 Запрос отправлен на: {}", final_url);
        v_summary!("📥 Статус ответа: {}", status.as_u16());

        let body = response.text().await?;
        self.log_api_call(&final_url, status.as_u16(), &body);

        if status != StatusCode::OK {
            return Err(ProbeError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        decode_json(&body)
    }

    /// Current time-tracking status of the authenticated user
    pub async fn fetch_time_status(&self) -> Result<TimeStatusResponse, ProbeError> {
        let value = self.get_json(TIME_STATUS_PATH, &[]).await?;
        time_status_from_value(value)
    }

    /// Stats for `[start, end]`, defaulting to the current month up to today
    pub async fn fetch_stats(
        &self,
        start: Option<chrono::NaiveDate>,
        end: Option<chrono::NaiveDate>,
    ) -> Result<StatsResponse, ProbeError> {
        let range = StatsRange::resolve(start, end, range::today());
        self.fetch_stats_range(&range).await
    }

    pub async fn fetch_stats_range(&self, range: &StatsRange) -> Result<StatsResponse, ProbeError> {
        let value = self.get_json(CUSTOM_STATS_PATH, &range.query()).await?;
        StatsResponse::from_value(value)
    }
}

pub fn decode_json(body: &str) -> Result<Value, ProbeError> {
    serde_json::from_str(body).map_err(|source| ProbeError::Decode {
        source,
        snippet: body.chars().take(SNIPPET_CHARS).collect(),
    })
}
