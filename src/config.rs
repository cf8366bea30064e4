use serde::{Deserialize, Serialize};
use crate::error::ProbeError;
use crate::{v_info, v_summary};
use std::fs;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONFIG_FILE: &str = "stats_probe.toml";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
pub const BASE_URL_ENV: &str = "STATS_PROBE_BASE_URL";
pub const TOKEN_ENV: &str = "STATS_PROBE_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the time-tracking service, without a trailing slash
    pub base_url: String,
    /// Bearer token. Prefer the environment over writing it to disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Connect + read timeout for each request
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// 0 = requests, raw JSON and reports, 1 = failure details, 2 = debug traces
    pub verbosity: u8,
    /// Append every request/response pair to this file when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_log_path: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Values that override the file (flags, with the environment folded in by clap)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub verbosity: Option<u8>,
    pub api_log_path: Option<String>,
}

impl ProbeConfig {
    /// Load configuration from file, falling back to defaults if it doesn't exist
    pub fn load_or_default(config_path: &str) -> Result<Self, ProbeError> {
        if Path::new(config_path).exists() {
            v_info!("📋 Loading configuration from {}", config_path);
            let config_str = fs::read_to_string(config_path)
                .map_err(|e| ProbeError::Config(format!("failed to read {}: {}", config_path, e)))?;
            toml::from_str(&config_str)
                .map_err(|e| ProbeError::Config(format!("failed to parse {}: {}", config_path, e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, config_path: &str) -> Result<(), ProbeError> {
        if let Some(parent) = Path::new(config_path).parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ProbeError::Config(format!("failed to create {}: {}", parent.display(), e)))?;
        }

        let config_str = toml::to_string_pretty(self)
            .map_err(|e| ProbeError::Config(e.to_string()))?;
        fs::write(config_path, config_str)
            .map_err(|e| ProbeError::Config(format!("failed to write {}: {}", config_path, e)))?;
        Ok(())
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.api.base_url = base_url;
        }
        if let Some(token) = overrides.token {
            self.api.token = Some(token);
        }
        if let Some(timeout) = overrides.timeout_seconds {
            self.api.timeout_seconds = timeout;
        }
        if let Some(verbosity) = overrides.verbosity {
            self.output.verbosity = verbosity;
        }
        if let Some(path) = overrides.api_log_path {
            self.output.api_log_path = Some(path);
        }
    }

    /// Base URL with any trailing slashes removed
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ProbeError> {
        let base_url = self.base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ProbeError::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.api.base_url
            )));
        }

        match self.api.token.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(ProbeError::Config(format!(
                    "no bearer token supplied (use --token or {})",
                    TOKEN_ENV
                )));
            }
            Some(_) => {}
        }

        if self.api.timeout_seconds == 0 {
            return Err(ProbeError::Config("timeout_seconds must be greater than 0".to_string()));
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        v_summary!("📋 Configuration Summary:");
        v_summary!("   🌐 Base URL: {}", self.base_url());
        v_summary!("   🔑 Token: {}", mask_token(self.api.token.as_deref().unwrap_or("")));
        v_summary!("   ⏰ Timeout: {}s", self.api.timeout_seconds);
        if let Some(path) = &self.output.api_log_path {
            v_summary!("   📝 API log: {}", path);
        }
    }
}

/// Keep only enough of the token to tell two tokens apart
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(6).collect();
    if token.chars().count() <= 6 {
        "*".repeat(token.chars().count())
    } else {
        format!("{}…", visible)
    }
}
