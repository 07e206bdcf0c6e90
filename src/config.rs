use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Longest pause allowed between two products.
pub const MAX_DELAY_SECONDS: f64 = 86_400.0;

/// Environment variable holding the outbound proxy (`user:pass@host:port`).
pub const PROXY_ENV_VAR: &str = "MY_PROXY_INFO";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub hour: u32,
    pub minute: u32,
    pub utc_offset_hours: i32,
}

impl Default for ScheduleConfig {
    // 09:00 in Asia/Ho_Chi_Minh
    fn default() -> Self {
        Self {
            hour: 9,
            minute: 0,
            utc_offset_hours: 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_seconds: f64,
    pub max_delay_seconds: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_seconds: 5.0,
            max_delay_seconds: 10.0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub tracked_urls: Vec<String>,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Filled from the environment by `load_config`, never from the file.
    #[serde(skip)]
    pub proxy_url: String,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("price_history_api.csv")
}

/// Reads `path` and attaches the resolved proxy. `proxy` is the raw value of
/// [`PROXY_ENV_VAR`]; the caller reads the environment.
pub fn load_config(path: &str, proxy: Option<String>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_config(&content, proxy)
}

pub fn parse_config(content: &str, proxy: Option<String>) -> Result<AppConfig, ConfigError> {
    let mut config: AppConfig = serde_json::from_str(content)?;
    config.proxy_url = resolve_proxy(proxy)?;
    config.validate()?;
    Ok(config)
}

fn resolve_proxy(raw: Option<String>) -> Result<String, ConfigError> {
    let raw = raw.unwrap_or_default();
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::MissingProxy(PROXY_ENV_VAR));
    }

    let url = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };
    reqwest::Proxy::all(&url).map_err(|e| ConfigError::InvalidProxy(e.to_string()))?;
    Ok(url)
}

impl AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.schedule;
        if s.hour > 23 || s.minute > 59 {
            return Err(ConfigError::Invalid(format!(
                "schedule time {:02}:{:02} is out of range",
                s.hour, s.minute
            )));
        }
        if !(-12..=14).contains(&s.utc_offset_hours) {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_hours {} is out of range",
                s.utc_offset_hours
            )));
        }

        let p = &self.pacing;
        if !(p.min_delay_seconds >= 0.0
            && p.min_delay_seconds <= p.max_delay_seconds
            && p.max_delay_seconds <= MAX_DELAY_SECONDS)
        {
            return Err(ConfigError::Invalid(format!(
                "pacing range [{}, {}] is invalid",
                p.min_delay_seconds, p.max_delay_seconds
            )));
        }
        Ok(())
    }
}
