//! Runtime configuration
//!
//! Read from the process environment (and `.env` via dotenv).

use crate::analysis::valuation::{Projection, ValuationConfig, ValuationModel};
use crate::error::AnalysisError;
use crate::Result;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 25;

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// No timeout unless configured
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiSettings,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub valuation: ValuationConfig,
}

impl AppConfig {
    /// Load `.env` if present, then read the environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let gemini = GeminiSettings {
            api_key: get("GEMINI_API_KEY").unwrap_or_default(),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            timeout: parse_opt::<u64>("GEMINI_TIMEOUT_SECS", get("GEMINI_TIMEOUT_SECS"))?
                .map(Duration::from_secs),
        };

        let port = parse_opt::<u16>("PORT", get("PORT").or_else(|| get("API_PORT")))?
            .unwrap_or(DEFAULT_PORT);

        let max_upload_mb = parse_opt::<usize>("MAX_UPLOAD_MB", get("MAX_UPLOAD_MB"))?
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        let defaults = ValuationConfig::default();

        let model = match get("VALUATION_MODEL").map(|v| v.to_lowercase()).as_deref() {
            None | Some("perpetuity") | Some("dcf") => ValuationModel::Perpetuity,
            Some("blended") | Some("dcf_multiple") => ValuationModel::Blended,
            Some(other) => {
                return Err(AnalysisError::ConfigError(format!(
                    "VALUATION_MODEL must be 'perpetuity' or 'blended', got '{}'",
                    other
                )))
            }
        };

        let projected_cash_flows = get("PROJECTED_CASH_FLOWS")
            .map(|raw| parse_list("PROJECTED_CASH_FLOWS", &raw))
            .transpose()?;
        let terminal_value = parse_opt::<f64>("TERMINAL_VALUE", get("TERMINAL_VALUE"))?;

        let projection = match (projected_cash_flows, terminal_value) {
            (Some(cash_flows), Some(terminal_value)) => Some(Projection {
                cash_flows,
                terminal_value,
            }),
            (None, None) => None,
            _ => {
                return Err(AnalysisError::ConfigError(
                    "PROJECTED_CASH_FLOWS and TERMINAL_VALUE must be set together".to_string(),
                ))
            }
        };

        let valuation = ValuationConfig {
            model,
            discount_rate: parse_opt("DISCOUNT_RATE", get("DISCOUNT_RATE"))?
                .unwrap_or(defaults.discount_rate),
            terminal_growth_rate: parse_opt("TERMINAL_GROWTH_RATE", get("TERMINAL_GROWTH_RATE"))?
                .unwrap_or(defaults.terminal_growth_rate),
            ebitda_multiple: parse_opt("EBITDA_MULTIPLE", get("EBITDA_MULTIPLE"))?
                .unwrap_or(defaults.ebitda_multiple),
            projection,
        };

        Ok(Self {
            gemini,
            port,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            valuation,
        })
    }
}

fn parse_opt<T>(key: &str, value: Option<String>) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse::<T>().map_err(|e| {
                AnalysisError::ConfigError(format!("{} has invalid value '{}': {}", key, raw, e))
            })
        })
        .transpose()
}

fn parse_list(key: &str, raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .map(|item| {
            item.parse::<f64>().map_err(|e| {
                AnalysisError::ConfigError(format!("{} has invalid entry '{}': {}", key, item, e))
            })
        })
        .collect()
}
