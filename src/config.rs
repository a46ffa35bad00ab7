//! Runtime configuration
//!
//! Read once from the environment at startup.

use crate::error::{AppError, Result};
use crate::market::alpha_vantage::DEMO_KEY;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DATA_DIR: &str = "RISE_DATA_DIR";
pub const ENV_USE_REAL_API: &str = "RISE_USE_REAL_API";
pub const ENV_API_KEY: &str = "ALPHA_VANTAGE_API_KEY";
pub const ENV_REFRESH_DELAY_MS: &str = "RISE_REFRESH_DELAY_MS";

const DEFAULT_DATA_DIR: &str = ".rise";
const DEFAULT_REFRESH_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `rise.db`
    pub data_dir: PathBuf,
    pub use_real_api: bool,
    pub api_key: String,
    /// Simulated latency before a refresh completes
    pub refresh_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            use_real_api: false,
            api_key: DEMO_KEY.to_string(),
            refresh_delay: Duration::from_millis(DEFAULT_REFRESH_DELAY_MS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables use defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let data_dir = lookup(ENV_DATA_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let use_real_api = match lookup(ENV_USE_REAL_API) {
            Some(v) => parse_flag(ENV_USE_REAL_API, &v)?,
            None => defaults.use_real_api,
        };

        let api_key = lookup(ENV_API_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_key);

        let refresh_delay = match lookup(ENV_REFRESH_DELAY_MS) {
            Some(v) => Duration::from_millis(v.trim().parse().map_err(|_| {
                AppError::Config(format!("{} must be a whole number, got '{}'", ENV_REFRESH_DELAY_MS, v))
            })?),
            None => defaults.refresh_delay,
        };

        Ok(Self {
            data_dir,
            use_real_api,
            api_key,
            refresh_delay,
        })
    }

    /// Live quotes need the flag and a key other than the public demo key
    pub fn real_api_enabled(&self) -> bool {
        self.use_real_api && self.api_key != DEMO_KEY
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("rise.db")
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Config(format!("{} must be true or false, got '{}'", name, other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database_path(), PathBuf::from(".rise").join("rise.db"));
        assert!(!config.real_api_enabled());
    }

    #[test]
    fn test_real_api_requires_non_demo_key() {
        let demo = config_from(&[(ENV_USE_REAL_API, "true")]).unwrap();
        assert!(demo.use_real_api);
        assert!(!demo.real_api_enabled());

        let keyed = config_from(&[(ENV_USE_REAL_API, "true"), (ENV_API_KEY, "ABC123")]).unwrap();
        assert!(keyed.real_api_enabled());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let delay = config_from(&[(ENV_REFRESH_DELAY_MS, "soon")]);
        assert!(matches!(delay, Err(AppError::Config(_))));

        let flag = config_from(&[(ENV_USE_REAL_API, "maybe")]);
        assert!(matches!(flag, Err(AppError::Config(_))));

        let ok = config_from(&[(ENV_REFRESH_DELAY_MS, "0")]).unwrap();
        assert_eq!(ok.refresh_delay, Duration::ZERO);
    }
}
