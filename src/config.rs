use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::constants::*;
use crate::error::{HandoffError, Result};
use crate::pipeline::dedupe::DateOrder;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lead_sync: LeadSyncConfig,
    pub migration: MigrationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeadSyncConfig {
    pub source_url: String,
    pub target_url: String,
    pub source_api_key: String,
    pub target_api_key: String,
    pub qualification_threshold: u8,
    pub high_quality_threshold: u8,
    pub timeout_seconds: u64,
}

impl Default for LeadSyncConfig {
    fn default() -> Self {
        Self {
            source_url: APOLLO_REPLIES_URL.to_string(),
            target_url: HUBSPOT_CONTACTS_URL.to_string(),
            source_api_key: String::new(),
            target_api_key: String::new(),
            qualification_threshold: DEFAULT_QUALIFICATION_THRESHOLD,
            high_quality_threshold: DEFAULT_HIGH_QUALITY_THRESHOLD,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub input_path: String,
    pub output_dir: String,
    pub default_country_code: String,
    /// How ambiguous `NN/NN/YYYY` enrollment dates are read
    pub date_order: DateOrder,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            input_path: DEFAULT_INPUT_PATH.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            date_order: DateOrder::MonthFirst,
        }
    }
}

impl Config {
    /// Loads `path` if it exists (defaults otherwise), then applies API key
    /// overrides from the environment (and `.env`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                HandoffError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml_str(&content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };

        dotenv::dotenv().ok();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Non-empty values returned by `lookup` replace the configured API keys.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_empty(APOLLO_API_KEY_ENV) {
            self.lead_sync.source_api_key = key;
        }
        if let Some(key) = non_empty(HUBSPOT_API_KEY_ENV) {
            self.lead_sync.target_api_key = key;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ls = &self.lead_sync;
        if ls.qualification_threshold > MAX_SCORE || ls.high_quality_threshold > MAX_SCORE {
            return Err(HandoffError::Config(format!(
                "thresholds must be at most {MAX_SCORE}"
            )));
        }
        if ls.high_quality_threshold < ls.qualification_threshold {
            return Err(HandoffError::Config(format!(
                "high_quality_threshold ({}) is below qualification_threshold ({})",
                ls.high_quality_threshold, ls.qualification_threshold
            )));
        }
        let code = &self.migration.default_country_code;
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(HandoffError::Config(format!(
                "default_country_code must be digits only, got '{code}'"
            )));
        }
        Ok(())
    }
}

impl LeadSyncConfig {
    /// Both API keys are needed before any request goes out.
    pub fn require_api_keys(&self) -> Result<()> {
        if self.source_api_key.trim().is_empty() {
            return Err(HandoffError::Config(format!(
                "missing source API key (set {APOLLO_API_KEY_ENV})"
            )));
        }
        if self.target_api_key.trim().is_empty() {
            return Err(HandoffError::Config(format!(
                "missing target API key (set {HUBSPOT_API_KEY_ENV})"
            )));
        }
        Ok(())
    }
}
