use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::config::{IssueStateFilter, Settings, TrackerConfig};

/// Project-local configuration file, read when no `--config` path is given
pub const DEFAULT_CONFIG_FILE: &str = ".org-issues.yaml";

/// Prefix of environment variables that override configuration keys
pub const ENV_PREFIX: &str = "ORG_ISSUES_";

/// Token variable honoured for compatibility with the `gh` tooling
pub const TOKEN_ENV_VAR: &str = "GH_TOKEN";

/// Prefixed keys taken verbatim from the environment. figment would parse
/// an all-digit login or token as a number.
const VERBATIM_ENV_KEYS: [&str; 2] = ["token", "organization"];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Organization is required (set --org, ORG_ISSUES_ORGANIZATION or `organization` in the config file)")]
    MissingOrganization,

    #[error("Access token is required (set --token, GH_TOKEN or ORG_ISSUES_TOKEN)")]
    MissingToken,

    #[error("Invalid per_page: {0}. Must be between 1 and 100")]
    InvalidPerPage(u8),

    #[error("Invalid request_timeout_secs: {0}. Must be positive")]
    InvalidTimeout(u64),

    #[error("Invalid api_url: {0}. Must start with http:// or https://")]
    InvalidApiUrl(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Values supplied on the command line.
///
/// Unset fields are skipped during serialization so they never mask a
/// value from a lower layer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_body_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_state: Option<IssueStateFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rate_limit_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingOverrides>,
}

/// Logging values supplied on the command line
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoggingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `config_file`, or `.org-issues.yaml` in the working directory (optional)
    /// 3. `GH_TOKEN` environment variable (mapped to `token`)
    /// 4. Environment variables (`ORG_ISSUES_*` prefix, `__` for nesting;
    ///    token and organization are read verbatim as strings)
    /// 5. Command-line overrides
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<TrackerConfig> {
        Self::figment(config_file, overrides)
            .extract()
            .context("Failed to extract configuration from figment")
    }

    /// Build the layered figment without extracting it.
    pub fn figment(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
        let file = config_file.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);

        let mut figment = Figment::new()
            .merge(Serialized::defaults(TrackerConfig::default()))
            .merge(Yaml::file(file));
        figment = merge_verbatim_env(figment, TOKEN_ENV_VAR, "token");
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&VERBATIM_ENV_KEYS)
                .split("__"),
        );
        for key in VERBATIM_ENV_KEYS {
            let var = format!("{ENV_PREFIX}{}", key.to_uppercase());
            figment = merge_verbatim_env(figment, &var, key);
        }
        figment.merge(Serialized::defaults(overrides))
    }

    /// Validate merged configuration and resolve it into run [`Settings`].
    ///
    /// Runs before any network request, so a missing organization or token
    /// aborts the run without contacting the API.
    pub fn validate(config: &TrackerConfig) -> Result<Settings, ConfigError> {
        let organization = config
            .organization
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingOrganization)?
            .to_string();

        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingToken)?
            .to_string();

        if config.per_page == 0 || config.per_page > 100 {
            return Err(ConfigError::InvalidPerPage(config.per_page));
        }

        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.request_timeout_secs));
        }

        let api_url = config.api_url.trim().trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(config.api_url.clone()));
        }

        // Validate logging config
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        let output_file = config
            .output_file
            .clone()
            .unwrap_or_else(|| Settings::default_output_file(&organization));

        Ok(Settings {
            api_url,
            organization,
            token,
            max_body_length: config.max_body_length,
            output_file,
            issue_state: config.issue_state,
            per_page: config.per_page,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            default_retry_after: Duration::from_secs(config.default_retry_after_secs),
            max_rate_limit_retries: config.max_rate_limit_retries,
            logging: config.logging.clone(),
        })
    }
}

/// Merge `var` as a string value under `key`, if it is set.
fn merge_verbatim_env(figment: Figment, var: &str, key: &str) -> Figment {
    match env::var(var) {
        Ok(value) => figment.merge(Serialized::default(key, value)),
        Err(_) => figment,
    }
}
