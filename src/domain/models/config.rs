use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Raw configuration as merged from defaults, file, environment and CLI.
///
/// Required values are optional here; [`ConfigLoader::validate`] turns this
/// into [`Settings`] or reports what is missing.
///
/// [`ConfigLoader::validate`]: crate::infrastructure::config::ConfigLoader::validate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrackerConfig {
    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Organization whose repositories are scanned (required)
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub organization: Option<String>,

    /// Access token sent with every request (required)
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub token: Option<String>,

    /// Characters of issue body kept in the export and report
    #[serde(default = "default_max_body_length")]
    pub max_body_length: usize,

    /// CSV destination; derived from the organization when unset
    #[serde(default)]
    pub output_file: Option<PathBuf>,

    /// Which issues to request
    #[serde(default)]
    pub issue_state: IssueStateFilter,

    /// Page size requested from list endpoints (1-100)
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Backoff used when a rate-limited response has no usable `Retry-After`
    #[serde(default = "default_retry_after_secs")]
    pub default_retry_after_secs: u64,

    /// Cap on consecutive rate-limit retries; unbounded when unset
    #[serde(default)]
    pub max_rate_limit_retries: Option<u32>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Accept a bare number where a string is expected, e.g. `organization: 1234`.
fn scalar_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
    }))
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_max_body_length() -> usize {
    100
}

const fn default_per_page() -> u8 {
    100
}

const fn default_request_timeout_secs() -> u64 {
    5
}

const fn default_retry_after_secs() -> u64 {
    60
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            organization: None,
            token: None,
            max_body_length: default_max_body_length(),
            output_file: None,
            issue_state: IssueStateFilter::default(),
            per_page: default_per_page(),
            request_timeout_secs: default_request_timeout_secs(),
            default_retry_after_secs: default_retry_after_secs(),
            max_rate_limit_retries: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// `state` query parameter for the issue list endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl IssueStateFilter {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for IssueStateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IssueStateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "all" => Ok(Self::All),
            other => Err(format!(
                "invalid issue state '{other}' (expected open, closed or all)"
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for an additional JSON log file
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for the log file: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "never".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Validated settings for one run.
///
/// Built once at the entry point and passed by reference to the client,
/// exporter and report.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base API URL without a trailing slash
    pub api_url: String,
    pub organization: String,
    pub token: String,
    pub max_body_length: usize,
    pub output_file: PathBuf,
    pub issue_state: IssueStateFilter,
    pub per_page: u8,
    pub request_timeout: Duration,
    pub default_retry_after: Duration,
    pub max_rate_limit_retries: Option<u32>,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Output file name used when none is configured.
    pub fn default_output_file(organization: &str) -> PathBuf {
        PathBuf::from(format!("{organization}_issues.csv"))
    }
}
