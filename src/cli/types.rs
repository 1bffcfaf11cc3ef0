//! CLI type definitions
//!
//! This module contains the clap structure that defines the CLI interface.
//! Every flag is optional here; missing values fall back to the config
//! file, the environment and finally the built-in defaults.

use clap::Parser;
use std::path::PathBuf;

use crate::domain::models::IssueStateFilter;
use crate::infrastructure::config::{ConfigOverrides, LoggingOverrides};

#[derive(Parser, Debug)]
#[command(name = "org-issues")]
#[command(
    about = "Collect the issues of every active repository in a GitHub organization",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Organization whose repositories are scanned
    #[arg(short, long)]
    pub org: Option<String>,

    /// GitHub token (falls back to GH_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Characters of issue body kept in the report and CSV
    #[arg(short, long)]
    pub max_body_length: Option<usize>,

    /// CSV output path (default: <org>_issues.csv)
    #[arg(short = 'f', long = "output")]
    pub output_file: Option<PathBuf>,

    /// Issue state to request: open, closed or all
    #[arg(short, long)]
    pub state: Option<IssueStateFilter>,

    /// Records requested per page (1-100)
    #[arg(long)]
    pub per_page: Option<u8>,

    /// Give up after this many rate-limit retries on one page
    #[arg(long)]
    pub max_rate_limit_retries: Option<u32>,

    /// Configuration file (default: .org-issues.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,
}

impl Cli {
    /// Flag values as the highest-precedence configuration layer.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            organization: self.org.clone(),
            token: self.token.clone(),
            api_url: self.api_url.clone(),
            max_body_length: self.max_body_length,
            output_file: self.output_file.clone(),
            issue_state: self.state,
            per_page: self.per_page,
            max_rate_limit_retries: self.max_rate_limit_retries,
            logging: self.log_level.as_ref().map(|level| LoggingOverrides {
                level: Some(level.clone()),
                format: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_means_no_overrides() {
        let cli = Cli::try_parse_from(["org-issues"]).unwrap();
        let overrides = cli.overrides();
        assert!(overrides.organization.is_none());
        assert!(overrides.token.is_none());
        assert!(overrides.logging.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_log_level_becomes_nested_override() {
        let cli = Cli::try_parse_from(["org-issues", "--log-level", "debug"]).unwrap();
        let logging = cli.overrides().logging.unwrap();
        assert_eq!(logging.level.as_deref(), Some("debug"));
        assert!(logging.format.is_none());
    }
}
