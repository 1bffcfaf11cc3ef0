//! org-issues - organization-wide GitHub issue tracker
//!
//! Lists every active repository of a GitHub organization, collects their
//! issues (pull requests excluded), orders them so bugs and breaking changes
//! come first, writes them to a CSV file and prints a per-repository report.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Issue and repository models, settings, errors and ports
//! - **Service Layer** (`services`): Filtering, priority ordering and collection
//! - **Infrastructure Layer** (`infrastructure`): GitHub client, configuration, logging and CSV export
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use org_issues::cli::commands::run;
//! use org_issues::infrastructure::config::{ConfigLoader, ConfigOverrides};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load(None, &ConfigOverrides::default())?;
//!     let settings = ConfigLoader::validate(&config)?;
//!     let output = run(&settings, true).await?;
//!     println!("{}", output.summary());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Issue, IssueState, IssueStateFilter, LoggingConfig, Repository, Settings, TrackedIssue,
    TrackerConfig,
};
pub use domain::{TrackerError, TrackerResult};
pub use infrastructure::config::{ConfigError, ConfigLoader, ConfigOverrides};
pub use infrastructure::export::CsvExporter;
pub use infrastructure::github::GitHubClient;
pub use services::{IssueReport, IssueTracker};
