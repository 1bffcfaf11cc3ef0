//! The single command: collect, export and report.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{
    create_spinner_with_message, hidden_spinner, output, CommandOutput, ProgressBarExt,
    ReportFormatter,
};
use crate::cli::types::Cli;
use crate::domain::models::{truncate_with_ellipsis, Settings, TrackedIssue};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::export::CsvExporter;
use crate::infrastructure::github::GitHubClient;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::{IssueReport, IssueTracker};

/// Issues of one repository as they appear in the report, bodies
/// already cut to `max_body_length`.
#[derive(Debug, Clone, Serialize)]
pub struct RepositorySection {
    pub name: String,
    pub issues: Vec<TrackedIssue>,
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub organization: String,
    pub output_file: PathBuf,
    pub repositories: Vec<RepositorySection>,
    #[serde(skip)]
    max_body_length: usize,
}

impl RunOutput {
    pub fn new(report: &IssueReport, output_file: PathBuf, max_body_length: usize) -> Self {
        let repositories = report
            .by_repository()
            .into_iter()
            .map(|group| RepositorySection {
                name: group.repository.to_string(),
                issues: group
                    .issues
                    .into_iter()
                    .map(|tracked| excerpted(tracked, max_body_length))
                    .collect(),
            })
            .collect();

        Self {
            organization: report.organization.clone(),
            output_file,
            repositories,
            max_body_length,
        }
    }

    pub fn issue_count(&self) -> usize {
        self.repositories.iter().map(|r| r.issues.len()).sum()
    }

    /// Final line of the human report.
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} issues from {} repositories to {}",
            self.issue_count(),
            self.repositories.len(),
            self.output_file.display()
        )
    }
}

fn excerpted(tracked: &TrackedIssue, max_body_length: usize) -> TrackedIssue {
    let mut tracked = tracked.clone();
    tracked.issue.body = tracked
        .issue
        .body
        .as_deref()
        .map(|body| truncate_with_ellipsis(body, max_body_length));
    tracked
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let formatter = ReportFormatter::new(self.max_body_length);
        let mut lines: Vec<String> = self
            .repositories
            .iter()
            .map(|section| {
                let issues: Vec<&TrackedIssue> = section.issues.iter().collect();
                formatter.format_section(&section.name, &issues)
            })
            .collect();
        lines.push(String::new());
        lines.push(self.summary());
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Merge every configuration layer and validate it. Makes no requests.
pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let config = ConfigLoader::load(cli.config.as_deref(), &cli.overrides())?;
    let settings = ConfigLoader::validate(&config).context("Invalid configuration")?;
    Ok(settings)
}

/// Entry point used by the binary.
pub async fn execute(cli: Cli) -> Result<()> {
    let settings = resolve_settings(&cli)?;

    let log_config = LogConfig::try_from(&settings.logging).map_err(anyhow::Error::msg)?;
    let _logger = LoggerImpl::init(&log_config)?;

    let result = run(&settings, !cli.json).await?;
    output(&result, cli.json);
    Ok(())
}

/// Collect the organization's issues and write the CSV export.
pub async fn run(settings: &Settings, show_progress: bool) -> Result<RunOutput> {
    let client = GitHubClient::new(settings)?;
    run_with_client(settings, client, show_progress).await
}

/// [`run`] with a preconfigured client.
pub async fn run_with_client(
    settings: &Settings,
    client: GitHubClient,
    show_progress: bool,
) -> Result<RunOutput> {
    let spinner = if show_progress {
        create_spinner_with_message(format!(
            "Fetching repositories of {}",
            settings.organization
        ))
    } else {
        hidden_spinner()
    };

    let tracker = IssueTracker::new(client);
    let report = match tracker
        .collect(&settings.organization, |repo| {
            spinner.set_message(format!("Fetching issues of {}", repo.name));
        })
        .await
    {
        Ok(report) => report,
        Err(err) => {
            spinner.finish_error("Fetch failed");
            return Err(err).with_context(|| {
                format!("Failed to collect issues for {}", settings.organization)
            });
        }
    };
    spinner.finish_success(format!(
        "Collected {} issues from {} repositories",
        report.issues.len(),
        report.repositories.len()
    ));

    CsvExporter::new(settings.max_body_length)
        .write_path(&settings.output_file, &report.issues)
        .with_context(|| format!("Failed to write {}", settings.output_file.display()))?;

    Ok(RunOutput::new(
        &report,
        settings.output_file.clone(),
        settings.max_body_length,
    ))
}
