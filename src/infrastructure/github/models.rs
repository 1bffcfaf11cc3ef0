//! GitHub REST API response models.
//!
//! These structs map to the GitHub REST API v3 JSON payloads. Unknown
//! fields are ignored. They are converted into domain models by the
//! filters in [`crate::services::filters`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{Issue, IssueState, Repository};

/// A repository returned by the organization repository listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepository {
    /// Repository name (without the owner prefix).
    pub name: String,
    /// Whether the repository has been archived.
    #[serde(default)]
    pub archived: bool,
}

impl From<GitHubRepository> for Repository {
    fn from(repo: GitHubRepository) -> Self {
        Self::new(repo.name, repo.archived)
    }
}

/// An issue returned by the GitHub API.
///
/// Note: issues and pull requests share the same endpoint. Pull requests
/// carry a non-null `pull_request` object; [`is_pull_request`] detects them.
///
/// [`is_pull_request`]: GitHubIssue::is_pull_request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIssue {
    /// Issue title.
    pub title: String,
    /// Current state: "open" or "closed".
    pub state: IssueState,
    /// Labels applied to the issue.
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    /// ISO 8601 timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// ISO 8601 timestamp of the last update.
    pub updated_at: DateTime<Utc>,
    /// Issue body text (may be absent or null).
    #[serde(default)]
    pub body: Option<String>,
    /// URL to view the issue in the GitHub UI.
    pub html_url: String,
    /// Present when this item is actually a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl GitHubIssue {
    /// Whether this record is a pull request rather than an issue.
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl From<GitHubIssue> for Issue {
    fn from(issue: GitHubIssue) -> Self {
        Self {
            title: issue.title,
            state: issue.state,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            created_at: issue.created_at,
            updated_at: issue.updated_at,
            body: issue.body,
            html_url: issue.html_url,
        }
    }
}

/// A label applied to a GitHub issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubLabel {
    /// The label name (e.g., "bug", "breaking").
    pub name: String,
}
