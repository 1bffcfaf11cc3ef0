//! Issue collection across an organization.
//!
//! Lists the organization's repositories, drops archived ones, fetches
//! each remaining repository's issues one after another and returns them
//! in priority order. Any error aborts the whole collection.

use tracing::{debug, info, instrument};

use crate::domain::errors::TrackerResult;
use crate::domain::models::{Repository, TrackedIssue};
use crate::infrastructure::github::GitHubClient;

use super::aggregator::{self, RepositoryGroup};
use super::filters;

/// Everything collected in one run.
#[derive(Debug, Clone)]
pub struct IssueReport {
    pub organization: String,
    /// Active repositories in the order the API listed them
    pub repositories: Vec<Repository>,
    /// All issues in priority order
    pub issues: Vec<TrackedIssue>,
}

impl IssueReport {
    /// Per-repository view of the sorted issues.
    pub fn by_repository(&self) -> Vec<RepositoryGroup<'_>> {
        aggregator::group_by_repository(&self.repositories, &self.issues)
    }
}

/// Collects issues from every active repository of an organization.
#[derive(Debug, Clone)]
pub struct IssueTracker {
    client: GitHubClient,
}

impl IssueTracker {
    pub const fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    /// Collect and sort the organization's issues.
    ///
    /// `on_repository` is called before each repository's issues are
    /// fetched, which lets the CLI show progress.
    #[instrument(skip(self, on_repository))]
    pub async fn collect<F>(&self, organization: &str, mut on_repository: F) -> TrackerResult<IssueReport>
    where
        F: FnMut(&Repository),
    {
        let listed = self.client.list_org_repositories(organization).await?;
        let listed_count = listed.len();
        let repositories = filters::active_repositories(listed);
        info!(
            listed = listed_count,
            active = repositories.len(),
            "fetched repositories"
        );

        let mut issues = Vec::new();
        for repo in &repositories {
            on_repository(repo);
            let records = self
                .client
                .list_repository_issues(organization, &repo.name)
                .await?;
            let record_count = records.len();
            let repo_issues = filters::issues_only(records);
            debug!(
                repository = %repo.name,
                records = record_count,
                issues = repo_issues.len(),
                "fetched issues"
            );
            issues.extend(aggregator::tag_issues(&repo.name, repo_issues));
        }

        aggregator::sort_by_priority(&mut issues);
        info!(issues = issues.len(), "collected issues");

        Ok(IssueReport {
            organization: organization.to_string(),
            repositories,
            issues,
        })
    }
}
