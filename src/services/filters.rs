//! Filters from raw API records to domain models.
//!
//! Both filters are pure and order-preserving.

use crate::domain::models::{Issue, Repository};
use crate::infrastructure::github::{GitHubIssue, GitHubRepository};

/// Keep the repositories that are not archived, in input order.
pub fn active_repositories(repositories: Vec<GitHubRepository>) -> Vec<Repository> {
    repositories
        .into_iter()
        .map(Repository::from)
        .filter(Repository::is_active)
        .collect()
}

/// Keep the records that are real issues (no pull-request marker), in input order.
pub fn issues_only(records: Vec<GitHubIssue>) -> Vec<Issue> {
    records
        .into_iter()
        .filter(|record| !record.is_pull_request())
        .map(Issue::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IssueState;
    use crate::infrastructure::github::GitHubLabel;

    fn repo(name: &str, archived: bool) -> GitHubRepository {
        GitHubRepository {
            name: name.to_string(),
            archived,
        }
    }

    fn record(title: &str, pull_request: bool) -> GitHubIssue {
        GitHubIssue {
            title: title.to_string(),
            state: IssueState::Open,
            labels: vec![GitHubLabel {
                name: "bug".to_string(),
            }],
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            updated_at: "2024-01-02T00:00:00Z".parse().unwrap(),
            body: None,
            html_url: format!("https://github.com/acme/widgets/issues/{title}"),
            pull_request: pull_request
                .then(|| serde_json::json!({ "url": "https://api.github.com/repos/acme/widgets/pulls/1" })),
        }
    }

    #[test]
    fn test_archived_repositories_are_dropped() {
        let active = active_repositories(vec![
            repo("alpha", false),
            repo("legacy", true),
            repo("beta", false),
        ]);
        let names: Vec<&str> = active.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_pull_requests_are_dropped() {
        let issues = issues_only(vec![record("1", false), record("2", true), record("3", false)]);
        let titles: Vec<&str> = issues.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["1", "3"]);
        assert_eq!(issues[0].labels, vec!["bug".to_string()]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(active_repositories(Vec::new()).is_empty());
        assert!(issues_only(Vec::new()).is_empty());
    }
}
