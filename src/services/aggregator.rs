//! Aggregation and priority ordering of issues across repositories.
//!
//! Issues are ordered by `(bug, breaking, repository)` descending:
//! - issues labelled "bug" come first
//! - then issues labelled "breaking"
//! - then by repository name, Z to A
//!
//! Ties keep their input order.

use std::cmp::Ordering;

use crate::domain::models::{Issue, Repository, TrackedIssue};

/// Sort key of a tracked issue; larger keys come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityKey<'a> {
    pub bug: bool,
    pub breaking: bool,
    pub repository: &'a str,
}

impl<'a> PriorityKey<'a> {
    pub fn of(issue: &'a TrackedIssue) -> Self {
        Self {
            bug: issue.is_bug(),
            breaking: issue.is_breaking(),
            repository: &issue.repository,
        }
    }
}

/// Tag every issue with the repository it was fetched under.
pub fn tag_issues(repository: &str, issues: Vec<Issue>) -> Vec<TrackedIssue> {
    issues
        .into_iter()
        .map(|issue| TrackedIssue::new(repository, issue))
        .collect()
}

/// Sort in place by descending [`PriorityKey`].
///
/// `sort_by` is stable, so issues with equal keys keep their input order.
pub fn sort_by_priority(issues: &mut [TrackedIssue]) {
    issues.sort_by(compare_priority);
}

/// Ordering used by [`sort_by_priority`]: `Less` means `a` is listed first.
pub fn compare_priority(a: &TrackedIssue, b: &TrackedIssue) -> Ordering {
    PriorityKey::of(b).cmp(&PriorityKey::of(a))
}

/// Issues of one repository, in global priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryGroup<'a> {
    pub repository: &'a str,
    pub issues: Vec<&'a TrackedIssue>,
}

/// Split a sorted sequence per repository.
///
/// Groups follow the order of `repositories`; within a group the global
/// order is preserved. Repositories without issues get an empty group.
pub fn group_by_repository<'a>(
    repositories: &'a [Repository],
    sorted: &'a [TrackedIssue],
) -> Vec<RepositoryGroup<'a>> {
    repositories
        .iter()
        .map(|repo| RepositoryGroup {
            repository: repo.name.as_str(),
            issues: sorted
                .iter()
                .filter(|issue| issue.repository == repo.name)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IssueState;

    fn tracked(title: &str, repo: &str, labels: &[&str]) -> TrackedIssue {
        TrackedIssue::new(
            repo,
            Issue {
                title: title.to_string(),
                state: IssueState::Open,
                labels: labels.iter().map(|l| (*l).to_string()).collect(),
                created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                updated_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                body: None,
                html_url: String::new(),
            },
        )
    }

    fn titles(issues: &[TrackedIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.issue.title.as_str()).collect()
    }

    #[test]
    fn test_bug_beats_breaking_beats_neither() {
        let mut issues = vec![
            tracked("C", "beta", &[]),
            tracked("B", "alpha", &["breaking"]),
            tracked("A", "zeta", &["bug"]),
        ];
        sort_by_priority(&mut issues);
        assert_eq!(titles(&issues), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_repository_name_descending_on_tie() {
        let mut issues = vec![tracked("E", "alpha", &["bug"]), tracked("D", "zeta", &["bug"])];
        sort_by_priority(&mut issues);
        assert_eq!(titles(&issues), vec!["D", "E"]);
    }

    #[test]
    fn test_bug_and_breaking_outranks_bug_alone() {
        let mut issues = vec![
            tracked("bug-only", "zeta", &["bug"]),
            tracked("both", "alpha", &["breaking", "bug"]),
        ];
        sort_by_priority(&mut issues);
        assert_eq!(titles(&issues), vec!["both", "bug-only"]);
    }

    #[test]
    fn test_label_match_is_case_insensitive() {
        let mut issues = vec![tracked("plain", "zeta", &["docs"]), tracked("shouty", "alpha", &["BUG"])];
        sort_by_priority(&mut issues);
        assert_eq!(titles(&issues), vec!["shouty", "plain"]);
    }

    #[test]
    fn test_label_must_match_exactly() {
        let mut issues = vec![
            tracked("bugfix", "alpha", &["bugfix", "not-breaking"]),
            tracked("other", "zeta", &[]),
        ];
        sort_by_priority(&mut issues);
        assert_eq!(titles(&issues), vec!["other", "bugfix"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let mut issues = vec![
            tracked("first", "widgets", &["bug"]),
            tracked("second", "widgets", &["Bug"]),
            tracked("third", "widgets", &["bug", "ui"]),
        ];
        sort_by_priority(&mut issues);
        assert_eq!(titles(&issues), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_tag_issues() {
        let issues = vec![tracked("x", "ignored", &[]).issue, tracked("y", "ignored", &[]).issue];
        let tagged = tag_issues("widgets", issues);
        assert!(tagged.iter().all(|t| t.repository == "widgets"));
        assert_eq!(titles(&tagged), vec!["x", "y"]);
    }

    #[test]
    fn test_group_by_repository_preserves_global_order() {
        let repos = vec![
            Repository::new("alpha", false),
            Repository::new("empty", false),
            Repository::new("zeta", false),
        ];
        let mut issues = vec![
            tracked("a1", "alpha", &[]),
            tracked("z1", "zeta", &[]),
            tracked("a2", "alpha", &["bug"]),
            tracked("z2", "zeta", &["breaking"]),
        ];
        sort_by_priority(&mut issues);

        let groups = group_by_repository(&repos, &issues);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].repository, "alpha");
        let alpha: Vec<&str> = groups[0].issues.iter().map(|i| i.issue.title.as_str()).collect();
        assert_eq!(alpha, vec!["a2", "a1"]);
        assert!(groups[1].issues.is_empty());
        let zeta: Vec<&str> = groups[2].issues.iter().map(|i| i.issue.title.as_str()).collect();
        assert_eq!(zeta, vec!["z2", "z1"]);
    }
}
