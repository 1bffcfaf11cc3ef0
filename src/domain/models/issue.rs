//! Issue domain model.
//!
//! An [`Issue`] is what the tracker keeps from an API record once pull
//! requests have been filtered out. A [`TrackedIssue`] pairs an issue with
//! the single repository it was fetched under.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label that puts an issue at the top of the export.
pub const BUG_LABEL: &str = "bug";

/// Label that ranks directly after [`BUG_LABEL`].
pub const BREAKING_LABEL: &str = "breaking";

/// Marker appended to text cut short by [`truncate_with_ellipsis`].
pub const ELLIPSIS: &str = "...";

/// Issue state as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issue (never a pull request) fetched from a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub state: IssueState,
    /// Label names in the order the API returned them
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Issue body; absent when the author left it empty
    pub body: Option<String>,
    /// URL of the issue in the web UI
    pub html_url: String,
}

impl Issue {
    /// Case-insensitive check for a label by name.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(name))
    }

    /// Label names joined into a single cell.
    pub fn labels_joined(&self) -> String {
        self.labels.join(", ")
    }

    /// Body cut to `max_chars` characters, empty when there is no body.
    pub fn body_excerpt(&self, max_chars: usize) -> String {
        self.body
            .as_deref()
            .map(|b| truncate_with_ellipsis(b, max_chars))
            .unwrap_or_default()
    }

    pub fn created_at_display(&self) -> String {
        format_timestamp(&self.created_at)
    }

    pub fn updated_at_display(&self) -> String {
        format_timestamp(&self.updated_at)
    }
}

/// An issue tagged with the repository it was fetched under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedIssue {
    pub repository: String,
    #[serde(flatten)]
    pub issue: Issue,
}

impl TrackedIssue {
    pub fn new(repository: impl Into<String>, issue: Issue) -> Self {
        Self {
            repository: repository.into(),
            issue,
        }
    }

    pub fn is_bug(&self) -> bool {
        self.issue.has_label(BUG_LABEL)
    }

    pub fn is_breaking(&self) -> bool {
        self.issue.has_label(BREAKING_LABEL)
    }
}

/// Truncate `text` to `max_chars` characters, appending [`ELLIPSIS`] if anything was cut.
///
/// Counts `char`s rather than bytes so multi-byte text is never split.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_with_labels(labels: &[&str]) -> Issue {
        Issue {
            title: "Crash on start".to_string(),
            state: IssueState::Open,
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
            created_at: "2024-01-14T08:00:00Z".parse().unwrap(),
            updated_at: "2024-01-15T10:30:00Z".parse().unwrap(),
            body: None,
            html_url: "https://github.com/acme/widgets/issues/1".to_string(),
        }
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(150);
        let out = truncate_with_ellipsis(&body, 100);
        assert_eq!(out, format!("{}...", "x".repeat(100)));
    }

    #[test]
    fn test_truncate_short_body_unchanged() {
        let body = "y".repeat(80);
        assert_eq!(truncate_with_ellipsis(&body, 100), body);
    }

    #[test]
    fn test_truncate_exact_length_unchanged() {
        let body = "z".repeat(100);
        assert_eq!(truncate_with_ellipsis(&body, 100), body);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_with_ellipsis("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_has_label_is_case_insensitive() {
        let issue = issue_with_labels(&["Bug", "docs"]);
        assert!(issue.has_label("bug"));
        assert!(issue.has_label("DOCS"));
        assert!(!issue.has_label("breaking"));
    }

    #[test]
    fn test_labels_joined() {
        let issue = issue_with_labels(&["bug", "breaking", "ui"]);
        assert_eq!(issue.labels_joined(), "bug, breaking, ui");
        assert_eq!(issue_with_labels(&[]).labels_joined(), "");
    }

    #[test]
    fn test_body_excerpt_absent_body() {
        let issue = issue_with_labels(&[]);
        assert_eq!(issue.body_excerpt(100), "");
    }

    #[test]
    fn test_timestamp_display() {
        let issue = issue_with_labels(&[]);
        assert_eq!(issue.created_at_display(), "2024-01-14T08:00:00Z");
        assert_eq!(issue.updated_at_display(), "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_tracked_issue_flags() {
        let tracked = TrackedIssue::new("widgets", issue_with_labels(&["BREAKING"]));
        assert!(!tracked.is_bug());
        assert!(tracked.is_breaking());
        assert_eq!(tracked.repository, "widgets");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(IssueState::Open.to_string(), "open");
        assert_eq!(IssueState::Closed.to_string(), "closed");
    }
}
