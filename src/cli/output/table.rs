//! Table output for the per-repository console report
//!
//! Renders each repository's issues with comfy-table. Colors are dropped
//! when `NO_COLOR` is set or the terminal is dumb.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use std::env;

use crate::domain::models::{IssueState, TrackedIssue};

/// Columns of the per-repository table
pub const REPORT_COLUMNS: [&str; 7] = [
    "Title",
    "State",
    "Labels",
    "Created At",
    "Updated At",
    "Body",
    "URL",
];

/// Width of the rule printed under each repository header
const RULE_WIDTH: usize = 50;

/// Table formatter for the console report
pub struct ReportFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Characters of body shown per issue
    max_body_length: usize,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl ReportFormatter {
    pub fn new(max_body_length: usize) -> Self {
        Self {
            use_colors: supports_color(),
            max_body_length,
            max_width: None,
        }
    }

    /// Create a formatter with explicit color and width settings
    pub const fn with_config(use_colors: bool, max_body_length: usize, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_body_length,
            max_width,
        }
    }

    /// Header line, rule and issue table for one repository.
    pub fn format_section(&self, repository: &str, issues: &[&TrackedIssue]) -> String {
        let header = format!("Repository: {repository} - Issues:");
        let header = if self.use_colors {
            style(header).bold().to_string()
        } else {
            header
        };

        let body = if issues.is_empty() {
            "No issues found.".to_string()
        } else {
            self.format_issues(issues)
        };

        format!("\n{header}\n{}\n{body}", "=".repeat(RULE_WIDTH))
    }

    /// Format issues as a table, in the order given
    pub fn format_issues(&self, issues: &[&TrackedIssue]) -> String {
        let mut table = self.create_base_table();

        table.set_header(
            REPORT_COLUMNS
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

        for tracked in issues {
            let issue = &tracked.issue;

            let state_cell = if self.use_colors {
                Cell::new(issue.state).fg(state_color(issue.state))
            } else {
                Cell::new(issue.state)
            };

            let labels_cell = if self.use_colors && tracked.is_bug() {
                Cell::new(issue.labels_joined()).fg(Color::Red)
            } else if self.use_colors && tracked.is_breaking() {
                Cell::new(issue.labels_joined()).fg(Color::Yellow)
            } else {
                Cell::new(issue.labels_joined())
            };

            table.add_row(vec![
                Cell::new(&issue.title),
                state_cell,
                labels_cell,
                Cell::new(issue.created_at_display()),
                Cell::new(issue.updated_at_display()),
                Cell::new(issue.body_excerpt(self.max_body_length)),
                Cell::new(&issue.html_url),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        if !self.use_colors {
            table.force_no_tty();
        }

        table
    }
}

const fn state_color(state: IssueState) -> Color {
    match state {
        IssueState::Open => Color::Green,
        IssueState::Closed => Color::DarkGrey,
    }
}

fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check for dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Issue;

    fn tracked(title: &str, labels: &[&str], body: Option<&str>) -> TrackedIssue {
        TrackedIssue::new(
            "widgets",
            Issue {
                title: title.to_string(),
                state: IssueState::Open,
                labels: labels.iter().map(|l| (*l).to_string()).collect(),
                created_at: "2024-05-01T09:00:00Z".parse().unwrap(),
                updated_at: "2024-05-02T10:00:00Z".parse().unwrap(),
                body: body.map(str::to_string),
                html_url: "https://github.com/acme/widgets/issues/3".to_string(),
            },
        )
    }

    fn plain_formatter(max_body_length: usize) -> ReportFormatter {
        ReportFormatter::with_config(false, max_body_length, Some(400))
    }

    #[test]
    fn test_table_has_report_columns() {
        let issue = tracked("Crash on save", &["bug"], None);
        let output = plain_formatter(100).format_issues(&[&issue]);

        for column in REPORT_COLUMNS {
            assert!(output.contains(column), "missing column {column}");
        }
        assert!(!output.contains("Repository"));
        assert!(output.contains("Crash on save"));
        assert!(output.contains("2024-05-01T09:00:00Z"));
        assert!(output.contains("https://github.com/acme/widgets/issues/3"));
    }

    #[test]
    fn test_body_is_truncated_in_table() {
        let body = "b".repeat(30);
        let issue = tracked("Long body", &[], Some(&body));
        let output = plain_formatter(10).format_issues(&[&issue]);

        assert!(output.contains(&format!("{}...", "b".repeat(10))));
        assert!(!output.contains(&"b".repeat(11)));
    }

    #[test]
    fn test_section_header_and_rule() {
        let issue = tracked("Crash", &[], None);
        let output = plain_formatter(100).format_section("widgets", &[&issue]);

        assert!(output.contains("Repository: widgets - Issues:"));
        assert!(output.contains(&"=".repeat(50)));
        assert!(output.contains("Crash"));
    }

    #[test]
    fn test_empty_section() {
        let output = plain_formatter(100).format_section("quiet", &[]);
        assert!(output.contains("Repository: quiet - Issues:"));
        assert!(output.contains("No issues found."));
    }

    #[test]
    fn test_rows_follow_given_order() {
        let first = tracked("first-issue", &["bug"], None);
        let second = tracked("second-issue", &[], None);
        let output = plain_formatter(100).format_issues(&[&first, &second]);

        let first_pos = output.find("first-issue").unwrap();
        let second_pos = output.find("second-issue").unwrap();
        assert!(first_pos < second_pos);
    }
}
