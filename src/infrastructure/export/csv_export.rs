//! CSV export of tracked issues using the csv crate.

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::errors::{TrackerError, TrackerResult};
use crate::domain::models::TrackedIssue;

/// Header row of the export
pub const CSV_HEADERS: [&str; 8] = [
    "Title",
    "State",
    "Labels",
    "Created At",
    "Updated At",
    "Body",
    "URL",
    "Repository",
];

/// Writes tracked issues as CSV rows, one per issue, in the order given.
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    max_body_length: usize,
}

impl CsvExporter {
    pub const fn new(max_body_length: usize) -> Self {
        Self { max_body_length }
    }

    /// Write the export to `path`.
    ///
    /// Rows are staged in a temporary file next to `path` and moved into
    /// place, so a failed write leaves any previous export untouched.
    pub fn write_path(&self, path: &Path, issues: &[TrackedIssue]) -> TrackerResult<()> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, issues)?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&buffer)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| err.error)?;

        info!(path = %path.display(), rows = issues.len(), "wrote CSV export");
        Ok(())
    }

    /// Write the header and one row per issue to `writer`.
    pub fn write_to<W: Write>(&self, writer: W, issues: &[TrackedIssue]) -> TrackerResult<()> {
        let mut csv = Writer::from_writer(writer);
        csv.write_record(CSV_HEADERS)?;

        for tracked in issues {
            csv.write_record(self.row(tracked))?;
        }

        csv.flush()
            .map_err(|e| TrackerError::Export(format!("CSV flush error: {e}")))?;
        Ok(())
    }

    fn row(&self, tracked: &TrackedIssue) -> [String; 8] {
        let issue = &tracked.issue;
        [
            issue.title.clone(),
            issue.state.to_string(),
            issue.labels_joined(),
            issue.created_at_display(),
            issue.updated_at_display(),
            issue.body_excerpt(self.max_body_length),
            issue.html_url.clone(),
            tracked.repository.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Issue, IssueState};
    use tempfile::tempdir;

    fn tracked(repo: &str, title: &str, labels: &[&str], body: Option<&str>) -> TrackedIssue {
        TrackedIssue::new(
            repo,
            Issue {
                title: title.to_string(),
                state: IssueState::Open,
                labels: labels.iter().map(|l| (*l).to_string()).collect(),
                created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
                updated_at: "2024-03-02T08:15:30Z".parse().unwrap(),
                body: body.map(str::to_string),
                html_url: format!("https://github.com/acme/{repo}/issues/1"),
            },
        )
    }

    fn render(exporter: CsvExporter, issues: &[TrackedIssue]) -> String {
        let mut out = Vec::new();
        exporter.write_to(&mut out, issues).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_row() {
        let csv = render(CsvExporter::new(100), &[]);
        assert_eq!(
            csv,
            "Title,State,Labels,Created At,Updated At,Body,URL,Repository\n"
        );
    }

    #[test]
    fn test_row_contents() {
        let csv = render(
            CsvExporter::new(100),
            &[tracked("widgets", "Crash", &["bug", "ui"], Some("Steps to reproduce"))],
        );
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "Crash,open,\"bug, ui\",2024-03-01T12:00:00Z,2024-03-02T08:15:30Z,Steps to reproduce,https://github.com/acme/widgets/issues/1,widgets"
        );
    }

    #[test]
    fn test_body_is_truncated() {
        let body = "a".repeat(150);
        let csv = render(CsvExporter::new(100), &[tracked("widgets", "Long", &[], Some(&body))]);

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[5], format!("{}...", "a".repeat(100)));
    }

    #[test]
    fn test_missing_body_is_empty_cell() {
        let csv = render(CsvExporter::new(100), &[tracked("widgets", "No body", &[], None)]);

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[5], "");
        assert_eq!(&record[2], "");
    }

    #[test]
    fn test_rows_keep_given_order() {
        let issues = vec![
            tracked("zeta", "first", &["bug"], None),
            tracked("alpha", "second", &[], None),
        ];
        let csv = render(CsvExporter::new(100), &issues);

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let titles: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_write_path_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("acme_issues.csv");

        CsvExporter::new(100)
            .write_path(&path, &[tracked("widgets", "Crash", &[], None)])
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Title,State,Labels"));
        assert!(written.contains("Crash,open"));
    }

    #[test]
    fn test_write_path_replaces_previous_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("acme_issues.csv");
        std::fs::write(&path, "stale contents that are much longer than the new export\n".repeat(50)).unwrap();

        CsvExporter::new(100).write_path(&path, &[]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Title,State,Labels,Created At,Updated At,Body,URL,Repository\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1, "No staging file left behind");
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        // A directory at the target path makes the final move fail
        let path = dir.path().join("acme_issues.csv");
        std::fs::create_dir(&path).unwrap();

        let err = CsvExporter::new(100)
            .write_path(&path, &[tracked("widgets", "Crash", &[], None)])
            .unwrap_err();

        assert!(matches!(err, TrackerError::Export(_)));
        assert!(path.is_dir());
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "Staging file must be cleaned up");
    }
}
