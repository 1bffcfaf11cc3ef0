pub mod config;
pub mod issue;
pub mod repository;

pub use config::{IssueStateFilter, LoggingConfig, Settings, TrackerConfig};
pub use issue::{truncate_with_ellipsis, Issue, IssueState, TrackedIssue};
pub use repository::Repository;
