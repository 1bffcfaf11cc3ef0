pub mod aggregator;
pub mod filters;
pub mod tracker;

pub use aggregator::{group_by_repository, sort_by_priority, tag_issues, PriorityKey, RepositoryGroup};
pub use filters::{active_repositories, issues_only};
pub use tracker::{IssueReport, IssueTracker};
