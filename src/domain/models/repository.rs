use serde::{Deserialize, Serialize};

/// A repository belonging to the organization being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name, unique within the organization
    pub name: String,
    /// Archived repositories are read-only and excluded from tracking
    pub archived: bool,
}

impl Repository {
    pub fn new(name: impl Into<String>, archived: bool) -> Self {
        Self {
            name: name.into(),
            archived,
        }
    }

    /// Whether the repository should have its issues fetched.
    pub const fn is_active(&self) -> bool {
        !self.archived
    }
}
