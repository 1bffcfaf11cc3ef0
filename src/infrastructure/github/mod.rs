//! GitHub REST adapter.
//!
//! Lists an organization's repositories and each repository's issues,
//! walking `Link` pagination and backing off while rate limited.

pub mod client;
pub mod link;
pub mod models;

pub use client::{GitHubClient, RateLimitPolicy};
pub use models::{GitHubIssue, GitHubLabel, GitHubRepository};
