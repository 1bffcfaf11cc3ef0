//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - GitHub REST client with pagination and rate-limit backoff
//! - CSV export
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod export;
pub mod github;
pub mod logging;
