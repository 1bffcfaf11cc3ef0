//! Domain layer for the issue tracker
//!
//! This module contains the core models, error types and the ports that
//! infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{TrackerError, TrackerResult};
