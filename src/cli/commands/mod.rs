//! CLI command implementations

pub mod run;

pub use run::{execute, resolve_settings, run, run_with_client, RepositorySection, RunOutput};
