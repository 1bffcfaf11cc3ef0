//! Port trait definitions (Hexagonal Architecture)
//!
//! - Sleeper: suspends the run while a rate limit is in effect

pub mod sleeper;

pub use sleeper::{Sleeper, TokioSleeper};
