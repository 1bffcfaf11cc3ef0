//! CLI output formatting module
//!
//! Human output is a per-repository table report; `--json` switches every
//! command result to a pretty-printed JSON document.

pub mod progress;
pub mod table;

use serde::Serialize;

pub use progress::{create_spinner, create_spinner_with_message, hidden_spinner, ProgressBarExt};
pub use table::{ReportFormatter, REPORT_COLUMNS};

/// Trait for types that can be rendered as human-readable or JSON output.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

/// Dispatch output based on JSON mode flag.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    println!("{}", render(result, json_mode));
}

/// The text [`output`] prints.
pub fn render<T: CommandOutput>(result: &T, json_mode: bool) -> String {
    if json_mode {
        serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
    } else {
        result.to_human()
    }
}
