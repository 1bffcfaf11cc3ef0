//! Command-line interface
//!
//! Parses flags with clap, runs the tracker and renders the result as a
//! table report or JSON.

pub mod commands;
pub mod output;
pub mod types;

pub use types::Cli;

/// Print an error to stderr and exit with status 1.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    eprintln!("{}", format_error(&err, json));
    std::process::exit(1);
}

/// Error text written by [`handle_error`], including the cause chain.
pub fn format_error(err: &anyhow::Error, json: bool) -> String {
    if json {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        serde_json::json!({
            "error": err.to_string(),
            "causes": causes,
        })
        .to_string()
    } else {
        format!("Error: {err:#}")
    }
}
