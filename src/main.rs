//! org-issues CLI entry point.

use clap::Parser;

use org_issues::cli::{commands, handle_error, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = commands::execute(cli).await {
        handle_error(err, json);
    }
}
