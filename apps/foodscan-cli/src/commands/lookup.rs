//! `foodscan lookup <CODE>`

use tracing::debug;

use crate::commands::{build_lookup, print_json};
use crate::config::AppConfig;
use crate::error::CliError;
use crate::render;

/// Looks up `code` and prints the outcome.
pub async fn run(config: &AppConfig, code: &str, json: bool) -> Result<u8, CliError> {
    let lookup = build_lookup(config)?;
    debug!(endpoint = %lookup.endpoint(), "Looking up code from command line");

    let outcome = lookup.lookup(code).await;

    if json {
        print_json(&render::outcome_json(&outcome))?;
    } else {
        print!("{}", render::outcome_text(&outcome));
    }

    Ok(render::exit_status(&outcome))
}
