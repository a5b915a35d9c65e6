//! # CLI Commands
//!
//! One module per subcommand. Each returns the process exit status.
//!
//! | Command  | Module       | Does                                        |
//! |----------|--------------|---------------------------------------------|
//! | `lookup` | [`lookup`]   | Looks up a code given on the command line   |
//! | `scan`   | [`scan`]     | Scans one code from the wedge scanner       |
//! | `config` | [`config`]   | Prints (and optionally saves) configuration |

pub mod config;
pub mod lookup;
pub mod scan;

use std::sync::Arc;

use foodscan_lookup::{HttpFetcher, ProductLookup};

use crate::config::AppConfig;
use crate::error::CliError;

/// Builds the lookup pipeline from configuration.
pub fn build_lookup(config: &AppConfig) -> Result<ProductLookup, CliError> {
    let fetcher = HttpFetcher::new(&config.fetcher_config())?;
    Ok(ProductLookup::with_endpoint(
        Arc::new(fetcher),
        config.endpoint_template()?,
    ))
}

/// Prints a JSON document on stdout.
pub(crate) fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
