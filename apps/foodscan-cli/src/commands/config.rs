//! `foodscan config`

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::CliError;

/// Prints the effective configuration as TOML; with `write`, also saves it.
pub fn run(config: &AppConfig, path: Option<PathBuf>, write: bool) -> Result<u8, CliError> {
    print!("{}", config.to_toml()?);

    if write {
        let path = config.save(path)?;
        eprintln!("Configuration written to {}", path.display());
    }

    Ok(0)
}
