//! # foodscan
//!
//! ```text
//! foodscan lookup 5941132022421          # one code, text output
//! foodscan lookup 5941132022421 --json   # one code, JSON output
//! foodscan scan --timeout-secs 30        # read a code from the scanner
//! foodscan config --write                # save the effective configuration
//! ```
//!
//! Exit status: 0 product found, 1 not found, 2 anything else.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foodscan_cli::commands::{self, scan::ScanArgs};
use foodscan_cli::config::AppConfig;
use foodscan_cli::init_tracing;

/// Exit status when a command cannot produce an outcome.
const EXIT_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "foodscan", version, about = "Scan a food barcode and show its nutrition facts")]
struct Cli {
    /// Config file (default: platform config dir/foodscan.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Endpoint template with a `{code}` placeholder.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a barcode.
    Lookup {
        code: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Scan a barcode with a keyboard-wedge scanner on stdin, then look it up.
    Scan {
        /// Give up after this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
        /// Do not ring the terminal bell.
        #[arg(long)]
        no_bell: bool,
    },
    /// Print the effective configuration.
    Config {
        /// Also save it to the config file.
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let mut config = AppConfig::load(cli.config.clone()).context("loading configuration")?;

    if let Some(endpoint) = cli.endpoint {
        config.api.endpoint = endpoint;
        config.validate().context("--endpoint")?;
    }

    let status = match cli.command {
        Command::Lookup { code, json } => commands::lookup::run(&config, &code, json).await?,
        Command::Scan {
            timeout_secs,
            json,
            no_bell,
        } => {
            let args = ScanArgs {
                timeout: timeout_secs.map(Duration::from_secs),
                json,
                bell: config.scanner.bell && !no_bell,
            };
            commands::scan::run(&config, args).await?
        }
        Command::Config { write } => commands::config::run(&config, cli.config, write)?,
    };

    Ok(status)
}
