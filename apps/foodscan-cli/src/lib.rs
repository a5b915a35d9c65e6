//! # foodscan-cli: Command-Line Orchestrator
//!
//! Scans a food barcode (or takes one on the command line), looks it up in
//! the nutrition database and prints the per-100g nutrient table.
//!
//! ## Module Organization
//! ```text
//! foodscan-cli/src/
//! ├── main.rs           ◄─── argument parsing, exit status
//! ├── lib.rs            ◄─── YOU ARE HERE (logging setup)
//! ├── config.rs         ◄─── foodscan.toml + FOODSCAN_* overrides
//! ├── error.rs          ◄─── ConfigError, CliError
//! ├── orchestrator.rs   ◄─── activate → result → deactivate → lookup
//! ├── render.rs         ◄─── text / JSON output, exit codes
//! ├── feedback.rs       ◄─── terminal bell
//! └── commands/
//!     ├── lookup.rs
//!     ├── scan.rs
//!     └── config.rs
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod feedback;
pub mod orchestrator;
pub mod render;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries only rendered results.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=foodscan_capture=trace` - Every observation batch
/// - Default: INFO, DEBUG for foodscan crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,foodscan=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
