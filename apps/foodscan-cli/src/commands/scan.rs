//! `foodscan scan`
//!
//! Reads one code from a keyboard-wedge scanner on stdin, then looks it up.

use std::sync::Arc;
use std::time::Duration;

use foodscan_capture::{CaptureSession, LineScanner, NoFeedback, ScanFeedback};
use tracing::warn;

use crate::commands::{build_lookup, print_json};
use crate::config::AppConfig;
use crate::error::CliError;
use crate::feedback::TerminalBell;
use crate::orchestrator::{self, ScanReport};
use crate::render;

/// Options for one scan.
#[derive(Debug, Clone)]
pub struct ScanArgs {
    /// Give up after this long without a code.
    pub timeout: Option<Duration>,
    pub json: bool,
    /// Ring the terminal bell on a successful scan.
    pub bell: bool,
}

/// Scans one code and prints the lookup result.
pub async fn run(config: &AppConfig, args: ScanArgs) -> Result<u8, CliError> {
    let lookup = build_lookup(config)?;

    let feedback: Arc<dyn ScanFeedback> = if args.bell {
        Arc::new(TerminalBell)
    } else {
        Arc::new(NoFeedback)
    };
    let session = CaptureSession::new(Arc::new(LineScanner::stdin()), feedback)?;

    eprintln!("Scan a barcode, or type it and press Enter. Ctrl-C cancels.");

    let json = args.json;
    let report = orchestrator::run_scan(&session, &lookup, cancelled(args.timeout), |code| {
        if !json {
            println!("{}", render::scanned_text(code));
        }
    })
    .await?;

    if json {
        print_json(&render::report_json(&report))?;
    } else {
        match &report {
            ScanReport::Looked { outcome, .. } => print!("{}", render::outcome_text(outcome)),
            ScanReport::DeviceFailure(reason) => eprint!("{}", render::device_failure_text(reason)),
            ScanReport::Cancelled => eprintln!("Scan cancelled."),
        }
    }

    Ok(render::report_exit_status(&report))
}

/// Resolves on Ctrl-C or when `timeout` elapses.
async fn cancelled(timeout: Option<Duration>) {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    match timeout {
        Some(timeout) => {
            tokio::select! {
                _ = interrupt => {}
                _ = tokio::time::sleep(timeout) => {}
            }
        }
        None => interrupt.await,
    }
}
