//! # Scan Orchestration
//!
//! One pass of the application's control flow:
//!
//! ```text
//!   activate ──► wait for ScanResult ──► deactivate ──► lookup(code)
//!                    │        │
//!                    │        └── DeviceFailure ──► ScanReport::DeviceFailure
//!                    └── cancel fires ───────────► ScanReport::Cancelled
//! ```
//!
//! The session is always back in `Idle` before the lookup starts.

use std::future::Future;

use foodscan_capture::{CaptureBackend, CaptureSession, SessionResult, SessionState};
use foodscan_core::{Barcode, DeviceFailureReason, LookupOutcome, ScanResult};
use foodscan_lookup::ProductLookup;
use tracing::info;

/// What one scan pass produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanReport {
    /// A code was scanned and looked up.
    Looked { code: Barcode, outcome: LookupOutcome },
    /// The capture device could not be set up.
    DeviceFailure(DeviceFailureReason),
    /// Cancelled before a code was scanned.
    Cancelled,
}

/// Activates the session, waits for its result or `cancel`, then
/// deactivates.
pub async fn scan_once<B, C>(session: &CaptureSession<B>, cancel: C) -> SessionResult<Option<ScanResult>>
where
    B: CaptureBackend,
    C: Future<Output = ()>,
{
    let receiver = session.activate()?;

    let result = tokio::select! {
        result = receiver.recv() => result,
        _ = cancel => {
            info!("Scan cancelled");
            None
        }
    };

    if session.state() != SessionState::Idle {
        session.deactivate()?;
    }

    Ok(result)
}

/// Scans one code and looks it up.
///
/// `on_scanned` runs between the scan and the lookup.
pub async fn run_scan<B, C, F>(
    session: &CaptureSession<B>,
    lookup: &ProductLookup,
    cancel: C,
    on_scanned: F,
) -> SessionResult<ScanReport>
where
    B: CaptureBackend,
    C: Future<Output = ()>,
    F: FnOnce(&Barcode),
{
    match scan_once(session, cancel).await? {
        Some(ScanResult::Found(code)) => {
            on_scanned(&code);
            let outcome = lookup.lookup(&code).await;
            Ok(ScanReport::Looked { code, outcome })
        }
        Some(ScanResult::DeviceFailure(reason)) => Ok(ScanReport::DeviceFailure(reason)),
        None => Ok(ScanReport::Cancelled),
    }
}
