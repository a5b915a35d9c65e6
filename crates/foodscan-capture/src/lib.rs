//! # foodscan-capture: Barcode Capture Session
//!
//! Drives a scanning device through one activation and emits the first
//! recognized retail barcode, or the reason the device could not be set up.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        foodscan-capture                                 │
//! │                                                                         │
//! │  ┌──────────────────┐     ┌──────────────────┐     ┌─────────────────┐ │
//! │  │  CaptureSession  │────►│  CaptureBackend  │────►│  LineScanner    │ │
//! │  │  (session.rs)    │     │  (device.rs)     │     │  (wedge.rs)     │ │
//! │  │                  │     │                  │     │  or a camera    │ │
//! │  │  state machine   │     │  setup / start / │     │  binding        │ │
//! │  │  device worker   │     │  stop            │     │                 │ │
//! │  └────────┬─────────┘     └──────────────────┘     └─────────────────┘ │
//! │           │ ScanReceiver                                                │
//! │           ▼                                                             │
//! │  ScanResult::Found(code) | ScanResult::DeviceFailure(reason)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use foodscan_capture::{CaptureSession, LineScanner, NoFeedback};
//!
//! # async fn run() -> Result<(), foodscan_capture::SessionError> {
//! let session = CaptureSession::new(Arc::new(LineScanner::stdin()), Arc::new(NoFeedback))?;
//! let receiver = session.activate()?;
//! let result = receiver.recv().await;
//! session.deactivate()?;
//! # let _ = result;
//! # Ok(())
//! # }
//! ```

pub mod device;
pub mod error;
pub mod session;
pub mod wedge;

pub use device::{CaptureBackend, MetadataObservation, NoFeedback, ScanFeedback};
pub use error::{BackendError, FeedbackError, SessionError, SessionResult};
pub use session::{CaptureSession, ObservationSink, ScanReceiver, SessionState};
pub use wedge::LineScanner;
