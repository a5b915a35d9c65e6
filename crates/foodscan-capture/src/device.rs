//! # Device Capabilities
//!
//! The platform-facing seams of a capture session. A session only ever talks
//! to a device through [`CaptureBackend`], and only ever produces a success
//! cue through [`ScanFeedback`]; tests and alternative hardware plug in here.
//!
//! ## Setup Order
//! ```text
//!   default_video_device() ── None ──────────────► NoDevice
//!          │ Some(device)
//!          ▼
//!   open_input(device) ───── Err ────────────────► CannotOpen
//!          │ Ok(input)
//!          ▼
//!   attach_input(input) ──── Err ────────────────► CannotAddInput
//!          │
//!          ▼
//!   attach_metadata_output(symbologies, sink) ─ Err ► CannotAddOutput
//!          │
//!          ▼
//!   start()            (on the device worker thread)
//! ```

use foodscan_core::Symbology;

use crate::error::{BackendError, FeedbackError};
use crate::session::ObservationSink;

// =============================================================================
// Observations
// =============================================================================

/// One recognized object reported by a metadata output.
///
/// `payload` is `None` when the decoder saw a code but could not read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataObservation {
    pub symbology: Symbology,
    pub payload: Option<String>,
}

impl MetadataObservation {
    /// Convenience constructor for a decoded observation.
    pub fn decoded(symbology: Symbology, payload: impl Into<String>) -> Self {
        Self {
            symbology,
            payload: Some(payload.into()),
        }
    }
}

// =============================================================================
// Capture Backend
// =============================================================================

/// Access to a video device and its barcode decoder.
///
/// Setup methods are called on the caller of `activate`, in the order shown
/// in the module docs. `start` and `stop` are called from the session's
/// device worker thread, never concurrently with each other.
///
/// After `attach_metadata_output` succeeds the backend delivers observation
/// batches to the sink from any thread it likes, for as long as it wants;
/// the session discards anything that arrives when it is not scanning.
pub trait CaptureBackend: Send + Sync + 'static {
    /// Handle to a physical device.
    type Device: Send;

    /// An opened input stream for a device.
    type Input: Send;

    /// The default video device, if the machine has one.
    fn default_video_device(&self) -> Option<Self::Device>;

    /// Opens an input stream for the device.
    fn open_input(&self, device: Self::Device) -> Result<Self::Input, BackendError>;

    /// Attaches the input to the capture pipeline.
    fn attach_input(&self, input: Self::Input) -> Result<(), BackendError>;

    /// Attaches a metadata output restricted to `symbologies`.
    fn attach_metadata_output(
        &self,
        symbologies: &[Symbology],
        sink: ObservationSink,
    ) -> Result<(), BackendError>;

    /// Begins streaming frames.
    fn start(&self);

    /// Stops streaming frames.
    fn stop(&self);
}

// =============================================================================
// Scan Feedback
// =============================================================================

/// Produces the success cue after a barcode has been handed off.
///
/// Failures are logged by the session and otherwise ignored.
pub trait ScanFeedback: Send + Sync {
    fn acknowledge(&self) -> Result<(), FeedbackError>;
}

/// Feedback that does nothing.
pub struct NoFeedback;

impl ScanFeedback for NoFeedback {
    fn acknowledge(&self) -> Result<(), FeedbackError> {
        Ok(())
    }
}
