//! # Capture Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Capture Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Backend      │  │    Feedback     │  │       Session           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  PermissionDen. │  │  Unavailable    │  │  NotIdle                │ │
//! │  │  Busy           │  │  Io             │  │  AlreadyIdle            │ │
//! │  │  Unsupported    │  │                 │  │  Worker                 │ │
//! │  │  Io             │  │                 │  │                         │ │
//! │  └────────┬────────┘  └────────┬────────┘  └─────────────────────────┘ │
//! │           │                    │                                        │
//! │           ▼                    ▼                                        │
//! │  DeviceFailureReason     logged, ignored                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::session::SessionState;

/// Result type alias for session API calls.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// Backend Error
// =============================================================================

/// A capture capability step failed.
///
/// The session never returns this to callers: the text ends up as the detail
/// of a [`foodscan_core::DeviceFailureReason`].
#[derive(Debug, Error)]
pub enum BackendError {
    /// The OS refused access to the device.
    #[error("permission denied")]
    PermissionDenied,

    /// Another process holds the device.
    #[error("device is busy")]
    Busy,

    /// The backend cannot do what was asked (e.g. a symbology it cannot decode).
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Feedback Error
// =============================================================================

/// The success cue (vibration, beep) could not be produced.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// No feedback hardware on this machine.
    #[error("feedback unavailable: {0}")]
    Unavailable(String),

    /// Writing the cue failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Session Error
// =============================================================================

/// Misuse of the session API.
///
/// Device problems are *not* reported here; they are a
/// [`foodscan_core::ScanResult::DeviceFailure`] delivered through the
/// receiver.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `activate` is only valid from `Idle`.
    #[error("Session is {state}, deactivate it before activating again")]
    NotIdle { state: SessionState },

    /// `deactivate` on a session that is not active.
    #[error("Session is already idle")]
    AlreadyIdle,

    /// The device worker thread could not be spawned.
    #[error("Failed to start device worker: {0}")]
    Worker(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_messages() {
        let err = SessionError::NotIdle {
            state: SessionState::Scanning,
        };
        assert_eq!(
            err.to_string(),
            "Session is scanning, deactivate it before activating again"
        );
        assert_eq!(SessionError::AlreadyIdle.to_string(), "Session is already idle");
    }

    #[test]
    fn test_backend_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such device");
        let err: BackendError = io.into();
        assert_eq!(err.to_string(), "I/O error: no such device");
    }
}
