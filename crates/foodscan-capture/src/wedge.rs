//! # Keyboard-Wedge Backend
//!
//! A [`CaptureBackend`] for handheld scanners that "type" each code followed
//! by Enter. Every non-blank line of the source is one observation; the
//! symbology is inferred from the payload's shape.
//!
//! ```text
//!   source (stdin, serial tty, test cursor)
//!        │ one line per scan
//!        ▼
//!   "wedge-reader" thread ── running? ── no ──► discarded
//!        │ yes
//!        ▼
//!   sink.deliver([ MetadataObservation { infer_linear(line), line } ])
//! ```
//!
//! The source is read by a single thread started on the first `start`.
//! When the source ends the scanner reports no device on the next
//! activation.

use std::io::{BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use foodscan_core::Symbology;
use tracing::{debug, info, warn};

use crate::device::{CaptureBackend, MetadataObservation};
use crate::error::BackendError;
use crate::session::ObservationSink;

/// Name of the thread that reads the source.
pub const READER_THREAD_NAME: &str = "wedge-reader";

type Source = Box<dyn BufRead + Send>;

/// A scanner reached through a line-oriented source.
#[derive(Debug)]
pub struct WedgeDevice {
    name: String,
}

impl WedgeDevice {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The opened wedge input.
#[derive(Debug)]
pub struct WedgeInput;

struct WedgeState {
    running: AtomicBool,
    exhausted: AtomicBool,
    sink: Mutex<Option<ObservationSink>>,
    symbologies: Mutex<Vec<Symbology>>,
}

impl WedgeState {
    fn sink(&self) -> MutexGuard<'_, Option<ObservationSink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn symbologies(&self) -> MutexGuard<'_, Vec<Symbology>> {
        self.symbologies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Line-oriented barcode scanner.
pub struct LineScanner {
    name: String,
    source: Mutex<Option<Source>>,
    state: Arc<WedgeState>,
}

impl LineScanner {
    /// Creates a scanner that reads codes from `source`.
    pub fn new(name: impl Into<String>, source: impl BufRead + Send + 'static) -> Self {
        Self {
            name: name.into(),
            source: Mutex::new(Some(Box::new(source))),
            state: Arc::new(WedgeState {
                running: AtomicBool::new(false),
                exhausted: AtomicBool::new(false),
                sink: Mutex::new(None),
                symbologies: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Scanner reading standard input.
    pub fn stdin() -> Self {
        Self::new("keyboard wedge (stdin)", BufReader::new(std::io::stdin()))
    }

    /// Whether the source has ended.
    pub fn is_exhausted(&self) -> bool {
        self.state.exhausted.load(Ordering::SeqCst)
    }

    fn spawn_reader(&self, source: Source) {
        let state = Arc::clone(&self.state);
        let name = self.name.clone();

        let spawned = thread::Builder::new()
            .name(READER_THREAD_NAME.to_string())
            .spawn(move || read_lines(source, &state, &name));

        if let Err(e) = spawned {
            warn!(error = %e, scanner = %self.name, "Failed to start scanner reader");
            self.state.exhausted.store(true, Ordering::SeqCst);
        }
    }
}

fn read_lines(source: Source, state: &WedgeState, name: &str) {
    for line in source.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, scanner = %name, "Scanner read failed");
                break;
            }
        };

        // Surrounding whitespace is line framing (CR, indentation), not payload.
        let payload = line.trim();
        if payload.is_empty() {
            continue;
        }

        if !state.running.load(Ordering::SeqCst) {
            debug!(scanner = %name, "Scanner not running, input discarded");
            continue;
        }

        let symbology = Symbology::infer_linear(payload);
        if !state.symbologies().contains(&symbology) {
            debug!(%symbology, "Symbology not requested, input discarded");
            continue;
        }

        let sink = state.sink().clone();
        if let Some(sink) = sink {
            sink.deliver(&[MetadataObservation::decoded(symbology, payload)]);
        }
    }

    state.exhausted.store(true, Ordering::SeqCst);
    state.running.store(false, Ordering::SeqCst);
    info!(scanner = %name, "Scanner input closed");
}

impl CaptureBackend for LineScanner {
    type Device = WedgeDevice;
    type Input = WedgeInput;

    fn default_video_device(&self) -> Option<WedgeDevice> {
        if self.is_exhausted() {
            return None;
        }
        Some(WedgeDevice {
            name: self.name.clone(),
        })
    }

    fn open_input(&self, device: WedgeDevice) -> Result<WedgeInput, BackendError> {
        debug!(device = %device.name(), "Opening scanner");
        Ok(WedgeInput)
    }

    fn attach_input(&self, _input: WedgeInput) -> Result<(), BackendError> {
        Ok(())
    }

    fn attach_metadata_output(
        &self,
        symbologies: &[Symbology],
        sink: ObservationSink,
    ) -> Result<(), BackendError> {
        if !symbologies.iter().any(Symbology::is_retail_linear) {
            return Err(BackendError::Unsupported(
                "a line scanner only reads EAN-8, EAN-13 and Code 128".to_string(),
            ));
        }

        *self.state.symbologies() = symbologies.to_vec();
        *self.state.sink() = Some(sink);
        Ok(())
    }

    fn start(&self) {
        self.state.running.store(true, Ordering::SeqCst);

        let source = self
            .source
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(source) = source {
            self.spawn_reader(source);
        }
    }

    fn stop(&self) {
        self.state.running.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::NoFeedback;
    use crate::session::{CaptureSession, SessionState};
    use foodscan_core::{Barcode, DeviceFailureReason, ScanResult};
    use std::io::Cursor;
    use std::time::Duration;

    fn session(scanner: &Arc<LineScanner>) -> CaptureSession<LineScanner> {
        CaptureSession::new(Arc::clone(scanner), Arc::new(NoFeedback)).unwrap()
    }

    async fn wait_exhausted(scanner: &LineScanner) {
        for _ in 0..200 {
            if scanner.is_exhausted() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("scanner source never closed");
    }

    #[tokio::test]
    async fn test_line_is_scanned() {
        let scanner = Arc::new(LineScanner::new("test", Cursor::new("\n  96385074\r\n")));
        let session = session(&scanner);

        let rx = session.activate().unwrap();
        assert_eq!(
            rx.recv().await,
            Some(ScanResult::Found(Barcode::new("96385074").unwrap()))
        );
        assert_eq!(session.state(), SessionState::Found);
    }

    #[tokio::test]
    async fn test_only_first_line_is_emitted() {
        let scanner = Arc::new(LineScanner::new(
            "test",
            Cursor::new("5941132022421\n96385074\n"),
        ));
        let session = session(&scanner);

        let rx = session.activate().unwrap();
        assert_eq!(
            rx.recv().await,
            Some(ScanResult::Found(Barcode::new("5941132022421").unwrap()))
        );
    }

    #[tokio::test]
    async fn test_closed_source_reports_no_device() {
        let scanner = Arc::new(LineScanner::new("test", Cursor::new("")));
        let session = session(&scanner);

        let _rx = session.activate().unwrap();
        wait_exhausted(&scanner).await;
        session.deactivate().unwrap();

        let rx = session.activate().unwrap();
        assert_eq!(
            rx.recv().await,
            Some(ScanResult::DeviceFailure(DeviceFailureReason::NoDevice))
        );
    }

    #[test]
    fn test_rejects_non_linear_output() {
        let scanner = LineScanner::new("test", Cursor::new(""));
        let backend = Arc::new(LineScanner::new("other", Cursor::new("")));
        let session = session(&backend);
        // Any sink will do: the scanner refuses before storing it.
        let _rx = session.activate().unwrap();
        let sink = backend.state.sink().clone().unwrap();

        let err = scanner
            .attach_metadata_output(&[Symbology::Qr], sink)
            .unwrap_err();
        assert!(matches!(err, BackendError::Unsupported(_)));
    }
}
