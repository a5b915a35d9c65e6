//! # Capture Session
//!
//! Owns a capture device for one activation and hands off at most one
//! decoded barcode.
//!
//! ## State Machine
//! ```text
//!                 activate()
//!   ┌────────┐ ───────────────► ┌──────────┐  setup step fails  ┌──────────┐
//!   │  Idle  │                  │ Starting │ ─────────────────► │  Failed  │
//!   └────────┘ ◄─┐              └────┬─────┘  DeviceFailure    └────┬─────┘
//!       ▲        │                   │ start requested              │
//!       │        │                   ▼                              │
//!       │        │              ┌──────────┐  first match      ┌────┴─────┐
//!       │        │              │ Scanning │ ────────────────► │  Found   │
//!       │        │              └────┬─────┘  Found(code)      └────┬─────┘
//!       │        │ deactivate()      │                              │
//!       │        └───────────────────┴──────────────────────────────┘
//! ```
//!
//! ## Threads
//! ```text
//!  caller thread            backend thread(s)           device worker
//!  ─────────────            ─────────────────           ─────────────
//!  activate()  ── setup ─►                              "capture-device"
//!      │       ── Start ────────────────────────────►  backend.start()
//!      │                    sink.deliver(batch)
//!      │                       │ lock core
//!      │                       │ Scanning? match? ─►   Stop queued
//!      │                       │ unlock
//!      │  ◄── Found(code) ─────┘ then feedback
//!  deactivate() ── Stop ────────────────────────────►  backend.stop()
//! ```
//!
//! Start and stop go through one serial queue so they never run on the
//! caller's thread and never overlap. The core state sits behind a single
//! lock: concurrent deliveries race for it and only the first match while
//! `Scanning` wins. Each activation gets a generation number and its sink
//! carries it, so late batches from an earlier activation are dropped.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;

use foodscan_core::{Barcode, DeviceFailureReason, ScanResult, RETAIL_SYMBOLOGIES};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::device::{CaptureBackend, MetadataObservation, ScanFeedback};
use crate::error::{SessionError, SessionResult};

/// Name of the thread that runs device start/stop.
pub const DEVICE_THREAD_NAME: &str = "capture-device";

// =============================================================================
// Session State
// =============================================================================

/// Lifecycle state of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not active, device released.
    Idle,
    /// Setting up the device.
    Starting,
    /// Device running, waiting for a code.
    Scanning,
    /// A code was handed off. Device stopped.
    Found,
    /// Setup failed. The failure was handed off.
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Starting => write!(f, "starting"),
            SessionState::Scanning => write!(f, "scanning"),
            SessionState::Found => write!(f, "found"),
            SessionState::Failed => write!(f, "failed"),
        }
    }
}

// =============================================================================
// Shared Core
// =============================================================================

/// Commands for the device worker.
#[derive(Debug)]
enum DeviceCommand {
    Start,
    Stop,
    /// Replies once every earlier command has run.
    Barrier(oneshot::Sender<()>),
    Shutdown,
}

struct SessionCore {
    state: SessionState,
    /// Incremented on every activation.
    generation: u64,
    /// Whether a Start is queued or running without a matching Stop.
    running: bool,
    /// Pending result channel; taken on first emission.
    emitter: Option<oneshot::Sender<ScanResult>>,
}

struct SessionShared {
    core: Mutex<SessionCore>,
    device_tx: mpsc::UnboundedSender<DeviceCommand>,
    feedback: Arc<dyn ScanFeedback>,
}

impl SessionShared {
    fn lock(&self) -> MutexGuard<'_, SessionCore> {
        // Every mutation is a plain field store; a poisoned core is still whole.
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, command: DeviceCommand) {
        if self.device_tx.send(command).is_err() {
            warn!("Capture device worker has exited, command dropped");
        }
    }

    /// Queues a Stop if the device was started. Call with the core locked.
    fn request_stop(&self, core: &mut SessionCore) {
        if core.running {
            core.running = false;
            self.send(DeviceCommand::Stop);
        }
    }

    fn fail(&self, generation: u64, reason: DeviceFailureReason) {
        let emitter = {
            let mut core = self.lock();
            if core.generation != generation || core.state != SessionState::Starting {
                debug!(%reason, "Setup failed after the session moved on, ignoring");
                return;
            }
            core.state = SessionState::Failed;
            core.emitter.take()
        };

        warn!(%reason, "Capture setup failed");
        if let Some(tx) = emitter {
            let _ = tx.send(ScanResult::DeviceFailure(reason));
        }
    }

    fn observe(&self, generation: u64, observations: &[MetadataObservation]) {
        let (emitter, code) = {
            let mut core = self.lock();
            if core.generation != generation || core.state != SessionState::Scanning {
                trace!(
                    generation,
                    current = core.generation,
                    state = %core.state,
                    "Observation batch outside scanning, dropped"
                );
                return;
            }

            let Some(code) = first_match(observations) else {
                trace!(count = observations.len(), "No usable code in batch");
                return;
            };

            core.state = SessionState::Found;
            self.request_stop(&mut core);
            (core.emitter.take(), code)
        };

        info!(code = %code, "Barcode found");
        if let Some(tx) = emitter {
            let _ = tx.send(ScanResult::Found(code));
        }

        if let Err(e) = self.feedback.acknowledge() {
            debug!(error = %e, "Scan feedback failed");
        }
    }
}

/// First observation with a retail symbology and a readable payload.
fn first_match(observations: &[MetadataObservation]) -> Option<Barcode> {
    observations
        .iter()
        .filter(|o| o.symbology.is_retail_linear())
        .filter_map(|o| o.payload.as_deref())
        .find_map(|payload| Barcode::new(payload).ok())
}

// =============================================================================
// Observation Sink
// =============================================================================

/// Where a backend delivers observation batches.
///
/// Cheap to clone and safe to call from any thread. A sink is bound to the
/// activation it was created for; batches delivered through it after that
/// activation ends are ignored.
#[derive(Clone)]
pub struct ObservationSink {
    shared: Weak<SessionShared>,
    generation: u64,
}

impl ObservationSink {
    /// Hands a batch of observations to the session.
    pub fn deliver(&self, observations: &[MetadataObservation]) {
        if let Some(shared) = self.shared.upgrade() {
            shared.observe(self.generation, observations);
        }
    }

    /// Activation this sink belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for ObservationSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationSink")
            .field("generation", &self.generation)
            .finish()
    }
}

// =============================================================================
// Scan Receiver
// =============================================================================

/// Receiving end of one activation.
///
/// Resolves to `Some` at most once. Resolves to `None` when the session is
/// deactivated (or dropped) before anything was emitted.
#[derive(Debug)]
pub struct ScanReceiver {
    rx: oneshot::Receiver<ScanResult>,
}

impl ScanReceiver {
    /// Waits for the result of the activation.
    pub async fn recv(self) -> Option<ScanResult> {
        self.rx.await.ok()
    }

    /// Returns the result if it has already been emitted.
    pub fn try_recv(&mut self) -> Option<ScanResult> {
        self.rx.try_recv().ok()
    }
}

// =============================================================================
// Capture Session
// =============================================================================

/// A barcode capture session over a [`CaptureBackend`].
///
/// All methods take `&self`, so a session can be shared behind an `Arc` and
/// deactivated from a different thread than the one that activated it.
pub struct CaptureSession<B: CaptureBackend> {
    backend: Arc<B>,
    shared: Arc<SessionShared>,
}

impl<B: CaptureBackend> CaptureSession<B> {
    /// Creates an idle session and spawns its device worker.
    pub fn new(backend: Arc<B>, feedback: Arc<dyn ScanFeedback>) -> SessionResult<Self> {
        let (device_tx, device_rx) = mpsc::unbounded_channel();
        spawn_device_worker(Arc::clone(&backend), device_rx).map_err(SessionError::Worker)?;

        Ok(Self {
            backend,
            shared: Arc::new(SessionShared {
                core: Mutex::new(SessionCore {
                    state: SessionState::Idle,
                    generation: 0,
                    running: false,
                    emitter: None,
                }),
                device_tx,
                feedback,
            }),
        })
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    /// Sets up the device and starts scanning.
    ///
    /// Device problems do not fail this call: they arrive through the
    /// returned receiver as [`ScanResult::DeviceFailure`] and leave the
    /// session `Failed`.
    ///
    /// ## Errors
    /// [`SessionError::NotIdle`] unless the session is `Idle`.
    pub fn activate(&self) -> SessionResult<ScanReceiver> {
        let (tx, rx) = oneshot::channel();

        let generation = {
            let mut core = self.shared.lock();
            if core.state != SessionState::Idle {
                return Err(SessionError::NotIdle { state: core.state });
            }
            core.generation += 1;
            core.state = SessionState::Starting;
            core.emitter = Some(tx);
            core.generation
        };

        info!(generation, "Activating capture session");

        if let Err(reason) = self.configure(generation) {
            self.shared.fail(generation, reason);
            return Ok(ScanReceiver { rx });
        }

        let mut core = self.shared.lock();
        if core.generation == generation && core.state == SessionState::Starting {
            core.running = true;
            self.shared.send(DeviceCommand::Start);
            core.state = SessionState::Scanning;
            debug!(generation, "Capture device start requested");
        } else {
            debug!(generation, "Session deactivated during setup, not starting");
        }

        Ok(ScanReceiver { rx })
    }

    /// Stops the device and returns to `Idle`.
    ///
    /// A pending receiver resolves to `None`. Nothing is emitted after this
    /// returns.
    ///
    /// ## Errors
    /// [`SessionError::AlreadyIdle`] if there is nothing to deactivate.
    pub fn deactivate(&self) -> SessionResult<()> {
        let mut core = self.shared.lock();
        if core.state == SessionState::Idle {
            return Err(SessionError::AlreadyIdle);
        }

        let previous = core.state;
        core.state = SessionState::Idle;
        core.emitter = None;
        self.shared.request_stop(&mut core);

        info!(from = %previous, "Capture session deactivated");
        Ok(())
    }

    /// Resolves once every start/stop queued so far has run on the device.
    pub async fn drained(&self) {
        let (tx, rx) = oneshot::channel();
        self.shared.send(DeviceCommand::Barrier(tx));
        let _ = rx.await;
    }

    /// Runs the setup steps in order.
    fn configure(&self, generation: u64) -> Result<(), DeviceFailureReason> {
        let device = self
            .backend
            .default_video_device()
            .ok_or(DeviceFailureReason::NoDevice)?;

        let input = self
            .backend
            .open_input(device)
            .map_err(|e| DeviceFailureReason::CannotOpen(e.to_string()))?;

        self.backend
            .attach_input(input)
            .map_err(|e| DeviceFailureReason::CannotAddInput(e.to_string()))?;

        let sink = ObservationSink {
            shared: Arc::downgrade(&self.shared),
            generation,
        };
        self.backend
            .attach_metadata_output(&RETAIL_SYMBOLOGIES, sink)
            .map_err(|e| DeviceFailureReason::CannotAddOutput(e.to_string()))
    }
}

impl<B: CaptureBackend> Drop for CaptureSession<B> {
    fn drop(&mut self) {
        let mut core = self.shared.lock();
        core.state = SessionState::Idle;
        core.emitter = None;
        self.shared.request_stop(&mut core);
        self.shared.send(DeviceCommand::Shutdown);
    }
}

// =============================================================================
// Device Worker
// =============================================================================

fn spawn_device_worker<B: CaptureBackend>(
    backend: Arc<B>,
    mut commands: mpsc::UnboundedReceiver<DeviceCommand>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name(DEVICE_THREAD_NAME.to_string())
        .spawn(move || {
            while let Some(command) = commands.blocking_recv() {
                match command {
                    DeviceCommand::Start => {
                        debug!("Starting capture device");
                        backend.start();
                    }
                    DeviceCommand::Stop => {
                        debug!("Stopping capture device");
                        backend.stop();
                    }
                    DeviceCommand::Barrier(done) => {
                        let _ = done.send(());
                    }
                    DeviceCommand::Shutdown => break,
                }
            }
            debug!("Capture device worker stopped");
        })
        .map(|_| ())
}

// =============================================================================
// Unit Tests
// =============================================================================
