//! # Scan Session Controller
//!
//! Owns the camera-device lifecycle and the periodic capture/decode loop.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ScanSession Lifecycle                             │
//! │                                                                         │
//! │   ┌────────┐   start() ok    ┌────────┐    decode / manual / stop()    │
//! │   │  Idle  │ ──────────────► │ Active │ ─────────────────────────────┐ │
//! │   └────────┘                 └────────┘                              │ │
//! │        ▲                          │                                  │ │
//! │        │      start() denied      │ every tick (100 ms):             │ │
//! │        ├──────────────────────────┘   snapshot frame ──► decode      │ │
//! │        │                              (attempts overlap freely)      │ │
//! │        └─────────────────────────────────────────────────────────────┘ │
//! │                                                                         │
//! │  INVARIANTS                                                            │
//! │  ──────────                                                            │
//! │  • stream handle and poll task are held together: both exist iff       │
//! │    the session is active                                               │
//! │  • every exit path (stop, successful decode, failed start) releases    │
//! │    both; repeat stop() never throws or reacquires                      │
//! │  • at most one result is delivered per active session; the device     │
//! │    is released BEFORE the receiver observes the barcode                │
//! │  • late decode completions (after stop or a prior result) are          │
//! │    discarded via a generation check                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::capture::{CaptureBackend, CaptureConstraints, CaptureStream, FrameBuffer};
use crate::decode::{heuristic_detect, Barcode, BarcodeDecoder, DecodeError};
use crate::error::{ScanError, ScanResult};

// =============================================================================
// Configuration
// =============================================================================

/// Tuning for a scan session.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    /// Constraints handed to the capture backend.
    pub constraints: CaptureConstraints,

    /// Interval between capture ticks.
    pub tick_interval: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            constraints: CaptureConstraints::default(),
            tick_interval: Duration::from_millis(100),
        }
    }
}

// =============================================================================
// Session State
// =============================================================================

/// Resources held while scanning. The pair is created and released as a
/// unit, which is what keeps the "both handles or neither" invariant.
struct ActiveScan {
    /// Exclusive ownership of the capture device.
    stream: Box<dyn CaptureStream>,

    /// The repeating capture tick.
    poll_task: JoinHandle<()>,
}

struct SessionState {
    active: Option<ActiveScan>,

    /// Bumped on every acquisition and release. A decode attempt carries
    /// the generation it was dispatched under; a mismatch at completion
    /// time means the session has moved on and the result is dropped.
    generation: u64,
}

/// State shared between the session facade, the poll task, and in-flight
/// decode attempts.
struct SessionShared {
    state: Mutex<SessionState>,
    decoder: Arc<dyn BarcodeDecoder>,
    results: mpsc::UnboundedSender<Barcode>,
}

impl SessionShared {
    /// Releases the device and the poll task. Idempotent; safe when the
    /// session was never started.
    fn release(state: &mut SessionState) {
        if let Some(active) = state.active.take() {
            active.poll_task.abort();
            active.stream.stop();
            state.generation += 1;
            info!("scan session released camera");
        }
    }

    /// Delivers a terminal result.
    ///
    /// When `dispatched_under` is set, delivery only happens if the
    /// session is still in that generation and active; otherwise the
    /// result arrived late and is dropped. Release happens before the
    /// send, so the device is free before any handler runs.
    fn complete(&self, dispatched_under: Option<u64>, barcode: Barcode) {
        {
            let mut state = self.state.lock().expect("Session mutex poisoned");
            if let Some(generation) = dispatched_under {
                if state.generation != generation || state.active.is_none() {
                    debug!(origin = ?barcode.origin, "dropping stale scan result");
                    return;
                }
            }
            Self::release(&mut state);
        }

        info!(origin = ?barcode.origin, "scan session completed");
        // Receiver may be gone if the host dropped the channel; the
        // session has already released everything either way.
        let _ = self.results.send(barcode);
    }
}

// =============================================================================
// Scan Session
// =============================================================================

/// One reusable camera-scanning session.
///
/// Created idle. [`start`] acquires the device and begins polling; a
/// successful decode, [`manual_entry`], or [`stop`] releases everything
/// and returns to idle, after which [`start`] may be called again.
///
/// [`start`]: ScanSession::start
/// [`manual_entry`]: ScanSession::manual_entry
/// [`stop`]: ScanSession::stop
pub struct ScanSession {
    backend: Arc<dyn CaptureBackend>,
    config: ScanConfig,
    shared: Arc<SessionShared>,
}

impl ScanSession {
    /// Creates an idle session and the channel its terminal results arrive
    /// on.
    pub fn new(
        backend: Arc<dyn CaptureBackend>,
        decoder: Arc<dyn BarcodeDecoder>,
        config: ScanConfig,
    ) -> (Self, mpsc::UnboundedReceiver<Barcode>) {
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        let session = ScanSession {
            backend,
            config,
            shared: Arc::new(SessionShared {
                state: Mutex::new(SessionState {
                    active: None,
                    generation: 0,
                }),
                decoder,
                results: results_tx,
            }),
        };

        (session, results_rx)
    }

    /// Acquires the camera and begins the repeating capture tick.
    ///
    /// Fails with [`ScanError::AlreadyActive`] when the session already
    /// owns a device, and with [`ScanError::DeviceUnavailable`] when the
    /// backend denies the request, in which case nothing was acquired and
    /// no polling starts.
    pub async fn start(&self) -> ScanResult<()> {
        {
            let state = self.shared.state.lock().expect("Session mutex poisoned");
            if state.active.is_some() {
                return Err(ScanError::AlreadyActive);
            }
        }

        let stream = self.backend.open(&self.config.constraints).await?;

        let mut state = self.shared.state.lock().expect("Session mutex poisoned");
        if state.active.is_some() {
            // A concurrent start() won the race while we awaited the
            // device; give this one back.
            stream.stop();
            return Err(ScanError::AlreadyActive);
        }

        state.generation += 1;
        let generation = state.generation;
        let poll_task = tokio::spawn(Self::poll_loop(
            self.shared.clone(),
            self.config.tick_interval,
            generation,
        ));
        state.active = Some(ActiveScan { stream, poll_task });

        info!(
            tick_ms = self.config.tick_interval.as_millis() as u64,
            "scan session started"
        );
        Ok(())
    }

    /// Cancels the capture tick and releases the camera.
    ///
    /// Synchronous and idempotent: safe to call repeatedly or on a session
    /// that never started. Cancellation takes effect before the next tick;
    /// an already-dispatched decode attempt is not aborted, but its result
    /// will fail the generation check and be ignored.
    pub fn stop(&self) {
        let mut state = self.shared.state.lock().expect("Session mutex poisoned");
        SessionShared::release(&mut state);
    }

    /// Completes the session with manually entered text, bypassing capture.
    ///
    /// Whitespace-only input is a no-op: no completion, no error, and an
    /// active session stays active.
    pub fn manual_entry(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        // No generation requirement: manual entry also works while idle
        // (the operator may type a barcode without ever starting the
        // camera).
        self.shared.complete(None, Barcode::manual(text));
    }

    /// Whether the session currently owns the camera.
    pub fn is_active(&self) -> bool {
        self.shared
            .state
            .lock()
            .expect("Session mutex poisoned")
            .active
            .is_some()
    }

    /// The repeating capture tick. Runs until the generation it was
    /// spawned under is released.
    async fn poll_loop(shared: Arc<SessionShared>, tick: Duration, generation: u64) {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            // Snapshot under the lock; decode outside it.
            let frame = {
                let state = shared.state.lock().expect("Session mutex poisoned");
                match state.active {
                    Some(ref active) if state.generation == generation => active.stream.frame(),
                    _ => break,
                }
            };

            // Source has not buffered a full frame yet; skip this tick.
            let Some(frame) = frame else { continue };

            // Each attempt is independent and unawaited: a slow decode of
            // frame N never delays the capture of frame N+1. The first
            // successful completion wins via the generation check.
            tokio::spawn(Self::decode_attempt(shared.clone(), frame, generation));
        }

        debug!("scan poll loop exited");
    }

    /// One asynchronous decode attempt against a snapshotted frame.
    async fn decode_attempt(shared: Arc<SessionShared>, frame: FrameBuffer, generation: u64) {
        match shared.decoder.decode(&frame).await {
            Ok(text) if !text.trim().is_empty() => {
                shared.complete(Some(generation), Barcode::decoded(text));
            }
            Ok(_) | Err(DecodeError::Miss) => {
                // Expected common case: nothing in this frame. Not an
                // error; the next tick retries.
                debug!("no barcode in frame");
            }
            Err(DecodeError::Unavailable(reason)) => {
                warn!(%reason, "primary decoder unavailable, using heuristic fallback");
                if let Some(text) = heuristic_detect(&frame) {
                    shared.complete(Some(generation), Barcode::heuristic(text));
                }
            }
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        // Dropping the session must not leave the camera held.
        self.stop();
    }
}
