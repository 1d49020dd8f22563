//! # Scanner Presenter
//!
//! Bridges a [`ScanSession`] to a user-facing surface (camera preview
//! region, manual-entry field, start/stop controls, status line) and to a
//! single caller-supplied completion handler.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Presenter Data Flow                               │
//! │                                                                         │
//! │  Host surface ──► ScannerPresenter ──► ScanSession ──► decode loop     │
//! │      ▲                   │                                   │          │
//! │      │                   │     relay task ◄── result channel ┘          │
//! │      │                   ▼                                              │
//! │      └── status/hide ◄── on_result(barcode)  (exactly once)            │
//! │                                                                         │
//! │  Dismissal side channel: closing the surface without a result STILL    │
//! │  stops the session; hiding is not device release.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::decode::Barcode;
use crate::session::ScanSession;

/// The host-implemented scanner surface.
///
/// A browser shell backs this with a modal dialog; tests back it with a
/// recording double. All methods are fire-and-forget UI updates.
pub trait ScannerSurface: Send + Sync {
    /// Reveals the surface.
    fn show(&self);

    /// Hides the surface.
    fn hide(&self);

    /// Updates the status line.
    fn set_status(&self, message: &str);

    /// Toggles the start/stop controls between idle and scanning.
    fn set_scanning(&self, scanning: bool);
}

/// No-op surface for headless use and tests.
pub struct NoOpSurface;

impl ScannerSurface for NoOpSurface {
    fn show(&self) {}
    fn hide(&self) {}
    fn set_status(&self, _message: &str) {}
    fn set_scanning(&self, _scanning: bool) {}
}

/// Caller-supplied completion handler.
pub type ScanHandler = Box<dyn FnOnce(Barcode) + Send>;

/// Presents a scan session on a host surface.
///
/// Reusable: after a result is relayed the presenter can be handed a new
/// handler via [`present`] for the next scan.
///
/// [`present`]: ScannerPresenter::present
pub struct ScannerPresenter {
    session: Arc<ScanSession>,
    surface: Arc<dyn ScannerSurface>,
    handler: Arc<Mutex<Option<ScanHandler>>>,
    relay_task: JoinHandle<()>,
}

impl ScannerPresenter {
    /// Wires a session's result channel to the surface and spawns the
    /// completion relay.
    pub fn new(
        session: Arc<ScanSession>,
        results: mpsc::UnboundedReceiver<Barcode>,
        surface: Arc<dyn ScannerSurface>,
    ) -> Self {
        let handler: Arc<Mutex<Option<ScanHandler>>> = Arc::new(Mutex::new(None));
        let relay_task = tokio::spawn(Self::relay(results, surface.clone(), handler.clone()));

        ScannerPresenter {
            session,
            surface,
            handler,
            relay_task,
        }
    }

    /// Reveals the surface and arms the completion handler for one scan.
    pub fn present(&self, on_result: ScanHandler) {
        *self.handler.lock().expect("Handler mutex poisoned") = Some(on_result);
        self.surface.show();
        self.surface.set_status("Ready to scan");
    }

    /// Start-button action.
    pub async fn start_camera(&self) {
        self.surface.set_status("Starting camera...");

        match self.session.start().await {
            Ok(()) => {
                self.surface.set_scanning(true);
                self.surface
                    .set_status("Camera active - scanning for barcodes...");
            }
            Err(err) => {
                self.surface.set_status(&format!("Error: {err}"));
            }
        }
    }

    /// Stop-button action.
    pub fn stop_camera(&self) {
        self.session.stop();
        self.surface.set_scanning(false);
        self.surface.set_status("Camera stopped");
    }

    /// Manual-entry action (button or confirm key).
    pub fn manual_entry(&self, text: &str) {
        if text.trim().is_empty() {
            self.surface.set_status("Please enter a barcode");
            return;
        }
        self.session.manual_entry(text);
    }

    /// The host closed the surface without a result.
    ///
    /// Hiding the dialog is not enough; the camera must be released
    /// explicitly and unconditionally.
    pub fn dismissed(&self) {
        self.session.stop();
        self.surface.set_scanning(false);
    }

    /// Relays terminal results to the surface and the armed handler.
    async fn relay(
        mut results: mpsc::UnboundedReceiver<Barcode>,
        surface: Arc<dyn ScannerSurface>,
        handler: Arc<Mutex<Option<ScanHandler>>>,
    ) {
        while let Some(barcode) = results.recv().await {
            surface.set_status(&format!("Barcode detected: {}", barcode.text));
            surface.set_scanning(false);
            surface.hide();

            // Taking the handler out enforces at-most-once delivery per
            // present(); the next present() re-arms it.
            let armed = handler.lock().expect("Handler mutex poisoned").take();
            match armed {
                Some(on_result) => on_result(barcode),
                None => debug!("scan result arrived with no armed handler"),
            }
        }
    }
}

impl Drop for ScannerPresenter {
    fn drop(&mut self) {
        self.relay_task.abort();
    }
}
