//! # theo-scan: Barcode Scan Pipeline for THEO Inventory
//!
//! Camera-scanning support for the inventory forms: a reusable scan
//! session that owns the device lifecycle and the capture/decode loop, and
//! a presenter that bridges it to a host surface.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scan Pipeline                                    │
//! │                                                                         │
//! │  Host surface ──► ScannerPresenter ──► ScanSession                     │
//! │                                            │                            │
//! │                      ┌─────────────────────┤                            │
//! │                      ▼                     ▼                            │
//! │               CaptureBackend        every 100 ms:                      │
//! │               (camera black box)    frame ──► BarcodeDecoder           │
//! │                                               (ZXing-style black box)  │
//! │                                                    │                    │
//! │                                         miss ◄─────┼────► text          │
//! │                                      (keep going)  │   (complete once)  │
//! │                                                    ▼                    │
//! │                                         decoder unavailable:            │
//! │                                         heuristic fallback              │
//! │                                         (placeholder PROD_… id)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`capture`] - Camera seam: constraints, frames, backend/stream traits
//! - [`decode`] - Decoder seam, result tags, heuristic fallback
//! - [`session`] - The scan session controller
//! - [`presenter`] - Host-surface adapter and completion relay
//! - [`error`] - Session error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use theo_scan::{ScanConfig, ScanSession, ScannerPresenter, NoOpSurface};
//! # use theo_scan::{CaptureBackend, BarcodeDecoder};
//! # fn wiring(backend: Arc<dyn CaptureBackend>, decoder: Arc<dyn BarcodeDecoder>) {
//! let (session, results) = ScanSession::new(backend, decoder, ScanConfig::default());
//! let presenter = ScannerPresenter::new(Arc::new(session), results, Arc::new(NoOpSurface));
//!
//! presenter.present(Box::new(|barcode| {
//!     println!("scanned {} via {:?}", barcode.text, barcode.origin);
//! }));
//! # }
//! ```

pub mod capture;
pub mod decode;
pub mod error;
pub mod presenter;
pub mod session;

pub use capture::{CaptureBackend, CaptureConstraints, CaptureStream, Facing, FrameBuffer};
pub use decode::{heuristic_detect, Barcode, BarcodeDecoder, BarcodeOrigin, DecodeError};
pub use error::{ScanError, ScanResult};
pub use presenter::{NoOpSurface, ScanHandler, ScannerPresenter, ScannerSurface};
pub use session::{ScanConfig, ScanSession};
