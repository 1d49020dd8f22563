//! # Error Types
//!
//! Session-level errors for theo-scan.
//!
//! Note what is *not* here: a frame with no barcode in it. That is the
//! expected common case of the decode loop and lives in
//! [`DecodeError::Miss`](crate::decode::DecodeError) and never surfaces
//! to the session's caller.

use thiserror::Error;

/// Errors a scan session can surface to its caller.
///
/// No variant is fatal to the host: every failure degrades to "keep
/// scanning" or "show status text".
#[derive(Debug, Error)]
pub enum ScanError {
    /// Camera permission denied, or no capture device available.
    ///
    /// Surfaced once per `start()` attempt; the session does not retry
    /// automatically.
    #[error("Camera access denied or not available: {0}")]
    DeviceUnavailable(String),

    /// `start()` was called while the session already owns a device.
    ///
    /// The session rejects rather than restarting, so device ownership
    /// stays single-assignment. Callers that want a restart call `stop()`
    /// first.
    #[error("Scan session is already active")]
    AlreadyActive,
}

/// Convenience type alias for Results with ScanError.
pub type ScanResult<T> = Result<T, ScanError>;
