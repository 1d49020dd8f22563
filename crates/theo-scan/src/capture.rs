//! # Capture Seam
//!
//! The media-capture facility is consumed as a black box: given constraints
//! (facing direction, preferred resolution) it asynchronously yields a live
//! stream handle or fails. Hosts implement [`CaptureBackend`] over whatever
//! device API they have (getUserMedia in a browser shell, V4L2 on a kiosk);
//! tests implement it over canned frames.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScanResult;

/// Which camera to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// User-facing camera.
    Front,
    /// Environment-facing camera, the default for barcode work: staff
    /// point the device at a garment tag.
    Rear,
}

/// Constraints passed to the capture backend.
///
/// The resolution is a preference, not a demand: the backend may negotiate
/// whatever the device supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub facing: Facing,
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        CaptureConstraints {
            facing: Facing::Rear,
            width: 1280,
            height: 720,
        }
    }
}

/// One snapshotted video frame as a tightly packed RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Wraps raw RGBA bytes. `data.len()` must equal `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        FrameBuffer {
            width,
            height,
            data,
        }
    }

    /// A frame filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .into_iter()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        FrameBuffer::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGBA components of the pixel at `(x, y)`.
    ///
    /// ## Panics
    /// Panics when `(x, y)` lies outside the frame.
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let index = self.pixel_index(x, y);
        [
            self.data[index],
            self.data[index + 1],
            self.data[index + 2],
            self.data[index + 3],
        ]
    }

    /// Overwrites the pixel at `(x, y)`. Used to paint synthetic frames.
    ///
    /// ## Panics
    /// Panics when `(x, y)` lies outside the frame.
    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let index = self.pixel_index(x, y);
        self.data[index..index + 4].copy_from_slice(&rgba);
    }

    fn pixel_index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} frame",
            self.width,
            self.height
        );
        ((y * self.width + x) * 4) as usize
    }
}

/// The external media-capture facility.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Requests a live stream satisfying the constraints.
    ///
    /// Fails with [`ScanError::DeviceUnavailable`] when permission is
    /// denied or no suitable device exists.
    ///
    /// [`ScanError::DeviceUnavailable`]: crate::error::ScanError::DeviceUnavailable
    async fn open(&self, constraints: &CaptureConstraints) -> ScanResult<Box<dyn CaptureStream>>;
}

/// A live video stream owned by exactly one scan session.
pub trait CaptureStream: Send + Sync {
    /// Snapshots the current frame into an off-screen pixel buffer.
    ///
    /// Returns `None` while the source has not yet buffered a full frame;
    /// the session simply skips that tick.
    fn frame(&self) -> Option<FrameBuffer>;

    /// Halts the device and releases every component track. Idempotent.
    fn stop(&self);
}
