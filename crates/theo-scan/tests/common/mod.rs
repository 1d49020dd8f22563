//! Test doubles for the capture and decoder seams.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use theo_scan::{
    BarcodeDecoder, CaptureBackend, CaptureConstraints, CaptureStream, DecodeError, FrameBuffer,
    ScanError, ScanResult, ScannerSurface,
};

// =============================================================================
// Frames
// =============================================================================

/// A frame the heuristic detector will fire on.
pub fn dark_frame() -> FrameBuffer {
    FrameBuffer::filled(100, 50, [0, 0, 0, 255])
}

/// A frame neither the scripted decoder nor the heuristic cares about.
pub fn bright_frame() -> FrameBuffer {
    FrameBuffer::filled(100, 50, [255, 255, 255, 255])
}

// =============================================================================
// Capture Fakes
// =============================================================================

struct FakeStream {
    frame: Option<FrameBuffer>,
    stopped: Arc<AtomicBool>,
}

impl CaptureStream for FakeStream {
    fn frame(&self) -> Option<FrameBuffer> {
        self.frame.clone()
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Programmable capture backend.
pub struct FakeBackend {
    frame: Option<FrameBuffer>,
    deny: bool,
    /// Set when the most recent stream was stopped.
    pub stopped: Arc<AtomicBool>,
    /// How many times a device was acquired.
    pub opened: Arc<AtomicUsize>,
}

impl FakeBackend {
    /// Grants a stream that always yields this frame.
    pub fn with_frame(frame: FrameBuffer) -> Self {
        FakeBackend {
            frame: Some(frame),
            deny: false,
            stopped: Arc::new(AtomicBool::new(false)),
            opened: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Grants a stream that never buffers a full frame.
    pub fn without_frames() -> Self {
        FakeBackend {
            frame: None,
            deny: false,
            stopped: Arc::new(AtomicBool::new(false)),
            opened: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Denies every acquisition, like a rejected permission prompt.
    pub fn denied() -> Self {
        FakeBackend {
            frame: None,
            deny: true,
            stopped: Arc::new(AtomicBool::new(false)),
            opened: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl CaptureBackend for FakeBackend {
    async fn open(&self, _constraints: &CaptureConstraints) -> ScanResult<Box<dyn CaptureStream>> {
        if self.deny {
            return Err(ScanError::DeviceUnavailable("permission denied".to_string()));
        }

        self.opened.fetch_add(1, Ordering::SeqCst);
        self.stopped.store(false, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            frame: self.frame.clone(),
            stopped: self.stopped.clone(),
        }))
    }
}

// =============================================================================
// Decoder Fake
// =============================================================================

/// One scripted decode outcome.
pub enum Step {
    Text(String),
    Miss,
    /// Succeeds only after the given delay, to simulate a slow in-flight
    /// attempt.
    SlowText(String, Duration),
}

/// Decoder that replays a script, then falls back to a fixed outcome.
pub struct ScriptedDecoder {
    script: Mutex<VecDeque<Step>>,
    unavailable_after_script: bool,
    /// Total decode invocations.
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedDecoder {
    /// Replays `steps`, then misses forever.
    pub fn new(steps: Vec<Step>) -> Self {
        ScriptedDecoder {
            script: Mutex::new(steps.into_iter().collect()),
            unavailable_after_script: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always fails as uninvokable, like a missing ZXing dependency.
    pub fn unavailable() -> Self {
        ScriptedDecoder {
            script: Mutex::new(VecDeque::new()),
            unavailable_after_script: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl BarcodeDecoder for ScriptedDecoder {
    async fn decode(&self, _frame: &FrameBuffer) -> Result<String, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let step = self.script.lock().expect("Script mutex poisoned").pop_front();
        match step {
            Some(Step::Text(text)) => Ok(text),
            Some(Step::Miss) => Err(DecodeError::Miss),
            Some(Step::SlowText(text, delay)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None if self.unavailable_after_script => {
                Err(DecodeError::Unavailable("ZXing not loaded".to_string()))
            }
            None => Err(DecodeError::Miss),
        }
    }
}

// =============================================================================
// Surface Fake
// =============================================================================

/// Surface double that records every UI update.
#[derive(Default)]
pub struct RecordingSurface {
    pub statuses: Mutex<Vec<String>>,
    pub visible: AtomicBool,
    pub scanning: AtomicBool,
}

impl RecordingSurface {
    pub fn last_status(&self) -> String {
        self.statuses
            .lock()
            .expect("Status mutex poisoned")
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

impl ScannerSurface for RecordingSurface {
    fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    fn set_status(&self, message: &str) {
        self.statuses
            .lock()
            .expect("Status mutex poisoned")
            .push(message.to_string());
    }

    fn set_scanning(&self, scanning: bool) {
        self.scanning.store(scanning, Ordering::SeqCst);
    }
}
