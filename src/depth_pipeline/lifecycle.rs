//! Session-wide shared state and the cooperative stop signal

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::depth_pipeline::frame::FrameSlot;

/// A one-way stop flag observed by both the capture thread and the inference loop.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag. Returns `true` only for the call that actually changed it.
    pub fn request_stop(&self) -> bool {
        let first = !self.flag.swap(true, Ordering::AcqRel);
        if first {
            debug!("Stop requested");
        }
        first
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Everything the producer and the consumer share for the lifetime of one session.
///
/// Handed out as `Arc<SessionContext>`; the consumer joins the producer before its own
/// reference goes away.
#[derive(Default)]
pub struct SessionContext {
    slot: FrameSlot,
    stop: StopSignal,
}

impl SessionContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slot(&self) -> &FrameSlot {
        &self.slot
    }

    pub fn stop(&self) -> &StopSignal {
        &self.stop
    }
}
