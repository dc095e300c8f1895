//! Single-slot, latest-wins mailbox between the capture thread and the inference loop.
//!
//! The frame and its readiness live under one mutex, so a reader can never observe the
//! flag without the matching frame. A consumer that wants to block does so on a condition
//! variable with a bounded timeout instead of spinning.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::depth_pipeline::frame::types::Frame;

/// Counters describing how the slot was used over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotStats {
    /// Frames handed to [`FrameSlot::publish`]
    pub published: u64,
    /// Frames overwritten before anyone took them
    pub dropped: u64,
}

#[derive(Default)]
struct SlotState {
    latest: Option<Frame>,
    stats: SlotStats,
}

#[derive(Default)]
pub struct FrameSlot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    // The critical sections never panic mid-update, so a poisoned lock still holds a
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `frame`, replacing any frame nobody has taken yet. Never waits on the consumer.
    pub fn publish(&self, frame: Frame) {
        let mut state = self.lock();
        if state.latest.replace(frame).is_some() {
            state.stats.dropped += 1;
        }
        state.stats.published += 1;
        drop(state);
        self.ready.notify_one();
    }

    /// Hands off the stored frame, if any. The slot is empty afterwards.
    pub fn try_take(&self) -> Option<Frame> {
        self.lock().latest.take()
    }

    /// Like [`try_take`](Self::try_take) but waits up to `timeout` for a publish.
    pub fn wait_take(&self, timeout: Duration) -> Option<Frame> {
        let state = self.lock();
        let (mut state, _) = self
            .ready
            .wait_timeout_while(state, timeout, |s| s.latest.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state.latest.take()
    }

    pub fn is_ready(&self) -> bool {
        self.lock().latest.is_some()
    }

    pub fn stats(&self) -> SlotStats {
        self.lock().stats
    }
}
