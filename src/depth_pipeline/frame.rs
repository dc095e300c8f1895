//! Camera frames and the latest-wins handoff slot between producer and consumer

pub mod slot;
pub mod types;

pub use slot::{FrameSlot, SlotStats};
pub use types::Frame;
