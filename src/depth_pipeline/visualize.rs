//! Composition and display of the source/depth panels

pub mod compositor;
pub mod display;
pub mod fps;

pub use compositor::Compositor;
pub use display::{DisplayEvent, DisplaySurface, HeadlessDisplay, WindowDisplay};
pub use fps::FrameRateCounter;
