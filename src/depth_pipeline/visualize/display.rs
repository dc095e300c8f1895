use image::RgbImage;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::{debug, info};

use crate::depth_pipeline::common::error::{PipelineError, Result};

/// Input observed on the display since the last poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    None,
    Quit,
    Snapshot,
}

/// Where composed frames go
pub trait DisplaySurface {
    fn show(&mut self, frame: &RgbImage) -> Result<()>;

    fn poll_event(&mut self) -> DisplayEvent;
}

/// Desktop window. Created on the first frame, sized to it.
pub struct WindowDisplay {
    title: String,
    window: Option<Window>,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl WindowDisplay {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            window: None,
            buffer: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    fn ensure_window(&mut self, width: usize, height: usize) -> Result<()> {
        if self.window.is_some() && (width, height) == (self.width, self.height) {
            return Ok(());
        }
        let window = Window::new(&self.title, width, height, WindowOptions::default())
            .map_err(|e| PipelineError::Display(e.to_string()))?;
        info!("Opened window '{}' at {}x{}", self.title, width, height);

        self.window = Some(window);
        self.width = width;
        self.height = height;
        self.buffer = vec![0u32; width * height];
        Ok(())
    }
}

impl DisplaySurface for WindowDisplay {
    fn show(&mut self, frame: &RgbImage) -> Result<()> {
        let (width, height) = (frame.width() as usize, frame.height() as usize);
        self.ensure_window(width, height)?;

        for (dst, px) in self.buffer.iter_mut().zip(frame.pixels()) {
            *dst = ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32;
        }

        let Some(window) = self.window.as_mut() else {
            return Err(PipelineError::Display("window not open".to_string()));
        };
        window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| PipelineError::Display(e.to_string()))
    }

    fn poll_event(&mut self) -> DisplayEvent {
        let Some(window) = self.window.as_ref() else {
            return DisplayEvent::None;
        };
        if !window.is_open() || window.is_key_down(Key::Q) || window.is_key_down(Key::Escape) {
            debug!("Quit requested from window");
            return DisplayEvent::Quit;
        }
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            return DisplayEvent::Snapshot;
        }
        DisplayEvent::None
    }
}

/// Discards frames. For benchmarking and machines without a screen.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    shown: u64,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_shown(&self) -> u64 {
        self.shown
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn show(&mut self, _frame: &RgbImage) -> Result<()> {
        self.shown += 1;
        Ok(())
    }

    fn poll_event(&mut self) -> DisplayEvent {
        DisplayEvent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_counts_and_never_quits() {
        let mut display = HeadlessDisplay::new();
        for _ in 0..3 {
            display.show(&RgbImage::new(4, 4)).unwrap();
            assert_eq!(display.poll_event(), DisplayEvent::None);
        }
        assert_eq!(display.frames_shown(), 3);
    }

    #[test]
    fn test_window_is_lazy() {
        let mut display = WindowDisplay::new("test");
        assert_eq!(display.poll_event(), DisplayEvent::None);
        assert!(display.window.is_none());
    }
}
