//! Frame types

use std::time::Instant;

use image::RgbImage;

/// One decoded camera frame in the working color order (interleaved RGB, 8 bits per channel).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Producer-assigned, strictly increasing within a session
    pub sequence: u64,
    /// When the producer received the frame from the camera
    pub captured_at: Instant,
    pub image: RgbImage,
}

impl Frame {
    pub fn new(sequence: u64, image: RgbImage) -> Self {
        Self {
            sequence,
            captured_at: Instant::now(),
            image,
        }
    }

    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    /// Age of the frame, i.e. capture-to-now latency.
    pub fn age(&self) -> std::time::Duration {
        self.captured_at.elapsed()
    }
}
