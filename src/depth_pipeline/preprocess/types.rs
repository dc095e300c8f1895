//! Types for model input preparation

use serde::{Deserialize, Serialize};

/// Spatial shape of the model input, `[channels, height, width]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorShape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl TensorShape {
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self { channels, height, width }
    }

    pub fn element_count(&self) -> usize {
        self.channels * self.height * self.width
    }

    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }

    pub fn dims(&self) -> Vec<usize> {
        vec![self.channels, self.height, self.width]
    }
}

/// Normalized, planar (CHW) `f32` model input
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    pub shape: TensorShape,
    /// `channels * height * width` values, one full plane per channel
    pub data: Vec<f32>,
}

impl InputTensor {
    pub fn channel(&self, c: usize) -> &[f32] {
        let plane = self.shape.plane_len();
        &self.data[c * plane..(c + 1) * plane]
    }

    pub fn channel_mean(&self, c: usize) -> f32 {
        let plane = self.channel(c);
        if plane.is_empty() {
            return 0.0;
        }
        (plane.iter().map(|&v| v as f64).sum::<f64>() / plane.len() as f64) as f32
    }
}

/// Crop applied to the raw frame before resizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropPolicy {
    /// Use the whole frame
    None,
    /// Fixed pixel window; parts that fall outside the frame are cut off
    Window {
        top: u32,
        left: u32,
        height: u32,
        width: u32,
    },
}

impl CropPolicy {
    /// Margin crop used for KITTI-trained models on the wide camera feed.
    pub fn kitti() -> Self {
        CropPolicy::Window {
            top: 525,
            left: 0,
            height: 1110,
            width: 3840,
        }
    }

    /// Resolves the window against a frame, returning `(x, y, width, height)`.
    /// `None` when nothing of the window overlaps the frame.
    pub fn resolve(&self, frame_width: u32, frame_height: u32) -> Option<(u32, u32, u32, u32)> {
        match *self {
            CropPolicy::None => Some((0, 0, frame_width, frame_height)),
            CropPolicy::Window { top, left, height, width } => {
                if top >= frame_height || left >= frame_width {
                    return None;
                }
                let w = width.min(frame_width - left);
                let h = height.min(frame_height - top);
                if w == 0 || h == 0 {
                    return None;
                }
                Some((left, top, w, h))
            }
        }
    }
}

/// Per-channel `(x - mean) / std`, applied after scaling to `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for Normalization {
    /// ImageNet statistics, which the depth models were trained with.
    fn default() -> Self {
        Self {
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}
