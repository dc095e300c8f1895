//! Types for model execution

use crate::depth_pipeline::common::error::{PipelineError, Result};

/// Raw model output, one `f32` per pixel in row-major order.
///
/// Values are whatever the network produced: no scaling, no clipping.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl DepthMap {
    /// Reshapes a flat output buffer into `[height, width]`.
    pub fn from_flat(height: usize, width: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != height * width {
            return Err(PipelineError::ShapeMismatch {
                expected: vec![height, width],
                actual: vec![data.len()],
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }
}

/// Engine lifecycle: `Ready → (Executing → Ready)* → Released`
///
/// An engine only exists once loading succeeded, so there is no uninitialized state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Ready,
    Executing,
    Released,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flat_is_row_major() {
        let map = DepthMap::from_flat(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(map.get(2, 0), Some(2.0));
        assert_eq!(map.get(0, 1), Some(3.0));
        assert_eq!(map.row(1), &[3.0, 4.0, 5.0]);
        assert_eq!(map.get(3, 0), None);
    }

    #[test]
    fn test_from_flat_rejects_wrong_length() {
        let result = DepthMap::from_flat(2, 2, vec![0.0; 5]);
        assert!(matches!(result, Err(PipelineError::ShapeMismatch { .. })));
    }
}
