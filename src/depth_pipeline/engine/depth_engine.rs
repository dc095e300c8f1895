use crate::depth_pipeline::{
    common::error::Result,
    engine::types::{DepthMap, EngineState},
    preprocess::{InputTensor, TensorShape},
};

/// Runs the depth network on one preprocessed frame at a time.
///
/// Only the consumer thread touches an engine, so implementations need not be `Sync`.
pub trait DepthEngine {
    /// Shape the model expects, `[3, H, W]`
    fn input_shape(&self) -> TensorShape;

    /// Spatial size of the prediction as `(height, width)`
    fn output_dims(&self) -> (usize, usize);

    fn state(&self) -> EngineState;

    /// Blocks until the prediction for `input` is available on the host.
    fn infer(&mut self, input: &InputTensor) -> Result<DepthMap>;
}
