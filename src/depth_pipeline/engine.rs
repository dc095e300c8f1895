//! Accelerator execution engine for the compiled depth model

#[cfg(cuda_accel)]
pub mod cuda_engine;
pub mod depth_engine;
pub mod manifest;
pub mod types;

// Fallback when the build found no CUDA toolkit
#[cfg(not(cuda_accel))]
pub struct CudaEngine {
    never: std::convert::Infallible,
}

#[cfg(not(cuda_accel))]
impl CudaEngine {
    /// Validates the manifest, then reports that this build cannot execute it.
    pub fn load(manifest_path: impl AsRef<std::path::Path>, device: usize) -> Result<Self> {
        let manifest = ModelManifest::load(manifest_path)?;
        Self::from_manifest(&manifest, device)
    }

    pub fn from_manifest(manifest: &ModelManifest, device: usize) -> Result<Self> {
        tracing::warn!(
            device,
            module = %manifest.module_path().display(),
            "Built without CUDA support; the model cannot be executed"
        );
        Err(PipelineError::AcceleratorUnavailable)
    }

    pub fn release(self) {
        match self.never {}
    }
}

#[cfg(not(cuda_accel))]
impl DepthEngine for CudaEngine {
    fn input_shape(&self) -> TensorShape {
        match self.never {}
    }

    fn output_dims(&self) -> (usize, usize) {
        match self.never {}
    }

    fn state(&self) -> EngineState {
        match self.never {}
    }

    fn infer(&mut self, _input: &InputTensor) -> Result<DepthMap> {
        match self.never {}
    }
}

#[cfg(cuda_accel)]
pub use cuda_engine::CudaEngine;
pub use depth_engine::DepthEngine;
pub use manifest::{LaunchGeometry, ModelManifest, TensorSpec};
pub use types::{DepthMap, EngineState};

#[cfg(not(cuda_accel))]
use crate::depth_pipeline::{
    common::error::{PipelineError, Result},
    preprocess::{InputTensor, TensorShape},
};
