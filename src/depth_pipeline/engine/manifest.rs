//! Compiled-model manifest
//!
//! A small JSON document next to the compiled module describing how to run it:
//!
//! ```json
//! {
//!   "module": "pixelformer_kitti.ptx",
//!   "entry": "depth_forward",
//!   "weights": "pixelformer_kitti.f32",
//!   "input": { "shape": [1, 3, 352, 1216] },
//!   "output": { "shape": [1, 1, 352, 1216] },
//!   "launch": { "grid": [1672, 1, 1], "block": [256, 1, 1] }
//! }
//! ```
//!
//! The entry point is called as
//! `entry(const float* weights, const float* input, float* output, int input_len, int output_len)`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::depth_pipeline::{
    common::error::{PipelineError, Result},
    preprocess::TensorShape,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorSpec {
    pub shape: Vec<usize>,
}

/// Explicit kernel launch geometry; derived from the output size when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchGeometry {
    pub grid: [u32; 3],
    pub block: [u32; 3],
    #[serde(default)]
    pub shared_mem_bytes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub module: PathBuf,
    pub entry: String,
    #[serde(default)]
    pub weights: Option<PathBuf>,
    pub input: TensorSpec,
    pub output: TensorSpec,
    #[serde(default)]
    pub launch: Option<LaunchGeometry>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl ModelManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let manifest = Self::from_json(&text, base_dir)
            .map_err(|e| PipelineError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded model manifest {}", path.display());
        Ok(manifest)
    }

    /// Parses and validates a manifest; relative paths resolve against `base_dir`.
    pub fn from_json(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut manifest: ModelManifest =
            serde_json::from_str(text).map_err(|e| PipelineError::ModelLoad(e.to_string()))?;
        manifest.base_dir = base_dir.into();
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        if self.entry.trim().is_empty() {
            return Err(PipelineError::ModelLoad("entry point name is empty".to_string()));
        }
        self.input_shape()?;
        self.output_dims()?;
        if let Some(launch) = &self.launch {
            if launch.grid.contains(&0) || launch.block.contains(&0) {
                return Err(PipelineError::ModelLoad(format!(
                    "launch geometry has a zero dimension: grid {:?}, block {:?}",
                    launch.grid, launch.block
                )));
            }
        }
        Ok(())
    }

    /// Input shape without the batch axis. Accepts `[1, 3, H, W]` or `[3, H, W]`.
    pub fn input_shape(&self) -> Result<TensorShape> {
        let dims = match self.input.shape.as_slice() {
            [1, c, h, w] | [c, h, w] => (*c, *h, *w),
            [n, _, _, _] => {
                return Err(PipelineError::ModelLoad(format!("batch size {} is not supported, expected 1", n)));
            }
            other => {
                return Err(PipelineError::ModelLoad(format!("input shape {:?} is not [1, 3, H, W]", other)));
            }
        };
        let (channels, height, width) = dims;
        if channels != 3 {
            return Err(PipelineError::ModelLoad(format!("model takes {} input channels, expected 3", channels)));
        }
        if height == 0 || width == 0 {
            return Err(PipelineError::ModelLoad(format!("input shape {:?} has a zero dimension", self.input.shape)));
        }
        Ok(TensorShape::new(channels, height, width))
    }

    /// Output spatial size `(height, width)`, after dropping leading unit axes.
    pub fn output_dims(&self) -> Result<(usize, usize)> {
        let mut dims = self.output.shape.as_slice();
        while dims.len() > 2 && dims[0] == 1 {
            dims = &dims[1..];
        }
        match dims {
            [h, w] if *h > 0 && *w > 0 => Ok((*h, *w)),
            _ => Err(PipelineError::ModelLoad(format!(
                "output shape {:?} cannot be reshaped to [H, W]",
                self.output.shape
            ))),
        }
    }

    pub fn module_path(&self) -> PathBuf {
        self.base_dir.join(&self.module)
    }

    pub fn weights_path(&self) -> Option<PathBuf> {
        self.weights.as_ref().map(|w| self.base_dir.join(w))
    }

    /// Reads the raw little-endian `f32` weight blob, if the manifest names one.
    pub fn load_weights(&self) -> Result<Option<Vec<f32>>> {
        let Some(path) = self.weights_path() else {
            return Ok(None);
        };
        let bytes = fs::read(&path)
            .map_err(|e| PipelineError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        if bytes.len() % 4 != 0 {
            return Err(PipelineError::ModelLoad(format!(
                "{}: {} bytes is not a whole number of f32 values",
                path.display(),
                bytes.len()
            )));
        }
        let weights = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(Some(weights))
    }
}
