use std::fmt;
use std::str::FromStr;

use crate::depth_pipeline::preprocess::{CropPolicy, TensorShape};

/// Dataset the model was trained on. Decides the crop and the evaluation depth cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetPreset {
    #[default]
    Kitti,
    Nyu,
}

impl DatasetPreset {
    pub fn crop(self) -> CropPolicy {
        match self {
            DatasetPreset::Kitti => CropPolicy::kitti(),
            DatasetPreset::Nyu => CropPolicy::None,
        }
    }

    /// Ground truth at or below this is treated as missing.
    pub fn min_depth(self) -> f32 {
        1e-3
    }

    /// Ground truth at or above this is outside the sensor's range.
    pub fn max_depth(self) -> f32 {
        match self {
            DatasetPreset::Kitti => 80.0,
            DatasetPreset::Nyu => 10.0,
        }
    }

    /// Input size the published checkpoints for this dataset were exported with.
    pub fn reference_input_shape(self) -> TensorShape {
        match self {
            DatasetPreset::Kitti => TensorShape::new(3, 352, 1216),
            DatasetPreset::Nyu => TensorShape::new(3, 480, 640),
        }
    }

    /// KITTI ground truth lives under the drive directory of the RGB frame.
    pub(crate) fn depth_relative_path(self, rgb: &str, depth: &str) -> String {
        match self {
            DatasetPreset::Kitti => {
                let drive = rgb.split('/').next().unwrap_or_default();
                if drive.is_empty() {
                    depth.to_string()
                } else {
                    format!("{}/{}", drive, depth)
                }
            }
            DatasetPreset::Nyu => depth.to_string(),
        }
    }
}

impl fmt::Display for DatasetPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatasetPreset::Kitti => "kitti",
            DatasetPreset::Nyu => "nyu",
        })
    }
}

impl FromStr for DatasetPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kitti" => Ok(DatasetPreset::Kitti),
            "nyu" => Ok(DatasetPreset::Nyu),
            other => Err(format!("unknown dataset '{}', expected kitti or nyu", other)),
        }
    }
}
