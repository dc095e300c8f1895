//! Frame → model input conversion
//!
//! Crop, resize, HWC → CHW and per-channel normalization. Pure functions of the frame and
//! the configured policy.

pub mod preprocessor;
pub mod types;

pub use preprocessor::{Preprocessor, preprocess};
pub use types::{CropPolicy, InputTensor, Normalization, TensorShape};
