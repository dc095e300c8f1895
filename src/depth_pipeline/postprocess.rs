//! Depth post-processing: colorization for display and scale alignment for evaluation

pub mod colorize;
pub mod colormap;
pub mod scale;

pub use colorize::{DepthRange, colorize};
pub use colormap::ColorCurve;
pub use scale::{estimate_scale, sanitize_prediction};
